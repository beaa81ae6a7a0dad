//! Weather reports and their classification into scene attributes.
//!
//! A provider produces a free-form text report. The report is classified by
//! searching it for known phrases, independently for each weather axis.

use std::io;
use std::process::Command;
use std::time::Duration;

use chrono::Timelike;
use thiserror::Error;
use vista_config::WeatherSource;
use vista_core::{Cloudiness, Raininess, TimeOfDay, Visibility, WeatherAttributes, Windiness};

/// Timeout for HTTP requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Phrases for each axis, in priority order. The first phrase found in a
/// report decides the level; with no match the level is 0.
const TIME_MARKERS: &[&str] = &["early morning", "morning", "afternoon", "night"];
const CLOUD_MARKERS: &[&str] = &[
    "clear",
    "almost clear",
    "partly cloudy",
    "mostly cloudy",
    "cloudy",
];
const RAIN_MARKERS: &[&str] = &[
    "no rain",
    "a drizzle",
    "a light shower",
    "a shower",
    "a heavy shower",
];
const VISIBILITY_MARKERS: &[&str] = &[
    "visibility",
    "There's haze",
    "There's mist",
    "There's fog",
    "There's heavy fog",
];
const WIND_MARKERS: &[&str] = &["no breeze", "light breeze", "stiff wind"];

/// A weather report and the attributes classified from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forecast {
    /// The report as produced by the provider.
    pub raw: String,
    pub attributes: WeatherAttributes,
}

impl Forecast {
    pub fn from_report(raw: String) -> Self {
        let attributes = classify(&raw);
        Self { raw, attributes }
    }
}

/// Fetching a weather report failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to run weather program {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("weather program {program} failed ({status})")]
    Exit { program: String, status: String },
    #[error("failed to fetch weather from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },
}

/// A source of weather reports.
pub trait WeatherProvider: Send + Sync {
    fn fetch(&self) -> Result<Forecast, ProviderError>;
}

/// Build the provider described by the configuration.
pub fn provider_for(source: &WeatherSource) -> Box<dyn WeatherProvider> {
    match source {
        WeatherSource::Clock => Box::new(ClockProvider),
        WeatherSource::Command { program, args } => {
            Box::new(CommandProvider::new(program.clone(), args.clone()))
        }
        WeatherSource::Http { url } => Box::new(HttpProvider::new(url.clone())),
    }
}

/// Runs an external program and reads the report from its stdout.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

impl WeatherProvider for CommandProvider {
    fn fetch(&self) -> Result<Forecast, ProviderError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| ProviderError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ProviderError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
            });
        }
        Ok(Forecast::from_report(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}

/// Fetches a plain-text report over HTTP.
pub struct HttpProvider {
    url: String,
    agent: ureq::Agent,
}

impl HttpProvider {
    pub fn new(url: String) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { url, agent }
    }
}

impl WeatherProvider for HttpProvider {
    fn fetch(&self) -> Result<Forecast, ProviderError> {
        let http_err = |source| ProviderError::Http {
            url: self.url.clone(),
            source,
        };
        let body = self
            .agent
            .get(&self.url)
            .call()
            .map_err(http_err)?
            .body_mut()
            .read_to_string()
            .map_err(http_err)?;
        Ok(Forecast::from_report(body))
    }
}

/// Reports fair weather with the time of day taken from the local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockProvider;

impl WeatherProvider for ClockProvider {
    fn fetch(&self) -> Result<Forecast, ProviderError> {
        let time = time_of_day_for_hour(chrono::Local::now().hour());
        Ok(Forecast::from_report(clock_report(time)))
    }
}

fn time_of_day_for_hour(hour: u32) -> TimeOfDay {
    match hour {
        5..=7 => TimeOfDay::EarlyMorning,
        8..=11 => TimeOfDay::Morning,
        12..=18 => TimeOfDay::Afternoon,
        _ => TimeOfDay::Night,
    }
}

fn clock_report(time: TimeOfDay) -> String {
    let phrase = TIME_MARKERS[time as usize];
    format!("It's {phrase}. The sky is clear, with no rain, good visibility and no breeze.")
}

/// Classify a free-form report into weather attributes.
pub fn classify(report: &str) -> WeatherAttributes {
    WeatherAttributes {
        time_of_day: TimeOfDay::from_index(find_marker(report, TIME_MARKERS)),
        cloudiness: Cloudiness::from_index(find_marker(report, CLOUD_MARKERS)),
        raininess: Raininess::from_index(find_marker(report, RAIN_MARKERS)),
        visibility: Visibility::from_index(find_marker(report, VISIBILITY_MARKERS)),
        windiness: Windiness::from_index(find_marker(report, WIND_MARKERS)),
    }
}

fn find_marker(report: &str, markers: &[&str]) -> usize {
    markers
        .iter()
        .position(|marker| report.contains(marker))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_report() {
        let report = "Good afternoon! It's mostly cloudy with a light shower. \
                      There's mist in the valley and a stiff wind from the west.";
        let attributes = classify(report);
        assert_eq!(attributes.time_of_day, TimeOfDay::Afternoon);
        assert_eq!(attributes.cloudiness, Cloudiness::MostlyCloudy);
        assert_eq!(attributes.raininess, Raininess::LightShower);
        assert_eq!(attributes.visibility, Visibility::Mist);
        assert_eq!(attributes.windiness, Windiness::StiffWind);
    }

    #[test]
    fn test_classify_defaults_to_first_level() {
        assert_eq!(classify("nothing to see here"), WeatherAttributes::default());
    }

    #[test]
    fn test_first_marker_wins() {
        // "early morning" also contains "morning".
        assert_eq!(classify("early morning").time_of_day, TimeOfDay::EarlyMorning);
        // "partly cloudy" is listed before plain "cloudy".
        assert_eq!(classify("partly cloudy").cloudiness, Cloudiness::PartlyCloudy);
        // "a heavy shower" contains neither "a shower" nor "a light shower".
        assert_eq!(classify("a heavy shower").raininess, Raininess::HeavyShower);
        // "There's heavy fog" is not "There's fog".
        assert_eq!(classify("There's heavy fog").visibility, Visibility::HeavyFog);
    }

    #[test]
    fn test_time_of_day_for_hour() {
        assert_eq!(time_of_day_for_hour(6), TimeOfDay::EarlyMorning);
        assert_eq!(time_of_day_for_hour(9), TimeOfDay::Morning);
        assert_eq!(time_of_day_for_hour(15), TimeOfDay::Afternoon);
        assert_eq!(time_of_day_for_hour(22), TimeOfDay::Night);
        assert_eq!(time_of_day_for_hour(2), TimeOfDay::Night);
    }

    #[test]
    fn test_clock_report_classifies_back() {
        for time in TimeOfDay::ALL {
            let forecast = Forecast::from_report(clock_report(time));
            assert_eq!(
                forecast.attributes,
                WeatherAttributes {
                    time_of_day: time,
                    ..Default::default()
                }
            );
        }
    }

    #[test]
    fn test_clock_provider_reports_fair_weather() {
        let forecast = ClockProvider.fetch().unwrap();
        assert_eq!(forecast.attributes.cloudiness, Cloudiness::ClearSky);
        assert_eq!(forecast.attributes.raininess, Raininess::NoRain);
        assert!(!forecast.raw.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_provider() {
        let provider = CommandProvider::new(
            "echo".to_string(),
            vec!["It's night. There's fog and a light breeze.".to_string()],
        );
        let forecast = provider.fetch().unwrap();
        assert_eq!(forecast.attributes.time_of_day, TimeOfDay::Night);
        assert_eq!(forecast.attributes.visibility, Visibility::Fog);
        assert_eq!(forecast.attributes.windiness, Windiness::Breeze);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_output_with_invalid_utf8_is_still_classified() {
        let provider = CommandProvider::new(
            "sh".to_string(),
            vec!["-c".to_string(), r"printf 'It is night \377 with a drizzle.'".to_string()],
        );
        let forecast = provider.fetch().unwrap();
        assert!(forecast.raw.contains('\u{FFFD}'));
        assert_eq!(forecast.attributes.time_of_day, TimeOfDay::Night);
        assert_eq!(forecast.attributes.raininess, Raininess::Drizzle);
    }

    #[test]
    fn test_command_provider_missing_program() {
        let provider = CommandProvider::new("/nonexistent/vista-weather".to_string(), Vec::new());
        assert!(matches!(provider.fetch(), Err(ProviderError::Spawn { .. })));
    }

    #[test]
    fn test_exit_error_message() {
        let err = ProviderError::Exit {
            program: "climate".to_string(),
            status: "exit status: 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "weather program climate failed (exit status: 2)"
        );
    }
}
