//! Per-cell procedural rendering.
//!
//! Each cell is a pure function of its position, the elapsed time and the
//! scene. Wind, rain and clouds are all views of the scene's noise field at
//! different scales and speeds.

use vista_core::{CellStyle, TimeOfDay, Visibility, WeatherAttributes};

use crate::chars::{BLANK, RAIN, SLANTED_RAIN};
use crate::scene::{SKY_DEPTH, Scene};

/// Noise level above which a cell shows its windswept variant.
const GUST_THRESHOLD: f64 = 0.6;

/// Upper bound of the cloud and daytime fog accumulator.
const MAX_CLOUDINESS: i32 = 23;

/// First entry of the 256-color greyscale ramp.
const GREY_RAMP_START: i32 = 232;

/// Brightest entry of the greyscale ramp.
const GREY_RAMP_END: i32 = 255;

impl Scene {
    /// Compute the character and style shown at `(x, y)` after `elapsed` seconds.
    ///
    /// Cells outside the scene are blank with the neutral style.
    pub fn get_cell(&self, x: i32, y: i32, elapsed: f64) -> (char, CellStyle) {
        let Some(index) = self.index(x, y) else {
            return (BLANK, CellStyle::NEUTRAL);
        };

        let weather = self.attributes;
        let fx = x as f64;
        let fy = y as f64;
        let t = elapsed;
        let wind = weather.windiness.level() as f64;
        let rain = weather.raininess.level() as f64;
        let depth = self.depth.at(index) as i32;

        // Character selection
        let mut ch = self.foreground.at(index);
        if wind > 0.0
            && self.noise.sample(
                fx / 40.0 + wind / 8.0 * t * 2.0,
                fy / 20.0,
                t / 5.0 + wind / 10.0 * t / 2.0,
            ) > GUST_THRESHOLD
        {
            ch = self.windground.at(index);
        }
        if depth == SKY_DEPTH as i32 {
            ch = self.background.at(index);
        }
        if rain > 0.0 && 0.1 + rain / 20.0 > self.noise.sample(fx + t * wind * 3.0, fy - t * 5.0, t / 15.0) {
            // Stiff winds drive the rain sideways.
            ch = if wind > 1.0 {
                SLANTED_RAIN
            } else {
                RAIN
            };
        }

        // Style selection
        let fog = fog_level(depth, weather.visibility, weather.time_of_day);
        let clouds = self.cloud_cover(fx, fy, t, depth);
        (ch, cell_style(fog, clouds, &weather))
    }

    /// Cloud shading from the two cloud layers, before fog is added.
    fn cloud_cover(&self, fx: f64, fy: f64, t: f64, depth: i32) -> i32 {
        let cloud = self.attributes.cloudiness.level() as f64;
        let drift = t * self.attributes.windiness.level() as f64 / 8.0;
        let mut cover = 0;
        // High, slow layer only over open sky.
        if depth > 8 && cloud / 5.0 > self.noise.sample(fx / 50.0 + t / 24.0 + drift, fy / 12.0, 1000.0 + t / 80.0) {
            cover += 10;
        }
        if depth > 6 && cloud / 7.0 > self.noise.sample(fx / 20.0 + t / 14.0 + drift, fy / 6.0, t / 80.0) {
            cover += 10;
        }
        cover
    }
}

/// How strongly fog shades a cell at the given depth.
pub(crate) fn fog_level(depth: i32, visibility: Visibility, time: TimeOfDay) -> i32 {
    // The night sky never glows.
    if depth == SKY_DEPTH as i32 && time.is_dark() {
        return 0;
    }
    let visibility = visibility.level() as i32;
    let fog = if visibility == 0 {
        (depth + visibility) / 2
    } else {
        (depth - 1) + (visibility - 1) * 2
    };
    fog.max(0)
}

/// Pick palette colors from fog and cloud cover.
pub(crate) fn cell_style(fog: i32, clouds: i32, weather: &WeatherAttributes) -> CellStyle {
    let mut cloudiness = clouds;
    let fg = match weather.time_of_day {
        // Fog darkens distant objects at night.
        TimeOfDay::Night | TimeOfDay::EarlyMorning => GREY_RAMP_END - fog - fog / 2,
        TimeOfDay::Morning | TimeOfDay::Afternoon => {
            cloudiness += fog;
            GREY_RAMP_END
        }
    };
    let cloudiness = cloudiness.min(MAX_CLOUDINESS);
    let bg = if cloudiness > 0 {
        GREY_RAMP_START + cloudiness
    } else {
        GREY_RAMP_START + fog
    };
    CellStyle::indexed(grey(fg), grey(bg))
}

fn grey(index: i32) -> u8 {
    index.clamp(GREY_RAMP_START, GREY_RAMP_END) as u8
}
