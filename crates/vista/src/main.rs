use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Style, Stylize},
    text::Line,
    widgets::{Paragraph, Wrap},
};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;
use vista_config::Config;
use vista_core::{ColorProfile, WeatherAttributes};
use vista_scene::{LoadError, Scene, TransitionController, load_scene};

mod view;
mod weather;

use view::{SceneView, wrap_text};
use weather::{Forecast, ProviderError, WeatherProvider, provider_for};

/// Longest wait for terminal input before checking for finished background work.
const MESSAGE_POLL: Duration = Duration::from_millis(50);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load()?;
    init_logging(&config);
    info!(scene = %config.scene_dir.display(), "starting");

    // Leave an editable config behind on first run.
    if let Some(path) = Config::path()
        && !path.exists()
        && let Err(err) = config.save(&path)
    {
        warn!(%err, "could not write default config");
    }

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

/// Log to a file, since the terminal belongs to the UI.
fn init_logging(config: &Config) {
    let Some(dir) = vista_config::log_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("vista.log")) else {
        return;
    };
    let level = config.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Results of background work, delivered to the event loop.
#[derive(Debug)]
enum Message {
    Forecast(Result<Forecast, ProviderError>),
    /// A finished composition, tagged with the weather it was built for.
    Scene(WeatherAttributes, Result<Scene, LoadError>),
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    provider: Arc<dyn WeatherProvider>,
    profile: Box<dyn ColorProfile>,
    /// Displayed scene and any crossfade in progress.
    transition: TransitionController,
    /// Latest successfully fetched report.
    forecast: Option<Forecast>,
    provider_error: Option<String>,
    load_error: Option<String>,
    started: Instant,
    tx: Sender<Message>,
    rx: Receiver<Message>,
    fetch_in_flight: bool,
    compose_in_flight: bool,
    /// Weather to compose a scene for once the current composition is done.
    queued_compose: Option<WeatherAttributes>,
    next_poll: Option<Instant>,
    next_fade_tick: Option<Instant>,
    next_redraw: Instant,
    /// Redraw on the next loop iteration.
    dirty: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        let now = Instant::now();
        Self {
            running: false,
            provider: Arc::from(provider_for(&config.weather)),
            profile: config.color_profile().profile(),
            config,
            transition: TransitionController::new(),
            forecast: None,
            provider_error: None,
            load_error: None,
            started: now,
            tx,
            rx,
            fetch_in_flight: false,
            compose_in_flight: false,
            queued_compose: None,
            next_poll: None,
            next_fade_tick: None,
            next_redraw: now,
            dirty: true,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.spawn_fetch();
        while self.running {
            let now = Instant::now();
            if self.dirty || now >= self.next_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.dirty = false;
                self.next_redraw = now + self.config.redraw_interval();
            }
            self.handle_crossterm_events()?;
            while let Ok(message) = self.rx.try_recv() {
                self.handle_message(message);
            }
            self.fire_timers(Instant::now());
        }
        info!("quitting");
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if let Some(err) = self.provider_error.as_ref().or(self.load_error.as_ref()) {
            let error = Paragraph::new(err.as_str())
                .style(Style::new().red())
                .wrap(Wrap { trim: true });
            frame.render_widget(error, area);
            return;
        }

        let report = match (&self.forecast, self.config.show_forecast) {
            (Some(forecast), true) => wrap_text(&forecast.raw, area.width as usize),
            _ => Vec::new(),
        };
        let [scene_area, report_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(report.len() as u16)])
                .areas(area);

        let elapsed = self.started.elapsed().as_secs() as f64;
        frame.render_widget(
            SceneView::new(&self.transition, elapsed, self.profile.as_ref()),
            scene_area,
        );

        let report: Vec<Line> = report.into_iter().map(Line::from).collect();
        frame.render_widget(Paragraph::new(report), report_area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the nearest timer or the message poll interval.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(width, height) => {
                    debug!(width, height, "resized");
                    self.dirty = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (
                KeyModifiers::CONTROL,
                KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('d') | KeyCode::Char('D'),
            ) => self.quit(),
            (_, KeyCode::Char('r')) => self.spawn_fetch(),
            _ => {}
        }
    }

    /// Applies the result of a background fetch or composition.
    fn handle_message(&mut self, message: Message) {
        self.dirty = true;
        match message {
            Message::Forecast(result) => {
                self.fetch_in_flight = false;
                self.next_poll = Some(Instant::now() + self.config.poll_interval());
                match result {
                    Ok(forecast) => {
                        self.provider_error = None;
                        let attributes = forecast.attributes;
                        self.forecast = Some(forecast);
                        if self.transition.request(attributes) {
                            info!(?attributes, "weather changed");
                            self.spawn_compose(attributes);
                        }
                    }
                    Err(err) => {
                        warn!(%err, "weather fetch failed");
                        self.provider_error = Some(err.to_string());
                    }
                }
            }
            Message::Scene(attributes, result) => {
                self.compose_in_flight = false;
                match result {
                    Ok(scene) => {
                        self.load_error = None;
                        self.transition.offer(scene);
                    }
                    Err(err) => {
                        if self.transition.abandon_request(attributes) {
                            warn!(%err, "scene composition failed");
                            self.load_error = Some(err.to_string());
                        } else {
                            debug!(%err, "composition for superseded weather failed");
                        }
                    }
                }
                if let Some(attributes) = self.queued_compose.take() {
                    self.spawn_compose(attributes);
                }
            }
        }
        self.sync_fade_timer(Instant::now());
    }

    /// Runs the poll and fade timers that are due at `now`.
    fn fire_timers(&mut self, now: Instant) {
        if self.next_poll.is_some_and(|at| now >= at) {
            self.spawn_fetch();
        }
        if self.next_fade_tick.is_some_and(|at| now >= at) {
            self.transition.tick();
            self.dirty = true;
            self.next_fade_tick = None;
            self.sync_fade_timer(now);
        }
    }

    /// Keep the fade ticker running exactly while a transition is.
    fn sync_fade_timer(&mut self, now: Instant) {
        if !self.transition.is_fading() {
            self.next_fade_tick = None;
        } else if self.next_fade_tick.is_none() {
            self.next_fade_tick = Some(now + self.config.fade_tick());
        }
    }

    /// Time until the nearest timer, capped at [`MESSAGE_POLL`].
    fn poll_timeout(&self, now: Instant) -> Duration {
        [Some(self.next_redraw), self.next_poll, self.next_fade_tick]
            .into_iter()
            .flatten()
            .min()
            .map_or(MESSAGE_POLL, |at| at.saturating_duration_since(now))
            .min(MESSAGE_POLL)
    }

    /// Fetches the weather on a background thread unless a fetch is running.
    fn spawn_fetch(&mut self) {
        if self.fetch_in_flight {
            return;
        }
        self.fetch_in_flight = true;
        self.next_poll = None;
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        thread::spawn(move || {
            // The loop may already have quit; nobody is listening then.
            let _ = tx.send(Message::Forecast(provider.fetch()));
        });
    }

    /// Composes the scene for `attributes` on a background thread, or queues
    /// it behind the composition already running.
    fn spawn_compose(&mut self, attributes: WeatherAttributes) {
        if self.compose_in_flight {
            self.queued_compose = Some(attributes);
            return;
        }
        self.compose_in_flight = true;
        let dir: PathBuf = self.config.scene_dir.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let _ = tx.send(Message::Scene(attributes, load_scene(&dir, attributes)));
        });
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
