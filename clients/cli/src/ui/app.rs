//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::environment::Environment;
use crate::events::Event as DashboardEvent;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::splash::render_splash;
use crate::workers::Request;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// UI configuration data grouped by concern
#[derive(Debug, Clone, Default)]
pub struct UIConfig {
    pub with_background_color: bool,
    /// Pre-fills the portfolio user field, and so the portfolio filter.
    pub default_user_id: Option<String>,
    pub alert_poll_secs: u64,
}

impl UIConfig {
    pub fn new(
        with_background_color: bool,
        default_user_id: Option<String>,
        alert_poll_secs: u64,
    ) -> Self {
        Self {
            with_background_color,
            default_user_id,
            alert_poll_secs,
        }
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Dashboard screen with holdings, alerts and alert conditions.
    Dashboard(Box<DashboardState>),
}

/// Application state
#[derive(Debug)]
pub struct App {
    /// The start time of the application, used for computing uptime.
    start_time: Instant,

    /// The environment in which the application is running.
    environment: Environment,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Receives request results from worker tasks.
    event_receiver: mpsc::Receiver<DashboardEvent>,

    /// Sends requests to the dispatcher.
    request_sender: mpsc::Sender<Request>,

    /// Broadcasts shutdown signal to worker tasks.
    shutdown_sender: broadcast::Sender<()>,

    ui_config: UIConfig,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        event_receiver: mpsc::Receiver<DashboardEvent>,
        request_sender: mpsc::Sender<Request>,
        shutdown_sender: broadcast::Sender<()>,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            environment,
            current_screen: Screen::Splash,
            event_receiver,
            request_sender,
            shutdown_sender,
            ui_config,
        }
    }

    fn enter_dashboard(&mut self) {
        self.current_screen = Screen::Dashboard(Box::new(DashboardState::new(
            self.environment.clone(),
            self.start_time,
            self.ui_config.clone(),
        )));
    }

    /// Forwards requests queued by the dashboard to the dispatcher.
    fn flush_requests(&mut self) {
        let Screen::Dashboard(state) = &mut self.current_screen else {
            return;
        };
        for request in state.take_requests() {
            if let Err(e) = self.request_sender.try_send(request) {
                log::warn!("Dropping dashboard request: {}", e);
            }
        }
    }

    fn shutdown(&self) {
        let _ = self.shutdown_sender.send(());
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        // Results stay queued in the channel until the dashboard exists
        if let Screen::Dashboard(state) = &mut app.current_screen {
            while let Ok(event) = app.event_receiver.try_recv() {
                state.add_event(event);
            }
            state.update();
        }
        app.flush_requests();

        terminal.draw(|f| render(f, &app.current_screen))?;

        // Handle splash-to-dashboard transition
        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.enter_dashboard();
                continue;
            }
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                match &mut app.current_screen {
                    Screen::Splash => {
                        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                            app.shutdown();
                            return Ok(());
                        }
                        // Any other key press will skip the splash screen
                        app.enter_dashboard();
                    }
                    Screen::Dashboard(state) => {
                        if !state.handle_key(key) {
                            app.shutdown();
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen) {
    match screen {
        Screen::Splash => render_splash(f),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}
