use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glyphfall_config::Config;
use ratatui::DefaultTerminal;

use crate::layout::SiteLayout;

mod host;
mod layout;
mod logging;

/// Longest wait for input before checking the clock again.
const MAX_POLL: Duration = Duration::from_millis(100);

/// A terminal page with a falling glyph background.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for a reproducible background.
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the background unmounted.
    #[arg(long)]
    no_background: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .wrap_err("failed to load configuration")?;
    if cli.seed.is_some() {
        config.background.seed = cli.seed;
    }
    if cli.no_background {
        config.background.enabled = false;
    }

    logging::init(&config.logging)?;

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    /// Mount the background once the terminal size is known.
    background_enabled: bool,
    /// Page layout and background.
    layout: SiteLayout,
    /// Start of the scheduler clock.
    started: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        Self {
            running: false,
            background_enabled: config.background.enabled,
            layout: SiteLayout::new(&config, 0, 0),
            started: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.layout.resize(size.width, size.height);
        if self.background_enabled && !self.layout.mount_background() {
            tracing::warn!(
                width = size.width,
                height = size.height,
                "background unavailable"
            );
        }

        self.running = true;
        while self.running {
            terminal.draw(|frame| self.layout.render(frame))?;
            self.handle_crossterm_events()?;
            self.layout.advance_to(self.started.elapsed());
        }

        self.layout.unmount_background();
        Ok(())
    }

    /// How long to wait for input before the next repaint is due.
    fn poll_timeout(&self) -> Duration {
        let elapsed = self.started.elapsed();
        self.layout
            .next_deadline()
            .map_or(MAX_POLL, |due| due.saturating_sub(elapsed))
            .min(MAX_POLL)
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.poll_timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(columns, rows) => self.layout.resize(columns, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('b')) => self.layout.toggle_background(),
            _ => {}
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut config = Config::default();
        config.background.seed = Some(1);
        let mut app = App::new(config);
        app.layout.resize(80, 24);
        app
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app();
            app.running = true;
            app.on_key_event(key);
            assert!(!app.running);
        }
    }

    #[test]
    fn test_b_toggles_background() {
        let mut app = app();
        app.on_key_event(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE));
        assert!(app.layout.is_background_mounted());
        app.on_key_event(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE));
        assert!(!app.layout.is_background_mounted());
    }

    #[test]
    fn test_poll_timeout_is_bounded() {
        let mut app = app();
        assert_eq!(app.poll_timeout(), MAX_POLL);
        app.layout.mount_background();
        assert!(app.poll_timeout() <= Duration::from_millis(50));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["glyphfall", "--seed", "9", "--no-background"]);
        assert_eq!(cli.seed, Some(9));
        assert!(cli.no_background);
        assert!(cli.config.is_none());
    }
}
