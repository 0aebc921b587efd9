//! Page layout: the background layer with the site text on top.

use std::time::Duration;

use glyphfall_background::{CellSurface, MountedBackground, Scheduler, mount};
use glyphfall_config::{BackgroundConfig, Config, SiteConfig};
use glyphfall_core::{Rgb, Viewport};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
};

use crate::host::TerminalSurfaces;

/// Accent used for the site text.
const ACCENT: Color = Color::Cyan;

/// Owns the scheduler and the mounted background, and draws the page.
pub struct SiteLayout {
    scheduler: Scheduler,
    surfaces: TerminalSurfaces,
    site: SiteConfig,
    backdrop: Rgb,
    layer_opacity: f32,
    seed: Option<u64>,
    background: Option<MountedBackground<CellSurface, StdRng>>,
}

impl SiteLayout {
    /// Create a layout for a `columns` x `rows` terminal, without a background.
    pub fn new(config: &Config, columns: u16, rows: u16) -> Self {
        let BackgroundConfig {
            layer_opacity,
            backdrop,
            seed,
            ..
        } = config.background;
        let metrics = config.background.cell_metrics();
        let mut surfaces = TerminalSurfaces::new(metrics);
        surfaces.set_grid(columns, rows);
        Self {
            scheduler: Scheduler::new(Viewport::from_cells(columns, rows, metrics)),
            surfaces,
            site: config.site.clone(),
            backdrop,
            layer_opacity,
            seed,
            background: None,
        }
    }

    /// Mount a fresh background. Returns whether one is mounted afterwards.
    pub fn mount_background(&mut self) -> bool {
        if self.background.is_none() {
            let entropy = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            self.background = mount(&self.scheduler, &mut self.surfaces, entropy);
        }
        self.background.is_some()
    }

    /// Tear the background down, if mounted.
    pub fn unmount_background(&mut self) {
        if let Some(background) = self.background.take() {
            background.unmount();
        }
    }

    /// Mount the background if it is absent, unmount it otherwise.
    pub fn toggle_background(&mut self) {
        if self.background.is_some() {
            self.unmount_background();
        } else {
            self.mount_background();
        }
    }

    pub fn is_background_mounted(&self) -> bool {
        self.background.is_some()
    }

    /// React to a terminal resize.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.surfaces.set_grid(columns, rows);
        let viewport = Viewport::from_cells(columns, rows, self.surfaces.metrics());
        if viewport != self.scheduler.viewport() {
            self.scheduler.resize(viewport);
        }
    }

    /// Run every repaint due by `elapsed`.
    pub fn advance_to(&self, elapsed: Duration) -> usize {
        self.scheduler.advance_to(elapsed)
    }

    /// When the next repaint is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Draw the background layer, then the site text over it.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if let Some(background) = &self.background {
            let lines = background
                .renderer()
                .surface()
                .lines(self.backdrop, self.layer_opacity);
            frame.render_widget(Paragraph::new(lines), area);
        }

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Top padding
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Tagline
            Constraint::Fill(1),   // Bottom padding
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let title = Paragraph::new(self.site.title.as_str())
            .style(Style::new().fg(ACCENT).bold())
            .alignment(Alignment::Center);
        frame.render_widget(title, chunks[1]);

        let tagline = Paragraph::new(self.site.tagline.as_str())
            .style(Style::new().fg(Color::Gray))
            .alignment(Alignment::Center);
        frame.render_widget(tagline, chunks[3]);

        let help = Line::from(vec![
            "q".bold().fg(ACCENT),
            " quit  ".dark_gray(),
            "b".bold().fg(ACCENT),
            " toggle background".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[5]);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use super::*;

    fn seeded_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.background.seed = Some(seed);
        config
    }

    fn draw(layout: &SiteLayout, columns: u16, rows: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(columns, rows)).unwrap();
        terminal.draw(|frame| layout.render(frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buffer: &Buffer, row: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, row)].symbol())
            .collect()
    }

    #[test]
    fn test_mount_and_tick() {
        let mut layout = SiteLayout::new(&seeded_config(1), 80, 24);
        assert!(layout.mount_background());
        assert_eq!(layout.next_deadline(), Some(Duration::from_millis(50)));
        assert_eq!(layout.advance_to(Duration::from_millis(500)), 10);
    }

    #[test]
    fn test_empty_terminal_skips_background() {
        let mut layout = SiteLayout::new(&seeded_config(1), 0, 0);
        assert!(!layout.mount_background());
        assert_eq!(layout.next_deadline(), None);
        assert_eq!(layout.advance_to(Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_toggle_unmounts_and_remounts() {
        let mut layout = SiteLayout::new(&seeded_config(1), 80, 24);
        layout.mount_background();
        layout.toggle_background();
        assert!(!layout.is_background_mounted());
        assert_eq!(layout.next_deadline(), None);
        assert_eq!(layout.advance_to(Duration::from_secs(1)), 0);

        layout.toggle_background();
        assert!(layout.is_background_mounted());
        assert_eq!(
            layout.next_deadline(),
            Some(Duration::from_millis(1050))
        );
    }

    #[test]
    fn test_renders_site_text() {
        let config = seeded_config(3);
        let mut layout = SiteLayout::new(&config, 80, 24);
        layout.mount_background();
        layout.advance_to(Duration::from_secs(2));

        let buffer = draw(&layout, 80, 24);
        let text: Vec<String> = (0..24).map(|row| row_text(&buffer, row)).collect();
        assert!(text.iter().any(|row| row.contains(config.site.title.as_str())));
        assert!(text[23].contains("toggle background"));
    }

    #[test]
    fn test_seeded_layouts_render_identically() {
        let render = || {
            let mut layout = SiteLayout::new(&seeded_config(11), 60, 20);
            layout.mount_background();
            layout.advance_to(Duration::from_secs(3));
            draw(&layout, 60, 20)
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_resize_reaches_background() {
        let mut layout = SiteLayout::new(&seeded_config(1), 80, 24);
        layout.mount_background();
        layout.resize(40, 24);
        let background = layout.background.as_ref().unwrap();
        assert_eq!(background.renderer().surface().grid(), (40, 24));
        assert_eq!(background.renderer().drops().len(), 20);
    }
}
