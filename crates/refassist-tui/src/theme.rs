use ratatui::style::{Color, Modifier, Style};

use refassist_core::{FileStatus, ThemePreference, Tone};

/// Color theme for the TUI.
pub struct Theme {
    pub good: Color,
    pub bad: Color,
    pub warn: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Dark theme: light text on the terminal background, blue accents.
    pub fn dark() -> Self {
        Self {
            good: Color::Rgb(0, 200, 80),
            bad: Color::Rgb(255, 80, 80),
            warn: Color::Rgb(255, 200, 0),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Light theme for terminals with a pale background.
    pub fn light() -> Self {
        Self {
            good: Color::Rgb(0, 130, 50),
            bad: Color::Rgb(190, 30, 30),
            warn: Color::Rgb(170, 110, 0),

            header_fg: Color::White,
            header_bg: Color::Rgb(40, 90, 170),
            border: Color::Rgb(170, 170, 185),
            text: Color::Black,
            dim: Color::Rgb(100, 100, 115),
            highlight_bg: Color::Rgb(210, 222, 245),
            active: Color::Rgb(25, 95, 200),
            spinner: Color::Rgb(25, 95, 200),
            footer_fg: Color::Rgb(100, 100, 115),
            footer_bg: Color::Reset,
        }
    }

    pub fn for_preference(pref: ThemePreference) -> Self {
        match pref {
            ThemePreference::Light => Self::light(),
            ThemePreference::Dark => Self::dark(),
        }
    }

    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Neutral => self.text,
            Tone::Good => self.good,
            Tone::Bad => self.bad,
        }
    }

    pub fn file_status_style(&self, status: FileStatus) -> Style {
        match status {
            FileStatus::Ready => Style::default().fg(self.dim),
            FileStatus::Processing => Style::default()
                .fg(self.spinner)
                .add_modifier(Modifier::BOLD),
            FileStatus::Processed => Style::default().fg(self.good),
            FileStatus::Error => Style::default().fg(self.bad).add_modifier(Modifier::BOLD),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.active)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
