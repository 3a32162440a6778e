use ratatui::style::Color;

/// Colors used across the table, the popups and the hint bar.
#[derive(Clone, Copy, Debug, Default)]
pub enum Theme {
    #[default]
    Dark,
}

impl Theme {
    pub const fn title(&self) -> Color {
        Color::LightYellow
    }
    pub const fn border(&self) -> Color {
        Color::Rgb(97, 175, 239)
    }
    pub const fn focus_border(&self) -> Color {
        Color::LightCyan
    }
    pub const fn idle_border(&self) -> Color {
        Color::DarkGray
    }

    pub const fn header_fg(&self) -> Color {
        Color::Rgb(20, 22, 26)
    }
    pub const fn header_focus_bg(&self) -> Color {
        Color::Rgb(86, 182, 194)
    }
    pub const fn stripe_even(&self) -> Color {
        Color::Rgb(36, 40, 47)
    }
    pub const fn stripe_odd(&self) -> Color {
        Color::Rgb(28, 31, 37)
    }
    pub const fn cursor_fg(&self) -> Color {
        Color::Rgb(20, 22, 26)
    }
    pub const fn cursor_bg(&self) -> Color {
        Color::Rgb(97, 175, 239)
    }

    /// Placeholder bars while a page loads.
    pub const fn skeleton(&self) -> Color {
        Color::Rgb(70, 76, 88)
    }
    pub const fn muted(&self) -> Color {
        Color::Gray
    }
    pub const fn value_fg(&self) -> Color {
        Color::White
    }
    pub const fn error(&self) -> Color {
        Color::LightRed
    }
    /// Column picked up in the column menu.
    pub const fn grabbed(&self) -> Color {
        Color::Rgb(229, 192, 123)
    }
    pub const fn overlay_bg(&self) -> Color {
        Color::Rgb(14, 16, 20)
    }
}
