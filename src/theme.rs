use ratatui::style::{Color, Style};

/// Theme configuration for the editor
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the editor
    pub background: Color,

    /// Default text color
    pub text_fg: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Foreground color for active selection
    pub selection_fg: Color,

    /// Background color for active selection
    pub selection_bg: Color,

    /// Foreground color for heading blocks
    pub heading_fg: Color,

    /// Foreground color for the assistant panel border
    pub panel_border_fg: Color,

    /// Foreground color for popup menu items
    pub menu_fg: Color,

    /// Background color for popup menus
    pub menu_bg: Color,

    /// Background color for the selected popup menu item
    pub menu_selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            text_fg: Color::Reset,
            status_bar_fg: Color::Black,
            status_bar_bg: Color::Gray,
            selection_fg: Color::Black,
            selection_bg: Color::Cyan,
            heading_fg: Color::Yellow,
            panel_border_fg: Color::DarkGray,
            menu_fg: Color::White,
            menu_bg: Color::DarkGray,
            menu_selection_bg: Color::Blue,
        }
    }
}

impl Theme {
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text_fg).bg(self.background)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection_fg).bg(self.selection_bg)
    }
}
