use ratatui::style::{Color, Modifier, Style};

use crate::config::Theme;

/// Theme-resolved color palette. Built once per frame from the persisted
/// theme; every style the views use goes through here.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    primary: Color,
    accent: Color,
    error: Color,
    success: Color,
    muted: Color,
    highlight_bg: Color,
    text: Color,
    status_bg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                primary: Color::Rgb(64, 128, 192),
                accent: Color::Rgb(192, 160, 64),
                error: Color::Rgb(192, 64, 64),
                success: Color::Rgb(96, 160, 96),
                muted: Color::Rgb(128, 128, 128),
                highlight_bg: Color::Rgb(48, 48, 64),
                text: Color::White,
                status_bg: Color::Rgb(32, 32, 40),
            },
            Theme::Light => Self {
                primary: Color::Rgb(32, 96, 160),
                accent: Color::Rgb(144, 112, 16),
                error: Color::Rgb(160, 32, 32),
                success: Color::Rgb(32, 112, 32),
                muted: Color::Rgb(96, 96, 96),
                highlight_bg: Color::Rgb(208, 216, 232),
                text: Color::Black,
                status_bg: Color::Rgb(224, 224, 232),
            },
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn list_item_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.primary)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default().bg(self.status_bg).fg(self.text)
    }

    pub fn help_key_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn help_desc_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Dim placeholder rows shown while a fetch is in flight
    pub fn skeleton_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::DIM)
    }
}
