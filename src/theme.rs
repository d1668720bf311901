use ratatui::style::Color;

use crate::cycle::CycleStatus;

pub const THEMES: &[&str] = &["default", "nord", "dracula", "gruvbox", "solarized"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub running_color: Color,
    pub interrupted_color: Color,
    pub finished_color: Color,
    pub border_color: Color,
    pub accent_color: Color,
}

impl Theme {
    pub fn status_color(&self, status: CycleStatus) -> Color {
        match status {
            CycleStatus::Running => self.running_color,
            CycleStatus::Interrupted => self.interrupted_color,
            CycleStatus::Finished => self.finished_color,
        }
    }

    /// Unknown names fall back to the default palette.
    pub fn named(name: &str) -> Self {
        match name {
            "nord" => Theme {
                running_color: Color::Rgb(136, 192, 255),
                interrupted_color: Color::Rgb(255, 20, 60),
                finished_color: Color::Rgb(0, 255, 100),
                border_color: Color::Rgb(100, 200, 255),
                accent_color: Color::Rgb(255, 100, 255),
            },
            "dracula" => Theme {
                running_color: Color::Rgb(189, 147, 249),
                interrupted_color: Color::Rgb(255, 0, 85),
                finished_color: Color::Rgb(0, 255, 0),
                border_color: Color::Rgb(200, 100, 255),
                accent_color: Color::Rgb(255, 0, 255),
            },
            "gruvbox" => Theme {
                running_color: Color::Rgb(254, 128, 25),
                interrupted_color: Color::Rgb(255, 50, 0),
                finished_color: Color::Rgb(255, 255, 0),
                border_color: Color::Rgb(255, 200, 100),
                accent_color: Color::Rgb(255, 150, 0),
            },
            "solarized" => Theme {
                running_color: Color::Rgb(42, 161, 152),
                interrupted_color: Color::Rgb(255, 0, 0),
                finished_color: Color::Rgb(150, 255, 0),
                border_color: Color::Rgb(100, 200, 255),
                accent_color: Color::Rgb(255, 200, 0),
            },
            _ => Theme {
                running_color: Color::Rgb(100, 181, 246),
                interrupted_color: Color::Rgb(255, 0, 100),
                finished_color: Color::Rgb(0, 255, 150),
                border_color: Color::Rgb(0, 200, 255),
                accent_color: Color::Rgb(255, 100, 0),
            },
        }
    }
}
