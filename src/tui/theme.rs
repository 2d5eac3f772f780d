//! Centralized theme module for TUI color constants and styles

use crate::scoring::Activity;
use ratatui::prelude::*;

/// Which palette to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Classification colors
    pub activity_high: Color,
    pub activity_low: Color,

    // Checklist colors
    pub checkbox_on: Color,
    pub checkbox_off: Color,
    pub weight_color: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,

    // Styles
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Chart colors
    pub chart_line: Color,
    pub threshold_line: Color,
    pub axis_color: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            activity_high: Color::Red,
            activity_low: Color::Green,
            checkbox_on: Color::Cyan,
            checkbox_off: Color::DarkGray,
            weight_color: Color::Yellow,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            chart_line: Color::Cyan,
            threshold_line: Color::Red,
            axis_color: Color::Gray,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    pub fn light() -> Self {
        Self {
            activity_high: Color::Red,
            activity_low: Color::Indexed(28),
            checkbox_on: Color::Blue,
            checkbox_off: Color::Indexed(246),
            weight_color: Color::Indexed(130),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Indexed(244),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Indexed(240),
            title_color: Color::Blue,
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Indexed(246)),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Indexed(28),
            flash_error: Color::Red,
            chart_line: Color::Blue,
            threshold_line: Color::Red,
            axis_color: Color::Indexed(240),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn activity_color(&self, activity: Activity) -> Color {
        match activity {
            Activity::High => self.activity_high,
            Activity::Low => self.activity_low,
        }
    }
}

/// Pick a palette from the terminal background. Must run before the
/// terminal enters raw mode; dark when the terminal doesn't answer.
pub fn resolve_theme() -> Theme {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => Theme::Light,
        _ => Theme::Dark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_color() {
        let colors = ThemeColors::dark();
        assert_eq!(colors.activity_color(Activity::High), Color::Red);
        assert_eq!(colors.activity_color(Activity::Low), Color::Green);
    }

    #[test]
    fn test_for_theme() {
        assert_eq!(ThemeColors::for_theme(Theme::Light).title_color, Color::Blue);
        assert_eq!(ThemeColors::for_theme(Theme::Dark).title_color, Color::Cyan);
    }
}
