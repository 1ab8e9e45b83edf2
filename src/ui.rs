use ratatui::{prelude::*, widgets::*};

use crate::models::{Health, Severity, Theme, TransferStatus};

/// Colours for one theme
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                fg: Color::White,
                bg: Color::Reset,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                success: Color::Green,
                warning: Color::Yellow,
                error: Color::Red,
            },
            Theme::Light => Palette {
                fg: Color::Black,
                bg: Color::White,
                muted: Color::Gray,
                accent: Color::Blue,
                success: Color::Green,
                warning: Color::Rgb(180, 120, 0),
                error: Color::Red,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.success,
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.accent,
        }
    }

    pub fn status(&self, status: TransferStatus) -> Color {
        match status {
            TransferStatus::Completed => self.success,
            TransferStatus::Downloading => self.accent,
            TransferStatus::Uploading => Color::Magenta,
            TransferStatus::Failed => self.error,
            TransferStatus::Paused | TransferStatus::Pending => self.muted,
        }
    }

    /// Green from 90, amber from 70, red below
    pub fn trust(&self, score: u8) -> Color {
        match score {
            90..=u8::MAX => self.success,
            70..=89 => self.warning,
            _ => self.error,
        }
    }

    pub fn health(&self, health: Health) -> Color {
        match health {
            Health::Excellent => self.success,
            Health::Good => self.warning,
            Health::Poor => self.error,
        }
    }

    /// Bordered block, highlighted when focused
    pub fn block<'a>(&self, title: impl Into<Line<'a>>, is_focused: bool) -> Block<'a> {
        let border = if is_focused { self.accent } else { self.muted };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(self.base())
            .title(title)
    }
}

/// Renders page tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize, palette: &Palette) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(palette.muted))
        .highlight_style(Style::default().fg(palette.accent).bold())
        .divider("|")
}

/// Renders a single-line text input
pub fn render_input<'a>(content: &'a str, title: &'a str, is_editing: bool, palette: &Palette) -> Paragraph<'a> {
    let text = if is_editing {
        Line::from(vec![Span::raw(content), Span::styled("█", Style::default().fg(palette.accent))])
    } else {
        Line::from(content)
    };
    Paragraph::new(text).block(palette.block(title, is_editing))
}

/// Text progress bar such as `[#####-----]`
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}

/// Human readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return String::from("0 B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

pub fn format_speed(bytes_per_sec: u64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec))
}

/// Centered rectangle for popups
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(524_288_000), "500.00 MB");
        assert_eq!(format_speed(2_097_152), "2.00 MB/s");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(50.0, 10), "[#####-----]");
        assert_eq!(progress_bar(150.0, 4), "[####]");
        assert_eq!(progress_bar(0.0, 4), "[----]");
    }

    #[test]
    fn test_trust_colors() {
        let palette = Palette::for_theme(Theme::Dark);
        assert_eq!(palette.trust(95), palette.success);
        assert_eq!(palette.trust(70), palette.warning);
        assert_eq!(palette.trust(12), palette.error);
    }

    #[test]
    fn test_health_colors() {
        let palette = Palette::for_theme(Theme::Light);
        assert_eq!(palette.health(Health::of(10, 20)), palette.success);
        assert_eq!(palette.health(Health::of(1, 50)), palette.error);
    }
}
