use crate::content::Proficiency;
use folio_common::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Semantic role of a piece of text; the active [`Theme`] picks the colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Heading,
    Subheading,
    Body,
    Muted,
    Accent,
    Badge,
    Bullet,
    Success,
    Tech,
    Skill(Proficiency),
}

/// Colour class of one hero terminal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Command,
    Commit,
    Metric,
    Output,
}

impl LineKind {
    pub fn classify(line: &str) -> Self {
        if line.starts_with('$') {
            LineKind::Command
        } else if ["feat:", "perf:", "fix:"].iter().any(|p| line.contains(p)) {
            LineKind::Commit
        } else if line.contains('%') || line.contains('✨') {
            LineKind::Metric
        } else {
            LineKind::Output
        }
    }
}

pub fn tone(theme: Theme, tone: Tone) -> Style {
    let dark = theme == Theme::Dark;
    let base = Style::default();
    match tone {
        Tone::Title => base
            .fg(if dark { Color::White } else { Color::Black })
            .add_modifier(Modifier::BOLD),
        Tone::Heading => base
            .fg(if dark { Color::LightBlue } else { Color::Blue })
            .add_modifier(Modifier::BOLD),
        Tone::Subheading => base
            .fg(if dark { Color::LightMagenta } else { Color::Magenta })
            .add_modifier(Modifier::BOLD),
        Tone::Body => base.fg(if dark { Color::Gray } else { Color::Black }),
        Tone::Muted => dim(theme),
        Tone::Accent => base.fg(if dark { Color::LightCyan } else { Color::Blue }),
        Tone::Badge => base
            .fg(if dark { Color::LightBlue } else { Color::Blue })
            .add_modifier(Modifier::ITALIC),
        Tone::Bullet => base.fg(Color::Magenta),
        Tone::Success => base.fg(if dark { Color::LightGreen } else { Color::Green }),
        Tone::Tech => base.fg(if dark { Color::Cyan } else { Color::DarkGray }),
        Tone::Skill(p) => base.fg(proficiency(p)).add_modifier(Modifier::BOLD),
    }
}

pub fn proficiency(p: Proficiency) -> Color {
    match p {
        Proficiency::Executive => Color::Rgb(245, 158, 11),
        Proficiency::Expert => Color::Rgb(34, 197, 94),
        Proficiency::Advanced => Color::Rgb(59, 130, 246),
        Proficiency::Proficient => Color::Rgb(168, 85, 247),
        Proficiency::Other => Color::DarkGray,
    }
}

pub fn terminal_line(kind: LineKind) -> Style {
    let fg = match kind {
        LineKind::Command => Color::LightBlue,
        LineKind::Commit => Color::LightGreen,
        LineKind::Metric => Color::Yellow,
        LineKind::Output => Color::Gray,
    };
    Style::default().fg(fg)
}

pub fn caret() -> Style {
    Style::default()
        .fg(Color::LightGreen)
        .add_modifier(Modifier::BOLD)
}

pub fn dim(theme: Theme) -> Style {
    Style::default().fg(match theme {
        Theme::Dark => Color::DarkGray,
        Theme::Light => Color::Gray,
    })
}

pub fn border(theme: Theme) -> Style {
    dim(theme)
}

pub fn nav_active(theme: Theme) -> Style {
    Style::default()
        .fg(match theme {
            Theme::Dark => Color::LightBlue,
            Theme::Light => Color::Blue,
        })
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn nav_idle(theme: Theme) -> Style {
    tone(theme, Tone::Body)
}

pub fn label() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn playing() -> Style {
    Style::default().fg(Color::LightGreen)
}

pub fn paused() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn toast() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightGreen)
        .add_modifier(Modifier::BOLD)
}

/// Background fill for the whole frame.
pub fn screen(theme: Theme) -> Style {
    match theme {
        Theme::Dark => Style::default(),
        Theme::Light => Style::default().bg(Color::White).fg(Color::Black),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_terminal_lines() {
        assert_eq!(LineKind::classify("$ whoami"), LineKind::Command);
        assert_eq!(
            LineKind::classify("* 3a9f2c1 perf: Cut ingest latency 38%"),
            LineKind::Commit
        );
        assert_eq!(LineKind::classify("* d1f6e23 fix: timers"), LineKind::Commit);
        assert_eq!(LineKind::classify("p99 latency... ✓ 4.2 ms (down 38%)"), LineKind::Metric);
        assert_eq!(LineKind::classify("✨ shipped"), LineKind::Metric);
        assert_eq!(LineKind::classify("services:"), LineKind::Output);
        assert_eq!(LineKind::classify(""), LineKind::Output);
        // `$` only counts at the start of the line.
        assert_eq!(LineKind::classify("cost: $5"), LineKind::Output);
    }

    #[test]
    fn proficiency_colours_are_distinct() {
        let all = [
            Proficiency::Executive,
            Proficiency::Expert,
            Proficiency::Advanced,
            Proficiency::Proficient,
            Proficiency::Other,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(proficiency(*a), proficiency(*b));
            }
        }
    }
}
