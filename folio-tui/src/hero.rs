//! Rendering helpers for the hero terminal panel.
use crate::styles::{self, LineKind};
use folio_terminal::{Phase, Resume, TerminalFrame};
use ratatui::text::{Line, Span};
use std::time::{Duration, Instant};

/// Square-wave caret: visible for one period, hidden for the next.
#[derive(Debug, Clone, Copy)]
pub struct CursorBlink {
    origin: Instant,
    period: Duration,
}

impl CursorBlink {
    pub fn new(period: Duration, origin: Instant) -> Self {
        Self { origin, period }
    }

    pub fn visible(&self, now: Instant) -> bool {
        let period = self.period.as_millis().max(1);
        let elapsed = now.saturating_duration_since(self.origin).as_millis();
        (elapsed / period) % 2 == 0
    }
}

/// True while a line is still being typed (the caret has somewhere to sit).
pub fn shows_caret(phase: Phase) -> bool {
    matches!(phase, Phase::Typing | Phase::Paused(Resume::Typing))
}

/// Styled tail of the frame that fits in `height` rows, newest line last.
pub fn terminal_lines(frame: &TerminalFrame, caret_on: bool, height: usize) -> Vec<Line<'static>> {
    let total = frame.lines.len();
    let skip = total.saturating_sub(height);
    let last = total.saturating_sub(1);
    frame
        .lines
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, text)| {
            let mut spans = vec![Span::styled(
                text.clone(),
                styles::terminal_line(LineKind::classify(text)),
            )];
            if i == last && caret_on && shows_caret(frame.phase) {
                spans.push(Span::styled("|", styles::caret()));
            }
            Line::from(spans)
        })
        .collect()
}
