use crate::app::App;
use crate::hero;
use crate::nav::Section;
use crate::particles::Hue;
use crate::styles::{self, Tone};
use anyhow::Result;
use folio_terminal::PlaybackState;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Tabs,
        canvas::{Canvas, Line as CanvasLine, Points},
    },
};
use std::time::Instant;

/// Body width from which the terminal panel moves beside the document.
const WIDE_LAYOUT: u16 = 90;
const PARTICLE_ROWS: u16 = 10;
const NARROW_TERMINAL_ROWS: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub nav: Rect,
    pub document: Rect,
    pub terminal: Rect,
    pub particles: Option<Rect>,
    pub status: Rect,
}

impl Areas {
    /// Rows and columns available to the document text inside its border.
    pub fn document_inner(&self) -> (u16, u16) {
        (
            self.document.width.saturating_sub(2),
            self.document.height.saturating_sub(2),
        )
    }
}

pub fn areas(area: Rect, compact_nav: bool, particles: bool) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if compact_nav { 1 } else { 3 }),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    let body = rows[1];

    let (document, terminal, particles) = if body.width >= WIDE_LAYOUT {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(body);
        if particles {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(PARTICLE_ROWS)])
                .split(cols[1]);
            (cols[0], right[0], Some(right[1]))
        } else {
            (cols[0], cols[1], None)
        }
    } else {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(NARROW_TERMINAL_ROWS.min(body.height / 2)),
                Constraint::Min(3),
            ])
            .split(body);
        (split[1], split[0], None)
    };

    Areas {
        nav: rows[0],
        document,
        terminal,
        particles,
        status: rows[2],
    }
}

/// Fit the app to the terminal size and draw one frame.
pub fn draw<B: Backend>(term: &mut Terminal<B>, app: &mut App, now: Instant) -> Result<()> {
    let size = term.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let a = areas(area, app.is_scrolled(), app.particles().is_some());
    let (w, h) = a.document_inner();
    app.layout(w, h);
    if let Some(p) = a.particles {
        app.layout_particles(p.width, p.height);
    }
    term.draw(|frame| render(frame, app, now))?;
    Ok(())
}

pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    let theme = app.theme();
    let a = areas(area, app.is_scrolled(), app.particles().is_some());

    frame.render_widget(Block::default().style(styles::screen(theme)), area);

    // Navigation
    let tabs = Tabs::new(Section::ALL.iter().map(|s| s.label()))
        .select(app.active_section().index())
        .style(styles::nav_idle(theme))
        .highlight_style(styles::nav_active(theme))
        .divider(" · ");
    if app.is_scrolled() {
        frame.render_widget(tabs, a.nav);
    } else {
        let title = Span::styled(
            format!(" {} ", app.profile().name),
            styles::tone(theme, Tone::Title),
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border(theme))
            .title(Line::from(title));
        frame.render_widget(tabs.block(block), a.nav);
    }

    render_document(frame, app, a.document);
    render_terminal(frame, app, a.terminal, now);
    if let Some(rect) = a.particles {
        render_particles(frame, app, rect);
    }
    render_status(frame, app, a.status, now);
}

fn render_document(frame: &mut Frame, app: &App, rect: Rect) {
    let theme = app.theme();
    let doc = app.document();
    let start = app.scroll().min(doc.len());
    let end = (start + app.viewport()).min(doc.len());

    let lines: Vec<Line> = doc.lines()[start..end]
        .iter()
        .map(|line| {
            let hidden = line.card.is_some_and(|c| !app.is_revealed(c));
            Line::from(
                line.runs
                    .iter()
                    .map(|run| {
                        let style = if hidden {
                            styles::dim(theme)
                        } else {
                            styles::tone(theme, run.tone)
                        };
                        Span::styled(run.text.clone(), style)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let position = format!(" {}/{} ", end, doc.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border(theme))
        .title(format!(" {} ", app.active_section().label()))
        .title_top(Line::from(position).right_aligned());
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn render_terminal(frame: &mut Frame, app: &App, rect: Rect, now: Instant) {
    let theme = app.theme();
    let tf = app.frame();
    let height = usize::from(rect.height.saturating_sub(2));
    let lines = hero::terminal_lines(tf, app.caret_visible(now), height);

    let state = match tf.playback {
        PlaybackState::Playing => Span::styled(" ▶ playing ", styles::playing()),
        PlaybackState::Paused => Span::styled(" ⏸ paused ", styles::paused()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border(theme))
        .title(Line::from(vec![
            Span::styled(" ● ", Style::new().fg(Color::Red)),
            Span::styled("● ", Style::new().fg(Color::Yellow)),
            Span::styled("● ", Style::new().fg(Color::Green)),
            Span::styled(format!("{} ", app.prompt()), styles::dim(theme)),
        ]))
        .title_top(Line::from(state).right_aligned());
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn render_particles(frame: &mut Frame, app: &App, rect: Rect) {
    let Some(field) = app.particles() else {
        return;
    };
    let (w, h) = field.bounds();
    let links = field.links();
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| {
            let ps = field.particles();
            for link in &links {
                let (a, b) = (ps[link.a], ps[link.b]);
                let color = if link.strength > 0.5 {
                    Color::Blue
                } else {
                    Color::DarkGray
                };
                ctx.draw(&CanvasLine::new(a.x, a.y, b.x, b.y, color));
            }
            for p in ps {
                let bright = p.opacity > 0.45;
                let color = match (p.hue, bright) {
                    (Hue::Blue, true) => Color::LightBlue,
                    (Hue::Blue, false) => Color::Blue,
                    (Hue::Purple, true) => Color::LightMagenta,
                    (Hue::Purple, false) => Color::Magenta,
                };
                ctx.draw(&Points {
                    coords: &[(p.x, p.y)],
                    color,
                });
            }
        });
    frame.render_widget(canvas, rect);
}

fn render_status(frame: &mut Frame, app: &App, rect: Rect, now: Instant) {
    let theme = app.theme();
    let mut spans = vec![
        Span::raw(" "),
        match app.frame().playback {
            PlaybackState::Playing => Span::styled("▶", styles::playing()),
            PlaybackState::Paused => Span::styled("⏸", styles::paused()),
        },
        Span::styled(format!(" loop {} ", app.frame().loops + 1), styles::dim(theme)),
        Span::styled(format!("• {} ", theme.label()), styles::dim(theme)),
    ];
    match app.toast(now) {
        Some(t) => spans.push(Span::styled(format!(" {} ", t.text), styles::toast())),
        None => spans.push(Span::styled("? keys · q quit", styles::label())),
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppSettings;
    use crate::content::Profile;
    use crate::command::Command;
    use folio_terminal::{Animator, Script, TerminalFrame};
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let frame = TerminalFrame::capture(&Animator::new(Script::default_session()));
        let settings = AppSettings {
            particles: None,
            ..AppSettings::default()
        };
        App::new(Profile::builtin().unwrap(), settings, frame, Instant::now())
    }

    fn screen(term: &Terminal<TestBackend>) -> String {
        let buf = term.backend().buffer();
        let width = usize::from(buf.area.width);
        buf.content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn wide_layout_places_terminal_beside_document() {
        let a = areas(Rect::new(0, 0, 120, 40), false, true);
        assert_eq!(a.nav.height, 3);
        assert_eq!(a.status.height, 1);
        assert!(a.terminal.x > a.document.x);
        let p = a.particles.unwrap();
        assert_eq!(p.height, PARTICLE_ROWS);
        assert_eq!(p.x, a.terminal.x);
    }

    #[test]
    fn narrow_layout_stacks_and_drops_particles() {
        let a = areas(Rect::new(0, 0, 60, 40), true, true);
        assert_eq!(a.nav.height, 1);
        assert!(a.terminal.y < a.document.y);
        assert_eq!(a.document.width, 60);
        assert!(a.particles.is_none());
    }

    #[test]
    fn draws_nav_document_and_terminal() {
        let mut term = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut app = app();
        draw(&mut term, &mut app, Instant::now()).unwrap();
        let text = screen(&term);
        assert!(text.contains("Jordan Avery"));
        assert!(text.contains("Experience"));
        assert!(text.contains("guest@folio:~"));
        assert!(text.contains("playing"));
        assert_eq!(app.viewport(), 40 - 3 - 1 - 2);
    }

    #[test]
    fn status_bar_shows_toasts() {
        let mut term = Terminal::new(TestBackend::new(120, 30)).unwrap();
        let mut app = app();
        let now = Instant::now();
        app.apply(Command::Resume, now);
        draw(&mut term, &mut app, now).unwrap();
        assert!(screen(&term).contains("Resume: https://example.com"));
    }

    #[test]
    fn draws_particles_when_enabled() {
        use crate::particles::{ParticleField, ParticleSettings};
        use rand::{SeedableRng, rngs::StdRng};

        let mut term = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut app = app();
        app.set_particles(Some(ParticleField::new(
            ParticleSettings::default(),
            0.0,
            0.0,
            StdRng::seed_from_u64(3),
        )));
        draw(&mut term, &mut app, Instant::now()).unwrap();
        let field = app.particles().unwrap();
        assert!(field.bounds().0 > 0.0);
        // Braille dots live in U+2800..U+28FF.
        assert!(screen(&term).chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
    }
}
