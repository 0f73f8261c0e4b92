//! UI state behind the TUI actor, kept free of any terminal handle so it can
//! be driven directly in tests.
use crate::command::{Command, HELP};
use crate::content::Profile;
use crate::document::Document;
use crate::hero::CursorBlink;
use crate::nav::{self, ScrollSpy, Section};
use crate::particles::{ParticleField, ParticleSettings};
use crate::reveal::RevealTracker;
use crate::toast::{Toast, Toasts};
use folio_common::Theme;
use folio_config::FolioConfig;
use folio_terminal::{PlaybackState, TerminalFrame};
use std::time::{Duration, Instant};

const INITIAL_WIDTH: usize = 80;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub theme: Theme,
    pub prompt: String,
    pub reveal_threshold: f64,
    pub probe_offset: usize,
    pub scrolled_threshold: usize,
    pub toast_ttl: Duration,
    pub blink_period: Duration,
    /// `None` disables the particle field.
    pub particles: Option<ParticleSettings>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::from(&FolioConfig::default())
    }
}

impl From<&FolioConfig> for AppSettings {
    fn from(cfg: &FolioConfig) -> Self {
        Self {
            theme: cfg.ui.theme,
            prompt: cfg.terminal.prompt.clone(),
            reveal_threshold: cfg.ui.reveal_threshold,
            probe_offset: usize::from(cfg.ui.probe_offset),
            scrolled_threshold: usize::from(cfg.ui.scrolled_threshold),
            toast_ttl: Duration::from_millis(cfg.ui.toast_ms),
            blink_period: Duration::from_millis(cfg.terminal.cursor_blink_ms),
            particles: cfg
                .particles
                .enabled
                .then(|| ParticleSettings::from(&cfg.particles)),
        }
    }
}

/// Side effects the actor has to carry out for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    TogglePlayback,
    Quit,
}

pub struct App {
    profile: Profile,
    settings: AppSettings,
    theme: Theme,
    doc: Document,
    scroll: usize,
    viewport: usize,
    spy: ScrollSpy,
    reveal: RevealTracker,
    particles: Option<ParticleField>,
    blink: CursorBlink,
    toasts: Toasts,
    frame: TerminalFrame,
}

impl App {
    pub fn new(profile: Profile, settings: AppSettings, frame: TerminalFrame, now: Instant) -> Self {
        let doc = Document::build(&profile, INITIAL_WIDTH);
        let particles = settings
            .particles
            .map(|s| ParticleField::from_entropy(s, 0.0, 0.0));
        Self {
            theme: settings.theme,
            spy: ScrollSpy::new(settings.probe_offset),
            reveal: RevealTracker::new(settings.reveal_threshold),
            blink: CursorBlink::new(settings.blink_period, now),
            toasts: Toasts::new(settings.toast_ttl),
            profile,
            settings,
            doc,
            scroll: 0,
            viewport: 0,
            particles,
            frame,
        }
    }

    /// Replace the particle field, e.g. with a seeded one.
    pub fn set_particles(&mut self, field: Option<ParticleField>) {
        self.particles = field;
    }

    /// Fit the document to the panel it is drawn in.
    pub fn layout(&mut self, doc_width: u16, viewport: u16) {
        let width = usize::from(doc_width);
        if width != self.doc.width() {
            let next = Document::build(&self.profile, width);
            if next.width() != self.doc.width() {
                // Keep the reader in the same section across a re-wrap.
                let section = self.spy.active();
                self.doc = next;
                if let Some(range) = self.doc.section_range(section) {
                    self.scroll = range.start;
                }
            }
        }
        self.viewport = usize::from(viewport);
        self.scroll = self.scroll.min(self.max_scroll());
        self.observe();
    }

    pub fn layout_particles(&mut self, cols: u16, rows: u16) {
        if let Some(field) = &mut self.particles {
            field.resize_cells(cols, rows);
        }
    }

    pub fn apply(&mut self, cmd: Command, now: Instant) -> Option<Request> {
        let page = self.viewport.saturating_sub(1).max(1);
        match cmd {
            Command::TogglePlayback => return Some(Request::TogglePlayback),
            Command::Quit => return Some(Request::Quit),
            Command::Scroll(delta) => self.scroll_to(self.scroll.saturating_add_signed(delta)),
            Command::PageDown => self.scroll_to(self.scroll.saturating_add(page)),
            Command::PageUp => self.scroll_to(self.scroll.saturating_sub(page)),
            Command::Top => self.scroll_to(0),
            Command::Bottom => self.scroll_to(self.max_scroll()),
            Command::Jump(section) => self.jump(section),
            Command::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.toasts.push(format!("Theme: {}", self.theme.label()), now);
            }
            Command::Email => {
                let text = format!("Email: {}", self.profile.email);
                self.toasts.push(text, now);
            }
            Command::LinkedIn => {
                let text = match self.profile.link("linkedin") {
                    Some(link) => format!("LinkedIn: {}", link.url),
                    None => "No LinkedIn profile configured".to_string(),
                };
                self.toasts.push(text, now);
            }
            Command::Resume => {
                let text = match &self.profile.resume_url {
                    Some(url) => format!("Resume: {url}"),
                    None => "No resume configured".to_string(),
                };
                self.toasts.push(text, now);
            }
            Command::Help => self.toasts.push(HELP, now),
        }
        None
    }

    pub fn playback_changed(&mut self, state: PlaybackState, now: Instant) {
        let text = match state {
            PlaybackState::Paused => "Terminal paused",
            PlaybackState::Playing => "Terminal resumed",
        };
        self.toasts.push(text, now);
    }

    pub fn notice(&mut self, text: impl Into<String>, now: Instant) {
        self.toasts.push(text, now);
    }

    pub fn set_frame(&mut self, frame: TerminalFrame) {
        self.frame = frame;
    }

    /// Per-frame housekeeping: move particles and expire toasts.
    pub fn advance(&mut self, now: Instant) {
        if let Some(field) = &mut self.particles {
            field.step();
        }
        self.toasts.prune(now);
    }

    fn scroll_to(&mut self, target: usize) {
        let target = target.min(self.max_scroll());
        if target != self.scroll {
            self.scroll = target;
            self.observe();
        }
    }

    fn jump(&mut self, section: Section) {
        let target = nav::jump_target(section, self.doc.sections(), self.max_scroll());
        self.scroll_to(target);
        self.spy.pin(section);
    }

    fn observe(&mut self) {
        self.spy.observe(self.scroll, self.doc.sections());
        let view = self.scroll..self.scroll + self.viewport;
        let newly = self.reveal.observe(self.doc.cards(), view);
        if newly > 0 {
            tracing::trace!(target = "folio-tui", newly, "skill cards revealed");
        }
    }

    pub fn max_scroll(&self) -> usize {
        self.doc.len().saturating_sub(self.viewport)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn prompt(&self) -> &str {
        &self.settings.prompt
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn active_section(&self) -> Section {
        self.spy.active()
    }

    pub fn is_scrolled(&self) -> bool {
        nav::is_scrolled(self.scroll, self.settings.scrolled_threshold)
    }

    pub fn is_revealed(&self, card: usize) -> bool {
        self.reveal.is_revealed(card)
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    pub fn frame(&self) -> &TerminalFrame {
        &self.frame
    }

    pub fn caret_visible(&self, now: Instant) -> bool {
        self.blink.visible(now)
    }

    pub fn toast(&self, now: Instant) -> Option<&Toast> {
        self.toasts.current(now)
    }
}
