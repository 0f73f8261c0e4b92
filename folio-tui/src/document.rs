//! The scrollable portfolio document.
//!
//! [`Document::build`] lays the profile out as pre-wrapped styled lines and
//! records where each [`Section`] and each skill card starts and ends, which
//! is what the scroll-spy and the reveal tracker work from.
use crate::content::{Profile, Skill};
use crate::nav::Section;
use crate::styles::Tone;
use std::ops::Range;
use textwrap::{Options, wrap};
use unicode_width::UnicodeWidthStr;

const MIN_WIDTH: usize = 20;

/// A run of text sharing one tone.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub tone: Tone,
}

impl Run {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocLine {
    pub runs: Vec<Run>,
    /// Skill card this line belongs to, if any.
    pub card: Option<usize>,
}

impl DocLine {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<DocLine>,
    sections: Vec<(Section, Range<usize>)>,
    cards: Vec<Range<usize>>,
    width: usize,
}

impl Document {
    pub fn build(profile: &Profile, width: usize) -> Self {
        let mut w = Writer::new(width.max(MIN_WIDTH));
        for section in Section::ALL {
            let start = w.lines.len();
            match section {
                Section::Home => home(&mut w, profile),
                Section::About => about(&mut w, profile),
                Section::Experience => experience(&mut w, profile),
                Section::Projects => projects(&mut w, profile),
                Section::Contact => contact(&mut w, profile),
            }
            let end = w.lines.len();
            w.sections.push((section, start..end));
        }
        Document {
            lines: w.lines,
            sections: w.sections,
            cards: w.cards,
            width: w.width,
        }
    }

    pub fn lines(&self) -> &[DocLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Wrap width the document was laid out for.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn sections(&self) -> &[(Section, Range<usize>)] {
        &self.sections
    }

    pub fn section_range(&self, section: Section) -> Option<Range<usize>> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, r)| r.clone())
    }

    pub fn cards(&self) -> &[Range<usize>] {
        &self.cards
    }
}

struct Writer {
    lines: Vec<DocLine>,
    sections: Vec<(Section, Range<usize>)>,
    cards: Vec<Range<usize>>,
    card: Option<usize>,
    width: usize,
}

impl Writer {
    fn new(width: usize) -> Self {
        Self {
            lines: Vec::new(),
            sections: Vec::new(),
            cards: Vec::new(),
            card: None,
            width,
        }
    }

    fn push(&mut self, runs: Vec<Run>) {
        self.lines.push(DocLine {
            runs,
            card: self.card,
        });
    }

    fn blank(&mut self) {
        self.push(Vec::new());
    }

    fn line(&mut self, text: impl Into<String>, tone: Tone) {
        self.push(vec![Run::new(text, tone)]);
    }

    fn heading(&mut self, title: &str) {
        let rule = "─".repeat(self.width.saturating_sub(title.width() + 1).min(24));
        self.push(vec![
            Run::new(title, Tone::Heading),
            Run::new(format!(" {rule}"), Tone::Muted),
        ]);
        self.blank();
    }

    fn para(&mut self, text: &str, tone: Tone) {
        self.prefixed("", Tone::Body, text, tone, "");
    }

    fn indented(&mut self, text: &str, tone: Tone) {
        self.prefixed("  ", Tone::Body, text, tone, "  ");
    }

    /// Wrap `text` after a styled `prefix`; continuation lines hang at `hang`.
    fn prefixed(&mut self, prefix: &str, prefix_tone: Tone, text: &str, tone: Tone, hang: &str) {
        if text.trim().is_empty() {
            return;
        }
        let opts = Options::new(self.width)
            .initial_indent(prefix)
            .subsequent_indent(hang);
        for (i, seg) in wrap(text, opts).into_iter().enumerate() {
            if i == 0 && !prefix.is_empty() {
                let rest = seg.strip_prefix(prefix).unwrap_or(seg.as_ref()).to_string();
                self.push(vec![Run::new(prefix, prefix_tone), Run::new(rest, tone)]);
            } else {
                self.line(seg.into_owned(), tone);
            }
        }
    }

    fn card(&mut self, skill: &Skill) {
        let idx = self.cards.len();
        let start = self.lines.len();
        self.card = Some(idx);
        let icon = if skill.icon.is_empty() { "◆" } else { skill.icon.as_str() };
        self.push(vec![
            Run::new(format!("  {icon} "), Tone::Accent),
            Run::new(skill.name.clone(), Tone::Title),
            Run::new(format!("  [{}]", skill.proficiency.label()), Tone::Skill(skill.proficiency)),
        ]);
        if !skill.description.is_empty() {
            self.prefixed("    ", Tone::Body, &skill.description, Tone::Muted, "    ");
        }
        self.card = None;
        self.cards.push(start..self.lines.len());
    }
}

fn joined(items: &[String]) -> String {
    items.join(" · ")
}

fn home(w: &mut Writer, p: &Profile) {
    w.blank();
    if !p.greeting.is_empty() {
        w.para(&p.greeting, Tone::Muted);
    }
    w.para(&p.name, Tone::Title);
    w.para(&p.headline, Tone::Heading);
    w.para(&p.tagline, Tone::Accent);
    w.blank();
    if !p.summary.is_empty() {
        w.para(&p.summary, Tone::Body);
        w.blank();
    }
    for m in &p.metrics {
        let mut runs = vec![
            Run::new("▸ ", Tone::Bullet),
            Run::new(m.value.clone(), Tone::Success),
            Run::new(format!("  {}", m.label), Tone::Body),
        ];
        if !m.detail.is_empty() {
            runs.push(Run::new(format!(" · {}", m.detail), Tone::Muted));
        }
        w.push(runs);
    }
    if !p.metrics.is_empty() {
        w.blank();
    }
    let contact = if p.location.is_empty() {
        p.email.clone()
    } else {
        format!("{}  ·  {}", p.location, p.email)
    };
    w.para(&contact, Tone::Muted);
    w.para(
        "[1-5] jump to a section · [space] pause the terminal · [e] get in touch · [?] keys",
        Tone::Muted,
    );
    w.blank();
}

fn about(w: &mut Writer, p: &Profile) {
    w.heading("About");
    if !p.about.intro.is_empty() {
        w.para(&p.about.intro, Tone::Body);
        w.blank();
    }
    if !p.about.journey.is_empty() {
        w.line("My Journey", Tone::Subheading);
        for paragraph in &p.about.journey {
            w.para(paragraph, Tone::Body);
            w.blank();
        }
    }
    if !p.about.achievements.is_empty() {
        w.line("Impact & Achievements", Tone::Subheading);
        for a in &p.about.achievements {
            let mut runs = vec![
                Run::new("▸ ", Tone::Bullet),
                Run::new(a.title.clone(), Tone::Title),
            ];
            if !a.badge.is_empty() {
                runs.push(Run::new(format!("  {}", a.badge), Tone::Badge));
            }
            w.push(runs);
            w.indented(&a.description, Tone::Muted);
        }
        w.blank();
    }
    if !p.skills.is_empty() {
        w.line("Skills & Expertise", Tone::Subheading);
        w.blank();
        for category in &p.skills {
            w.para(&category.category, Tone::Accent);
            for skill in &category.skills {
                w.card(skill);
            }
            w.blank();
        }
    }
}

fn experience(w: &mut Writer, p: &Profile) {
    w.heading("Experience");
    for job in &p.experience {
        w.para(&job.role, Tone::Title);
        let place = if job.location.is_empty() {
            job.company.clone()
        } else {
            format!("{} · {}", job.company, job.location)
        };
        w.para(&place, Tone::Accent);
        let when = if job.kind.is_empty() {
            job.period.clone()
        } else {
            format!("{} · {}", job.period, job.kind)
        };
        w.para(&when, Tone::Muted);
        for item in &job.achievements {
            w.prefixed("  › ", Tone::Bullet, item, Tone::Body, "    ");
        }
        if !job.technologies.is_empty() {
            w.prefixed("  Tech: ", Tone::Muted, &joined(&job.technologies), Tone::Tech, "        ");
        }
        w.blank();
    }
}

fn projects(w: &mut Writer, p: &Profile) {
    w.heading("Projects");
    for project in &p.projects {
        let mut runs = Vec::new();
        if !project.category.is_empty() {
            runs.push(Run::new(format!("[{}] ", project.category), Tone::Badge));
        }
        runs.push(Run::new(project.title.clone(), Tone::Title));
        w.push(runs);
        w.prefixed("  Challenge: ", Tone::Subheading, &project.challenge, Tone::Body, "    ");
        w.prefixed("  Solution: ", Tone::Accent, &project.solution, Tone::Body, "    ");
        w.prefixed("  ✓ Result: ", Tone::Success, &project.result, Tone::Body, "    ");
        if !project.technologies.is_empty() {
            w.prefixed("  Tech: ", Tone::Muted, &joined(&project.technologies), Tone::Tech, "        ");
        }
        w.blank();
    }
}

fn contact(w: &mut Writer, p: &Profile) {
    w.heading("Get In Touch");
    if !p.contact_blurb.is_empty() {
        w.para(&p.contact_blurb, Tone::Body);
        w.blank();
    }
    w.push(vec![
        Run::new("  Email      ", Tone::Muted),
        Run::new(p.email.clone(), Tone::Accent),
    ]);
    for link in &p.links {
        w.push(vec![
            Run::new(format!("  {:<11}", link.name), Tone::Muted),
            Run::new(link.url.clone(), Tone::Accent),
        ]);
    }
    if let Some(url) = &p.resume_url {
        w.push(vec![
            Run::new("  Resume     ", Tone::Muted),
            Run::new(url.clone(), Tone::Accent),
        ]);
    }
    w.blank();
    w.para(
        &format!("© {} · Built with Rust, ratatui and tokio", p.name),
        Tone::Muted,
    );
    w.blank();
}
