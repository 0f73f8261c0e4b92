//! Section navigation: scroll-spy, header collapse and jump targets.
use std::ops::Range;

/// Rows kept above a section heading after a jump, so the probe row lands
/// inside the section.
pub const NAV_OFFSET: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    About,
    Experience,
    Projects,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::About,
        Section::Experience,
        Section::Projects,
        Section::Contact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::Contact => "Contact",
        }
    }

    pub fn index(self) -> usize {
        Section::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// `'1'` is Home, `'5'` is Contact.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Section::ALL.get(i).copied())
    }
}

/// Tracks which section the reader is in.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    active: Section,
    probe_offset: usize,
}

impl ScrollSpy {
    pub fn new(probe_offset: usize) -> Self {
        Self {
            active: Section::Home,
            probe_offset,
        }
    }

    /// Re-evaluate against the section ranges. When no range contains the
    /// probe row the previous section stays active.
    pub fn observe(&mut self, scroll: usize, sections: &[(Section, Range<usize>)]) -> Section {
        let probe = scroll + self.probe_offset;
        if let Some((section, _)) = sections.iter().find(|(_, r)| r.contains(&probe)) {
            self.active = *section;
        }
        self.active
    }

    /// Force the active section, e.g. after a jump that could not scroll far
    /// enough for the probe to reach it.
    pub fn pin(&mut self, section: Section) {
        self.active = section;
    }

    pub fn active(&self) -> Section {
        self.active
    }
}

pub fn is_scrolled(scroll: usize, threshold: usize) -> bool {
    scroll > threshold
}

/// Scroll offset that brings `section` into view, clamped to `max_scroll`.
///
/// ```
/// use folio_tui::nav::{jump_target, Section};
///
/// let sections = vec![(Section::Home, 0..10), (Section::About, 10..40)];
/// assert_eq!(jump_target(Section::About, &sections, 100), 9);
/// assert_eq!(jump_target(Section::About, &sections, 5), 5);
/// assert_eq!(jump_target(Section::Home, &sections, 100), 0);
/// ```
pub fn jump_target(section: Section, sections: &[(Section, Range<usize>)], max_scroll: usize) -> usize {
    if section == Section::Home {
        return 0;
    }
    sections
        .iter()
        .find(|(s, _)| *s == section)
        .map(|(_, r)| r.start.saturating_sub(NAV_OFFSET))
        .unwrap_or(0)
        .min(max_scroll)
}
