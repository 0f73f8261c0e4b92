use std::ops::Range;

/// Fraction of `card` rows that fall inside `viewport`.
pub fn intersection_ratio(card: &Range<usize>, viewport: &Range<usize>) -> f64 {
    let height = card.end.saturating_sub(card.start);
    if height == 0 {
        return 0.0;
    }
    let lo = card.start.max(viewport.start);
    let hi = card.end.min(viewport.end);
    hi.saturating_sub(lo) as f64 / height as f64
}

/// Remembers which skill cards have been on screen. Once revealed, a card
/// stays revealed.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    threshold: f64,
    revealed: Vec<bool>,
}

impl RevealTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            revealed: Vec::new(),
        }
    }

    /// Check every card against the viewport; returns how many became visible.
    pub fn observe(&mut self, cards: &[Range<usize>], viewport: Range<usize>) -> usize {
        if self.revealed.len() < cards.len() {
            self.revealed.resize(cards.len(), false);
        }
        let mut newly = 0;
        for (i, card) in cards.iter().enumerate() {
            if !self.revealed[i] && intersection_ratio(card, &viewport) >= self.threshold {
                self.revealed[i] = true;
                newly += 1;
            }
        }
        newly
    }

    pub fn is_revealed(&self, card: usize) -> bool {
        self.revealed.get(card).copied().unwrap_or(false)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| **r).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_counts_overlapping_rows() {
        assert_eq!(intersection_ratio(&(10..20), &(0..15)), 0.5);
        assert_eq!(intersection_ratio(&(10..20), &(20..30)), 0.0);
        assert_eq!(intersection_ratio(&(10..20), &(0..100)), 1.0);
        assert_eq!(intersection_ratio(&(5..5), &(0..100)), 0.0);
    }

    #[test]
    fn reveals_at_threshold_and_stays_revealed() {
        let cards = vec![0..10, 20..30, 40..50];
        let mut t = RevealTracker::new(0.3);

        // 2 of 10 rows visible: not enough.
        assert_eq!(t.observe(&cards, 18..22), 0);
        assert!(!t.is_revealed(1));

        // exactly 3 of 10
        assert_eq!(t.observe(&cards, 17..23), 1);
        assert!(t.is_revealed(1));

        assert_eq!(t.observe(&cards, 100..120), 0);
        assert!(t.is_revealed(1));
        assert!(!t.is_revealed(0));
        assert_eq!(t.revealed_count(), 1);

        assert_eq!(t.observe(&cards, 0..60), 2);
        assert_eq!(t.revealed_count(), 3);
        assert!(!t.is_revealed(99));
    }
}
