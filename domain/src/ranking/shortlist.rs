//! Primary picks and alternates

use super::ranker::ScoredRestaurant;
use super::shuffle::seeded_shuffle;
use crate::restaurant::RestaurantId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PICKS: usize = 10;
pub const DEFAULT_ALTERNATES: usize = 5;

/// The first N ranked restaurants plus the next M as alternates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shortlist {
    pub picks: Vec<ScoredRestaurant>,
    pub alternates: Vec<ScoredRestaurant>,
}

impl Shortlist {
    /// Split an already ranked list
    ///
    /// # Example
    ///
    /// ```
    /// use tablepick_domain::ranking::{ScoredRestaurant, Shortlist};
    /// use tablepick_domain::restaurant::Restaurant;
    /// use tablepick_domain::scoring::ScoreBreakdown;
    ///
    /// let ranked: Vec<ScoredRestaurant> = (0..4)
    ///     .map(|i| ScoredRestaurant {
    ///         restaurant: Restaurant::new(format!("r{i}"), format!("R{i}")),
    ///         score: 10.0 - i as f64,
    ///         breakdown: ScoreBreakdown::default(),
    ///     })
    ///     .collect();
    ///
    /// let list = Shortlist::split(&ranked, 2, 1);
    /// assert_eq!(list.picks.len(), 2);
    /// assert_eq!(list.alternates.len(), 1);
    /// assert_eq!(list.alternates[0].restaurant.id.as_str(), "r2");
    /// ```
    pub fn split(ranked: &[ScoredRestaurant], picks: usize, alternates: usize) -> Self {
        let pick_end = picks.min(ranked.len());
        let alt_end = (pick_end + alternates).min(ranked.len());
        Self {
            picks: ranked[..pick_end].to_vec(),
            alternates: ranked[pick_end..alt_end].to_vec(),
        }
    }

    /// Same list with both halves reordered by the room's seeded shuffle
    pub fn shuffled_for(&self, seed: &str) -> Self {
        Self {
            picks: seeded_shuffle(&self.picks, seed),
            alternates: seeded_shuffle(&self.alternates, seed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty() && self.alternates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.picks.len() + self.alternates.len()
    }

    /// Picks followed by alternates
    pub fn iter(&self) -> impl Iterator<Item = &ScoredRestaurant> {
        self.picks.iter().chain(self.alternates.iter())
    }

    pub fn contains(&self, id: &RestaurantId) -> bool {
        self.position(id).is_some()
    }

    /// Index in picks-then-alternates order
    pub fn position(&self, id: &RestaurantId) -> Option<usize> {
        self.iter().position(|s| &s.restaurant.id == id)
    }

    pub fn get(&self, id: &RestaurantId) -> Option<&ScoredRestaurant> {
        self.iter().find(|s| &s.restaurant.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::Restaurant;
    use crate::scoring::ScoreBreakdown;

    fn ranked(n: usize) -> Vec<ScoredRestaurant> {
        (0..n)
            .map(|i| ScoredRestaurant {
                restaurant: Restaurant::new(format!("r{}", i), format!("R{}", i)),
                score: 100.0 - i as f64,
                breakdown: ScoreBreakdown::default(),
            })
            .collect()
    }

    fn ids(list: &[ScoredRestaurant]) -> Vec<&str> {
        list.iter().map(|s| s.restaurant.id.as_str()).collect()
    }

    #[test]
    fn test_split_full() {
        let list = Shortlist::split(&ranked(20), DEFAULT_PICKS, DEFAULT_ALTERNATES);
        assert_eq!(list.picks.len(), 10);
        assert_eq!(ids(&list.alternates), vec!["r10", "r11", "r12", "r13", "r14"]);
        assert_eq!(list.len(), 15);
    }

    #[test]
    fn test_split_short_input() {
        let list = Shortlist::split(&ranked(12), DEFAULT_PICKS, DEFAULT_ALTERNATES);
        assert_eq!(list.picks.len(), 10);
        assert_eq!(ids(&list.alternates), vec!["r10", "r11"]);

        let list = Shortlist::split(&ranked(3), DEFAULT_PICKS, DEFAULT_ALTERNATES);
        assert_eq!(list.picks.len(), 3);
        assert!(list.alternates.is_empty());

        assert!(Shortlist::split(&[], DEFAULT_PICKS, DEFAULT_ALTERNATES).is_empty());
    }

    #[test]
    fn test_position_and_contains() {
        let list = Shortlist::split(&ranked(12), DEFAULT_PICKS, DEFAULT_ALTERNATES);
        assert_eq!(list.position(&RestaurantId::new("r11")), Some(11));
        assert!(list.contains(&RestaurantId::new("r0")));
        assert!(!list.contains(&RestaurantId::new("r99")));
    }

    #[test]
    fn test_shuffled_for_is_reproducible() {
        let list = Shortlist::split(&ranked(15), DEFAULT_PICKS, DEFAULT_ALTERNATES);
        let a = list.shuffled_for("ABCDEF");
        let b = list.shuffled_for("ABCDEF");
        assert_eq!(a, b);
        assert_eq!(
            ids(&a.picks),
            vec!["r1", "r4", "r6", "r8", "r9", "r0", "r7", "r5", "r2", "r3"]
        );
        // Alternates stay alternates
        assert!(a.alternates.iter().all(|s| list.alternates.contains(s)));
    }
}
