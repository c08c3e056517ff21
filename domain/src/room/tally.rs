//! Vote tallies, always rebuilt from records

use crate::restaurant::RestaurantId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub restaurant: RestaurantId,
    pub count: u32,
}

/// Per-restaurant counts in shortlist order
///
/// Never updated incrementally: the room rebuilds it from the current vote
/// records, so a changed vote can never be counted twice.
///
/// # Example
///
/// ```
/// use tablepick_domain::restaurant::RestaurantId;
/// use tablepick_domain::room::Tally;
///
/// let x = RestaurantId::new("x");
/// let y = RestaurantId::new("y");
/// let tally = Tally::count([&x, &y], [&x, &y, &x]);
/// assert_eq!(tally.get(&x), 2);
/// assert_eq!(tally.total(), 3);
/// assert_eq!(tally.leaders(), vec![&x]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally {
    entries: Vec<TallyEntry>,
}

impl Tally {
    /// Count `votes` over `order`; unlisted restaurants are appended in first-seen order
    pub fn count<'a>(
        order: impl IntoIterator<Item = &'a RestaurantId>,
        votes: impl IntoIterator<Item = &'a RestaurantId>,
    ) -> Self {
        let mut entries: Vec<TallyEntry> = order
            .into_iter()
            .map(|r| TallyEntry {
                restaurant: r.clone(),
                count: 0,
            })
            .collect();
        for vote in votes {
            match entries.iter_mut().find(|e| &e.restaurant == vote) {
                Some(e) => e.count += 1,
                None => entries.push(TallyEntry {
                    restaurant: vote.clone(),
                    count: 1,
                }),
            }
        }
        Self { entries }
    }

    pub fn get(&self, restaurant: &RestaurantId) -> u32 {
        self.entries
            .iter()
            .find(|e| &e.restaurant == restaurant)
            .map_or(0, |e| e.count)
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn max(&self) -> u32 {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }

    /// Restaurants sharing the highest non-zero count, in tally order
    pub fn leaders(&self) -> Vec<&RestaurantId> {
        let max = self.max();
        if max == 0 {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.count == max)
            .map(|e| &e.restaurant)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TallyEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<RestaurantId> {
        names.iter().map(|n| RestaurantId::new(*n)).collect()
    }

    #[test]
    fn test_count_keeps_order_and_zeros() {
        let order = ids(&["a", "b", "c"]);
        let votes = ids(&["c", "c"]);
        let tally = Tally::count(&order, &votes);

        let listed: Vec<_> = tally.iter().map(|e| (e.restaurant.as_str(), e.count)).collect();
        assert_eq!(listed, vec![("a", 0), ("b", 0), ("c", 2)]);
    }

    #[test]
    fn test_leaders_tied() {
        let order = ids(&["a", "b", "c"]);
        let votes = ids(&["b", "a", "b", "a"]);
        let tally = Tally::count(&order, &votes);
        let leaders: Vec<_> = tally.leaders().into_iter().map(|r| r.as_str()).collect();
        assert_eq!(leaders, vec!["a", "b"]);
    }

    #[test]
    fn test_no_votes_no_leaders() {
        let order = ids(&["a"]);
        let tally = Tally::count(&order, &[]);
        assert!(tally.leaders().is_empty());
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_unlisted_vote_appended() {
        let order = ids(&["a"]);
        let votes = ids(&["z"]);
        let tally = Tally::count(&order, &votes);
        assert_eq!(tally.get(&RestaurantId::new("z")), 1);
    }
}
