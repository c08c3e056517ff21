//! Restaurant entity

use super::attributes::{PartyRange, Portion, PriceTier, Spiciness, VenueKind};
use super::geo::GeoPoint;
use crate::core::string::normalize_tag;
use serde::{Deserialize, Serialize};

/// Stable restaurant identifier (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RestaurantId {
    fn from(s: &str) -> Self {
        RestaurantId::new(s)
    }
}

impl From<String> for RestaurantId {
    fn from(s: String) -> Self {
        RestaurantId::new(s)
    }
}

/// A restaurant record as supplied by the catalog (Entity)
///
/// Every attribute a predicate reads is optional. A missing attribute makes
/// the corresponding basic answer fail to match rather than erroring.
///
/// # Example
///
/// ```
/// use tablepick_domain::restaurant::{Restaurant, Spiciness};
///
/// let r = Restaurant::new("r-1", "Hongdae Tteokbokki")
///     .with_spiciness(Spiciness::Yes)
///     .with_tags(["Street Food", "cheap eats"])
///     .with_rating(4.4, 320);
/// assert!(r.has_tag("street food"));
/// assert_eq!(r.review_count, 320);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub categories: Vec<String>,
    pub price_tier: Option<PriceTier>,
    pub spiciness: Option<Spiciness>,
    pub party_size: Option<PartyRange>,
    pub portion: Option<Portion>,
    pub venue: Option<VenueKind>,
    /// Normalized via [`normalize_tag`]
    pub tags: Vec<String>,
    /// 0.0 to 5.0
    pub rating: f64,
    pub review_count: u32,
    pub like_count: u32,
    pub location: Option<GeoPoint>,
}

impl Restaurant {
    pub fn new(id: impl Into<RestaurantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            categories: Vec::new(),
            price_tier: None,
            spiciness: None,
            party_size: None,
            portion: None,
            venue: None,
            tags: Vec::new(),
            rating: 0.0,
            review_count: 0,
            like_count: 0,
            location: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_tier(mut self, tier: PriceTier) -> Self {
        self.price_tier = Some(tier);
        self
    }

    pub fn with_spiciness(mut self, spiciness: Spiciness) -> Self {
        self.spiciness = Some(spiciness);
        self
    }

    pub fn with_party_size(mut self, range: PartyRange) -> Self {
        self.party_size = Some(range);
        self
    }

    pub fn with_portion(mut self, portion: Portion) -> Self {
        self.portion = Some(portion);
        self
    }

    pub fn with_venue(mut self, venue: VenueKind) -> Self {
        self.venue = Some(venue);
        self
    }

    /// Replace the tag set; tags are normalized and deduplicated in order.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for tag in tags {
            let tag = normalize_tag(tag.as_ref());
            if !tag.is_empty() && !normalized.contains(&tag) {
                normalized.push(tag);
            }
        }
        self.tags = normalized;
        self
    }

    pub fn with_rating(mut self, rating: f64, review_count: u32) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    pub fn with_likes(mut self, like_count: u32) -> Self {
        self.like_count = like_count;
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        self.tags.iter().any(|t| *t == tag)
    }

    /// Location, if present and well-formed
    pub fn valid_location(&self) -> Option<&GeoPoint> {
        self.location.as_ref().filter(|p| p.is_valid())
    }
}
