//! JSON restaurant catalog
//!
//! Reads restaurant records from a JSON file and normalizes the shapes real
//! feeds use. Three layouts are accepted:
//!
//! - a list of records: `[{"id": "r-1", ...}, ...]`
//! - a wrapper object: `{"restaurants": [...]}`
//! - a map keyed by id: `{"r-1": {...}, "r-2": {...}}`
//!
//! Attribute fields are lenient: `"price": "$$"` or `2`, `"tags"` as a list or
//! one comma separated string, `"spicy": true` or `"both"`, party size as
//! `"1~4"` or `"5+"`. An attribute that cannot be read is left unset so the
//! restaurant still ranks, just without that predicate.

use super::error::{CatalogLoadError, read_json};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tablepick_application::{CatalogError, RestaurantCatalog};
use tablepick_domain::core::string::{normalize_tag, split_tags};
use tablepick_domain::restaurant::{Portion, Spiciness, VenueKind};
use tablepick_domain::{GeoPoint, PartyRange, PriceTier, Restaurant};
use tracing::{debug, warn};

/// A string, or a list of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_items(self) -> Vec<String> {
        match self {
            StringOrList::One(s) => split_tags(&s),
            StringOrList::Many(items) => items,
        }
    }
}

/// A restaurant record as found in the file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRestaurant {
    id: Option<Value>,
    name: String,
    #[serde(alias = "category")]
    categories: Option<StringOrList>,
    #[serde(alias = "price_tier")]
    price: Option<Value>,
    #[serde(alias = "spicy")]
    spiciness: Option<Value>,
    #[serde(alias = "people")]
    party_size: Option<Value>,
    portion: Option<Value>,
    venue: Option<String>,
    tags: Option<StringOrList>,
    rating: Option<Value>,
    #[serde(alias = "reviews")]
    review_count: Option<Value>,
    #[serde(alias = "likes")]
    like_count: Option<Value>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "lon", alias = "longitude")]
    lng: Option<f64>,
}

/// Render a JSON scalar as text; arrays and objects are not scalars
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Classifies venues by category name
#[derive(Debug, Clone)]
pub struct VenueClassifier {
    drink_categories: Vec<String>,
}

impl VenueClassifier {
    pub fn new<I, S>(drink_categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            drink_categories: drink_categories
                .into_iter()
                .map(|c| normalize_tag(c.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    fn is_drink(&self, category: &str) -> bool {
        let category = normalize_tag(category);
        self.drink_categories
            .iter()
            .any(|drink| category.contains(drink.as_str()))
    }

    /// `Drink` if every category is a drink category, `Both` if some are,
    /// `Eat` if none are; `None` without categories
    pub fn classify(&self, categories: &[String]) -> Option<VenueKind> {
        if categories.is_empty() {
            return None;
        }
        let drinks = categories.iter().filter(|c| self.is_drink(c)).count();
        Some(match drinks {
            0 => VenueKind::Eat,
            n if n == categories.len() => VenueKind::Drink,
            _ => VenueKind::Both,
        })
    }
}

fn parse_venue(s: &str) -> Option<VenueKind> {
    match s.trim().to_lowercase().as_str() {
        "eat" | "food" | "restaurant" => Some(VenueKind::Eat),
        "drink" | "bar" => Some(VenueKind::Drink),
        "both" => Some(VenueKind::Both),
        _ => None,
    }
}

/// Turn one raw record into a restaurant; `None` when it has no usable id
fn normalize(raw: RawRestaurant, fallback_id: Option<&str>, venues: &VenueClassifier) -> Option<Restaurant> {
    let id = raw
        .id
        .as_ref()
        .and_then(scalar)
        .or_else(|| fallback_id.map(str::to_string))
        .filter(|id| !id.trim().is_empty())?;
    let name = if raw.name.trim().is_empty() {
        id.clone()
    } else {
        raw.name
    };

    let categories: Vec<String> = raw
        .categories
        .map(StringOrList::into_items)
        .unwrap_or_default();
    let venue = raw
        .venue
        .as_deref()
        .and_then(parse_venue)
        .or_else(|| venues.classify(&categories));

    let mut restaurant = Restaurant::new(id.as_str(), name).with_categories(categories);
    if let Some(tags) = raw.tags {
        restaurant = restaurant.with_tags(tags.into_items());
    }
    if let Some(venue) = venue {
        restaurant = restaurant.with_venue(venue);
    }

    match raw.price.as_ref().and_then(scalar).map(|s| s.parse::<PriceTier>()) {
        Some(Ok(tier)) => restaurant = restaurant.with_price_tier(tier),
        Some(Err(e)) => debug!("Restaurant {}: {}", id, e),
        None => {}
    }
    match raw.spiciness.as_ref().and_then(scalar).map(|s| s.parse::<Spiciness>()) {
        Some(Ok(spice)) => restaurant = restaurant.with_spiciness(spice),
        Some(Err(e)) => debug!("Restaurant {}: {}", id, e),
        None => {}
    }
    match raw.portion.as_ref().and_then(scalar).map(|s| s.parse::<Portion>()) {
        Some(Ok(portion)) => restaurant = restaurant.with_portion(portion),
        Some(Err(e)) => debug!("Restaurant {}: {}", id, e),
        None => {}
    }
    match raw.party_size.as_ref().and_then(scalar).map(|s| s.parse::<PartyRange>()) {
        Some(Ok(range)) => restaurant = restaurant.with_party_size(range),
        Some(Err(e)) => debug!("Restaurant {}: {}", id, e),
        None => {}
    }

    let rating = raw
        .rating
        .as_ref()
        .and_then(number)
        .map_or(0.0, |r| r.clamp(0.0, 5.0));
    let reviews = raw.review_count.as_ref().and_then(number).map_or(0, |n| n.max(0.0) as u32);
    let likes = raw.like_count.as_ref().and_then(number).map_or(0, |n| n.max(0.0) as u32);
    restaurant = restaurant.with_rating(rating, reviews).with_likes(likes);

    if let (Some(lat), Some(lng)) = (raw.lat, raw.lng) {
        restaurant = restaurant.with_location(GeoPoint::new(lat, lng));
    }

    Some(restaurant)
}

/// Split the document into `(fallback id, record)` pairs
fn records(path: &Path, document: Value) -> Result<Vec<(Option<String>, Value)>, CatalogLoadError> {
    match document {
        Value::Array(items) => Ok(items.into_iter().map(|v| (None, v)).collect()),
        Value::Object(mut map) => match map.remove("restaurants") {
            Some(Value::Array(items)) => Ok(items.into_iter().map(|v| (None, v)).collect()),
            Some(_) => Err(CatalogLoadError::Layout {
                path: path.to_path_buf(),
                reason: "\"restaurants\" must be a list".to_string(),
            }),
            None => Ok(map.into_iter().map(|(k, v)| (Some(k), v)).collect()),
        },
        _ => Err(CatalogLoadError::Layout {
            path: path.to_path_buf(),
            reason: "expected a list or an object of restaurants".to_string(),
        }),
    }
}

/// Restaurant catalog backed by a JSON file
///
/// The file is read on every call so edits show up without a restart.
pub struct JsonRestaurantCatalog {
    path: PathBuf,
    venues: VenueClassifier,
}

impl JsonRestaurantCatalog {
    pub fn new(path: impl Into<PathBuf>, venues: VenueClassifier) -> Self {
        Self {
            path: path.into(),
            venues,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<Restaurant>, CatalogLoadError> {
        let document = read_json(&self.path).await?;
        let mut restaurants = Vec::new();
        let mut skipped = 0usize;

        for (index, (key, value)) in records(&self.path, document)?.into_iter().enumerate() {
            let raw = match serde_json::from_value::<RawRestaurant>(value) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping restaurant #{} in {}: {}", index, self.path.display(), e);
                    skipped += 1;
                    continue;
                }
            };
            match normalize(raw, key.as_deref(), &self.venues) {
                Some(restaurant) => restaurants.push(restaurant),
                None => {
                    warn!("Skipping restaurant #{} in {}: no id", index, self.path.display());
                    skipped += 1;
                }
            }
        }

        debug!(
            "Loaded {} restaurants from {} ({} skipped)",
            restaurants.len(),
            self.path.display(),
            skipped
        );
        Ok(restaurants)
    }
}

#[async_trait]
impl RestaurantCatalog for JsonRestaurantCatalog {
    async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
        Ok(self.load().await?)
    }
}
