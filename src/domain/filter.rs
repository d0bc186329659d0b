use serde::{Deserialize, Serialize};
use tracing::debug;

use super::listing::{Complex, ListingSet, ListingStatus, Property, PropertyKind};

/// Regions offered by the region selector.
pub const REGIONS: [&str; 5] = ["Limassol", "Paphos", "Nicosia", "Larnaca", "Famagusta"];

/// Room counts offered by the rooms selector.
pub const ROOM_CHOICES: [u32; 5] = [1, 2, 3, 4, 5];

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Raw price inputs as typed by the agent. Blank or non-numeric text leaves
/// that side of the range unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInput {
    #[serde(default)]
    pub min: String,
    #[serde(default)]
    pub max: String,
}

impl PriceInput {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (parse_bound(&self.min), parse_bound(&self.max))
    }

    pub fn is_empty(&self) -> bool {
        self.min.trim().is_empty() && self.max.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilters {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub price_range: PriceInput,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rooms: String,
    #[serde(default)]
    pub max_distance_to_sea: String,
}

impl PropertyFilters {
    pub fn is_empty(&self) -> bool {
        [
            &self.search_term,
            &self.region,
            &self.kind,
            &self.status,
            &self.rooms,
            &self.max_distance_to_sea,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
            && self.price_range.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexFilters {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub price_range: PriceInput,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub developer: String,
}

impl ComplexFilters {
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.region.trim().is_empty()
            && self.developer.trim().is_empty()
            && self.price_range.is_empty()
    }
}

/// Both criteria variants, kept side by side so switching the view mode
/// never discards the inactive one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub properties: PropertyFilters,
    pub complexes: ComplexFilters,
}

impl FilterState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Parse a numeric filter field. Decimals are kept as typed. Blank, negative,
/// infinite or non-numeric input is treated as "no constraint" rather than
/// rejected.
pub fn parse_bound(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            debug!(input = trimmed, "Ignoring non-numeric filter input");
            None
        }
    }
}

/// Listing prices stay far below 2^53, where the conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn amount(value: u64) -> f64 {
    value as f64
}

/// Exact-match field: `None` when blank.
fn exact(raw: &str) -> Option<&str> {
    if raw.trim().is_empty() { None } else { Some(raw) }
}

fn search_needle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn contains_any(needle: &str, haystacks: &[&str]) -> bool {
    haystacks.iter().any(|h| h.to_lowercase().contains(needle))
}

/// `min > max` with both sides set is an empty range.
fn inverted(bounds: (Option<f64>, Option<f64>)) -> bool {
    matches!(bounds, (Some(min), Some(max)) if min > max)
}

fn within(value: f64, (min, max): (Option<f64>, Option<f64>)) -> bool {
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
}

/// Criteria resolved once per pass so each listing is a plain predicate check.
struct PropertyQuery<'a> {
    needle: Option<String>,
    price: (Option<f64>, Option<f64>),
    region: Option<&'a str>,
    kind: Option<&'a str>,
    status: Option<&'a str>,
    rooms: Option<f64>,
    max_distance: Option<f64>,
}

impl<'a> PropertyQuery<'a> {
    fn new(criteria: &'a PropertyFilters) -> Self {
        Self {
            needle: search_needle(&criteria.search_term),
            price: criteria.price_range.bounds(),
            region: exact(&criteria.region),
            kind: exact(&criteria.kind),
            status: exact(&criteria.status),
            rooms: parse_bound(&criteria.rooms),
            max_distance: parse_bound(&criteria.max_distance_to_sea),
        }
    }

    /// A fractional room count matches nothing.
    #[allow(clippy::float_cmp)]
    fn matches(&self, property: &Property) -> bool {
        if let Some(ref needle) = self.needle
            && !contains_any(
                needle,
                &[
                    property.title.as_str(),
                    property.address.region.as_str(),
                    property.address.area.as_str(),
                ],
            )
        {
            return false;
        }
        within(amount(property.price), self.price)
            && self.region.is_none_or(|r| property.address.region == r)
            && self.kind.is_none_or(|k| property.kind.as_str() == k)
            && self.status.is_none_or(|s| property.status.as_str() == s)
            && self.rooms.is_none_or(|r| f64::from(property.rooms) == r)
            && self
                .max_distance
                .is_none_or(|d| f64::from(property.distance_to_sea) <= d)
    }
}

/// Properties satisfying every non-empty constraint, in input order.
pub fn filter_properties<'p>(
    criteria: &PropertyFilters,
    properties: &'p [Property],
) -> Vec<&'p Property> {
    let query = PropertyQuery::new(criteria);
    if inverted(query.price) {
        debug!("Property price range is inverted, nothing matches");
        return Vec::new();
    }
    properties.iter().filter(|p| query.matches(p)).collect()
}

/// Complexes satisfying every non-empty constraint, in input order. A
/// complex matches a price range when its own range overlaps it.
pub fn filter_complexes<'c>(
    criteria: &ComplexFilters,
    complexes: &'c [Complex],
) -> Vec<&'c Complex> {
    let needle = search_needle(&criteria.search_term);
    let (min, max) = criteria.price_range.bounds();
    if inverted((min, max)) {
        debug!("Complex price range is inverted, nothing matches");
        return Vec::new();
    }
    let region = exact(&criteria.region);
    let developer = exact(&criteria.developer);

    complexes
        .iter()
        .filter(|c| {
            needle
                .as_deref()
                .is_none_or(|n| contains_any(n, &[c.name.as_str(), c.region.as_str(), c.area.as_str()]))
                && min.is_none_or(|m| amount(c.price_range.max) >= m)
                && max.is_none_or(|m| amount(c.price_range.min) <= m)
                && region.is_none_or(|r| c.region == r)
                && developer.is_none_or(|d| c.developer == d)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Choices offered by the filter selectors.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub kinds: Vec<String>,
    pub statuses: Vec<String>,
    pub rooms: Vec<u32>,
    pub developers: Vec<String>,
}

impl FilterOptions {
    pub fn from_listings(listings: &ListingSet) -> Self {
        Self {
            regions: REGIONS.iter().map(ToString::to_string).collect(),
            kinds: PropertyKind::ALL
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
            statuses: ListingStatus::ALL
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            rooms: ROOM_CHOICES.to_vec(),
            developers: listings
                .developers()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl std::fmt::Display for FilterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Regions: {}", self.regions.join(", "))?;
        writeln!(f, "Types: {}", self.kinds.join(", "))?;
        writeln!(f, "Statuses: {}", self.statuses.join(", "))?;
        let rooms: Vec<String> = self.rooms.iter().map(ToString::to_string).collect();
        writeln!(f, "Rooms: {}", rooms.join(", "))?;
        write!(f, "Developers: {}", self.developers.join(", "))
    }
}
