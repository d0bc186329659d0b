use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, Result};

/// Shown on cards when a property has no images.
pub const PLACEHOLDER_IMAGE: &str = "https://images.unsplash.com/photo-1560518883-ce09059eeffa?w=400";

/// Feature chips rendered on a card before collapsing into `+N`.
const CARD_FEATURE_CHIPS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Apartment,
    Villa,
    Studio,
    House,
}

impl PropertyKind {
    pub const ALL: [Self; 4] = [Self::Apartment, Self::Villa, Self::House, Self::Studio];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::Villa => "villa",
            Self::Studio => "studio",
            Self::House => "house",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::Villa => "Villa",
            Self::Studio => "Studio",
            Self::House => "House",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Reserved,
    Sold,
}

impl ListingStatus {
    pub const ALL: [Self; 3] = [Self::Available, Self::Reserved, Self::Sold];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Reserved => "Reserved",
            Self::Sold => "Sold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Square meters.
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub region: String,
    pub area: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub status: ListingStatus,
    pub price: u64,
    pub area: Area,
    pub rooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    pub address: Address,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub images: Vec<String>,
    /// Meters.
    pub distance_to_sea: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Property {
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complex {
    pub id: String,
    pub name: String,
    pub developer: String,
    pub region: String,
    pub area: String,
    pub coordinates: Coordinates,
    pub price_range: PriceRange,
    pub total_units: u32,
    pub available_units: u32,
}

/// The session's immutable listing data. Construction enforces id uniqueness
/// and the per-entity invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingSet {
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default)]
    complexes: Vec<Complex>,
}

impl ListingSet {
    pub fn new(properties: Vec<Property>, complexes: Vec<Complex>) -> Result<Self> {
        let mut seen = HashSet::new();
        for property in &properties {
            if !seen.insert(property.id.as_str()) {
                return Err(invalid(format!("duplicate property id '{}'", property.id)));
            }
            if !property.coordinates.is_valid() {
                return Err(invalid(format!(
                    "property '{}' has invalid coordinates",
                    property.id
                )));
            }
            if !(property.area.total.is_finite() && property.area.total > 0.0) {
                return Err(invalid(format!(
                    "property '{}' must have a positive floor area",
                    property.id
                )));
            }
        }

        seen.clear();
        for complex in &complexes {
            if !seen.insert(complex.id.as_str()) {
                return Err(invalid(format!("duplicate complex id '{}'", complex.id)));
            }
            if !complex.coordinates.is_valid() {
                return Err(invalid(format!(
                    "complex '{}' has invalid coordinates",
                    complex.id
                )));
            }
            if complex.price_range.min > complex.price_range.max {
                return Err(invalid(format!(
                    "complex '{}' price range min exceeds max",
                    complex.id
                )));
            }
            if complex.available_units > complex.total_units {
                return Err(invalid(format!(
                    "complex '{}' has more available than total units",
                    complex.id
                )));
            }
        }

        Ok(Self {
            properties,
            complexes,
        })
    }

    /// Re-runs validation on deserialized data.
    pub fn validated(self) -> Result<Self> {
        Self::new(self.properties, self.complexes)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn complexes(&self) -> &[Complex] {
        &self.complexes
    }

    pub fn property(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn complex(&self, id: &str) -> Option<&Complex> {
        self.complexes.iter().find(|c| c.id == id)
    }

    /// Distinct developer names, sorted.
    pub fn developers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.complexes.iter().map(|c| c.developer.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

fn invalid(reason: String) -> PortalError {
    PortalError::InvalidData { reason }
}

/// `1350000` -> `€1,350,000`
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    out.push('€');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Meters below one kilometer, otherwise kilometers with one decimal,
/// halves rounded up.
pub fn format_distance(meters: u32) -> String {
    if meters >= 1000 {
        let tenths = (u64::from(meters) + 50) / 100;
        format!("{}.{}km", tenths / 10, tenths % 10)
    } else {
        format!("{meters}m")
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "[{}] {} ({})",
            self.id,
            self.title,
            self.status.label()
        )?;
        writeln!(
            f,
            "{}, {} | {}",
            self.address.region,
            self.address.area,
            self.kind.label()
        )?;
        writeln!(f, "{}", format_price(self.price))?;
        write!(
            f,
            "{} rooms | {} m² | {} to sea",
            self.rooms,
            self.area.total,
            format_distance(self.distance_to_sea)
        )?;
        if self.bathrooms > 0 {
            write!(f, " | {} baths", self.bathrooms)?;
        }
        writeln!(f)?;
        if !self.features.is_empty() {
            let shown: Vec<&str> = self
                .features
                .iter()
                .take(CARD_FEATURE_CHIPS)
                .map(String::as_str)
                .collect();
            write!(f, "{}", shown.join(", "))?;
            if self.features.len() > CARD_FEATURE_CHIPS {
                write!(f, " +{}", self.features.len() - CARD_FEATURE_CHIPS)?;
            }
            writeln!(f)?;
        }
        write!(f, "Image: {}", self.primary_image())
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[{}] {}", self.id, self.name)?;
        writeln!(f, "Developer: {}", self.developer)?;
        writeln!(f, "{}, {}", self.region, self.area)?;
        writeln!(f, "From {}", format_price(self.price_range.min))?;
        write!(
            f,
            "{} of {} units available",
            self.available_units, self.total_units
        )
    }
}
