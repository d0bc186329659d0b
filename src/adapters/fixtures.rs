use async_trait::async_trait;
use tracing::debug;

use crate::domain::listing::{
    Address, Area, Complex, Coordinates, ListingSet, ListingStatus, PriceRange, Property,
    PropertyKind,
};
use crate::error::Result;
use crate::ports::listing_source::ListingSource;

/// Built-in demo data set: properties and complexes across Cyprus.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

#[async_trait]
impl ListingSource for FixtureSource {
    async fn load(&self) -> Result<ListingSet> {
        let listings = ListingSet::new(fixture_properties(), fixture_complexes())?;
        debug!(
            properties = listings.properties().len(),
            complexes = listings.complexes().len(),
            "Loaded built-in fixtures"
        );
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "fixtures"
    }
}

#[allow(clippy::too_many_arguments)]
fn property(
    id: &str,
    title: &str,
    kind: PropertyKind,
    status: ListingStatus,
    price: u64,
    area: f64,
    (rooms, bathrooms): (u32, u32),
    (region, sub_area): (&str, &str),
    (lat, lng): (f64, f64),
    distance_to_sea: u32,
    features: &[&str],
) -> Property {
    Property {
        id: id.into(),
        title: title.into(),
        kind,
        status,
        price,
        area: Area { total: area },
        rooms,
        bathrooms,
        address: Address {
            region: region.into(),
            area: sub_area.into(),
        },
        coordinates: Coordinates { lat, lng },
        images: Vec::new(),
        distance_to_sea,
        features: features.iter().map(ToString::to_string).collect(),
    }
}

pub fn fixture_properties() -> Vec<Property> {
    use ListingStatus::{Available, Reserved, Sold};
    use PropertyKind::{Apartment, House, Studio, Villa};

    vec![
        property(
            "451",
            "Sea-view villa with pool in Peyia",
            Villa,
            Available,
            1_350_000,
            240.0,
            (3, 3),
            ("Paphos", "Peyia"),
            (34.8853, 32.3843),
            850,
            &["Pool", "Sea view", "Garden", "Parking"],
        ),
        property(
            "452",
            "Modern apartment near the marina",
            Apartment,
            Available,
            580_000,
            118.0,
            (3, 2),
            ("Limassol", "Marina"),
            (34.6700, 33.0417),
            150,
            &["Sea view", "Gym", "Concierge"],
        ),
        property(
            "453",
            "Compact studio by Finikoudes",
            Studio,
            Reserved,
            145_000,
            42.0,
            (1, 1),
            ("Larnaca", "Finikoudes"),
            (34.9137, 33.6380),
            300,
            &["Furnished"],
        ),
        property(
            "454",
            "Family house in Strovolos",
            House,
            Sold,
            420_000,
            190.0,
            (4, 2),
            ("Nicosia", "Strovolos"),
            (35.1436, 33.3420),
            42_000,
            &["Garden", "Parking", "Storage"],
        ),
        property(
            "455",
            "Two-bedroom apartment in Germasogeia",
            Apartment,
            Available,
            395_000,
            96.0,
            (2, 2),
            ("Limassol", "Germasogeia"),
            (34.7011, 33.0860),
            1200,
            &["Pool", "Parking"],
        ),
        property(
            "456",
            "Beachfront villa in Protaras",
            Villa,
            Reserved,
            2_100_000,
            320.0,
            (5, 4),
            ("Famagusta", "Protaras"),
            (35.0125, 34.0583),
            60,
            &["Pool", "Sea view", "Private beach", "Jacuzzi", "Smart home"],
        ),
        property(
            "457",
            "Townhouse in Kato Paphos",
            House,
            Available,
            310_000,
            130.0,
            (3, 2),
            ("Paphos", "Kato Paphos"),
            (34.7587, 32.4162),
            700,
            &["Roof garden"],
        ),
    ]
}

fn complex(
    id: &str,
    name: &str,
    developer: &str,
    (region, sub_area): (&str, &str),
    (lat, lng): (f64, f64),
    (min, max): (u64, u64),
    (available_units, total_units): (u32, u32),
) -> Complex {
    Complex {
        id: id.into(),
        name: name.into(),
        developer: developer.into(),
        region: region.into(),
        area: sub_area.into(),
        coordinates: Coordinates { lat, lng },
        price_range: PriceRange { min, max },
        total_units,
        available_units,
    }
}

pub fn fixture_complexes() -> Vec<Complex> {
    vec![
        complex(
            "cx-1",
            "Limassol Marina Residences",
            "Antaria Development",
            ("Limassol", "Marina"),
            (34.6712, 33.0398),
            (450_000, 3_200_000),
            (12, 64),
        ),
        complex(
            "cx-2",
            "Peyia Heights",
            "Athanasiou Group",
            ("Paphos", "Peyia"),
            (34.8870, 32.3902),
            (280_000, 1_400_000),
            (9, 24),
        ),
        complex(
            "cx-3",
            "Mackenzie Bay",
            "Cyprus Developers Ltd",
            ("Larnaca", "Mackenzie"),
            (34.8942, 33.6288),
            (160_000, 690_000),
            (31, 48),
        ),
        complex(
            "cx-4",
            "Strovolos Urban Park",
            "Urban Developments",
            ("Nicosia", "Strovolos"),
            (35.1401, 33.3375),
            (190_000, 520_000),
            (0, 36),
        ),
        complex(
            "cx-5",
            "Amathus Cliffs",
            "Luxury Estates Cyprus",
            ("Limassol", "Amathus"),
            (34.7125, 33.1420),
            (1_100_000, 4_800_000),
            (4, 10),
        ),
        complex(
            "cx-6",
            "Protaras Bay Resort",
            "Resort Properties Ltd",
            ("Famagusta", "Protaras"),
            (35.0098, 34.0611),
            (240_000, 2_100_000),
            (22, 80),
        ),
    ]
}
