use crate::domain::listing::{
    Address, Area, Complex, Coordinates, ListingSet, ListingStatus, PriceRange, Property,
    PropertyKind,
};

// --- Factory functions ---

fn region_center(region: &str) -> Coordinates {
    match region {
        "Paphos" => Coordinates { lat: 34.7720, lng: 32.4297 },
        "Limassol" => Coordinates { lat: 34.6786, lng: 33.0413 },
        "Larnaca" => Coordinates { lat: 34.9229, lng: 33.6233 },
        "Nicosia" => Coordinates { lat: 35.1856, lng: 33.3823 },
        _ => Coordinates { lat: 35.0375, lng: 33.9833 },
    }
}

pub fn make_property(id: &str, region: &str, price: u64, rooms: u32) -> Property {
    Property {
        id: id.to_string(),
        title: format!("Test property {id}"),
        kind: PropertyKind::Apartment,
        status: ListingStatus::Available,
        price,
        area: Area { total: 100.0 },
        rooms,
        bathrooms: 1,
        address: Address {
            region: region.to_string(),
            area: "Center".to_string(),
        },
        coordinates: region_center(region),
        images: vec![format!("https://example.com/{id}.jpg")],
        distance_to_sea: 500,
        features: vec![],
    }
}

pub fn make_complex(id: &str, region: &str, developer: &str) -> Complex {
    Complex {
        id: id.to_string(),
        name: format!("Test complex {id}"),
        developer: developer.to_string(),
        region: region.to_string(),
        area: "Center".to_string(),
        coordinates: region_center(region),
        price_range: PriceRange {
            min: 250_000,
            max: 900_000,
        },
        total_units: 40,
        available_units: 10,
    }
}

/// Listing 451 (Paphos, 1,350,000) and 452 (Limassol, 580,000), both 3 rooms.
pub fn scenario_properties() -> Vec<Property> {
    vec![
        make_property("451", "Paphos", 1_350_000, 3),
        make_property("452", "Limassol", 580_000, 3),
    ]
}

pub fn scenario_listings() -> ListingSet {
    ListingSet::new(
        scenario_properties(),
        vec![
            make_complex("cx-1", "Limassol", "Antaria Development"),
            make_complex("cx-2", "Paphos", "Athanasiou Group"),
        ],
    )
    .expect("scenario listings are valid")
}
