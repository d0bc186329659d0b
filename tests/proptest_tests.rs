#![allow(clippy::cast_precision_loss, clippy::float_cmp)]

use std::collections::BTreeSet;

use proptest::prelude::*;

use agent_portal::adapters::map::headless::HeadlessMapProvider;
use agent_portal::config::types::MapConfig;
use agent_portal::domain::filter::{
    ComplexFilters, PriceInput, PropertyFilters, REGIONS, filter_complexes, filter_properties,
    parse_bound,
};
use agent_portal::domain::listing::{
    Address, Area, Complex, Coordinates, ListingSet, ListingStatus, PriceRange, Property,
    PropertyKind,
};
use agent_portal::domain::selection::SelectionTracker;
use agent_portal::domain::view_mode::ViewMode;
use agent_portal::portal::map_sync::{MapSynchronizer, MarkerSet};
use agent_portal::portal::session::PortalSession;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_region() -> impl Strategy<Value = String> {
    prop::sample::select(REGIONS.to_vec()).prop_map(String::from)
}

fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
    (34.5..35.7_f64, 32.2..34.6_f64).prop_map(|(lat, lng)| Coordinates { lat, lng })
}

fn arb_property() -> impl Strategy<Value = Property> {
    (
        prop::sample::select(PropertyKind::ALL.to_vec()),
        prop::sample::select(ListingStatus::ALL.to_vec()),
        0..3_000_000_u64,       // price
        1..6_u32,               // rooms
        arb_region(),
        "[A-Za-z ]{1,12}",      // sub-area
        "[A-Za-z ]{1,24}",      // title
        arb_coordinates(),
        0..5_000_u32,           // distance to sea
    )
        .prop_map(
            |(kind, status, price, rooms, region, area, title, coordinates, distance_to_sea)| {
                Property {
                    id: String::new(),
                    title,
                    kind,
                    status,
                    price,
                    area: Area { total: 80.0 },
                    rooms,
                    bathrooms: 1,
                    address: Address { region, area },
                    coordinates,
                    images: vec![],
                    distance_to_sea,
                    features: vec![],
                }
            },
        )
}

fn arb_properties() -> impl Strategy<Value = Vec<Property>> {
    prop::collection::vec(arb_property(), 0..30).prop_map(|mut properties| {
        for (i, p) in properties.iter_mut().enumerate() {
            p.id = (400 + i).to_string();
        }
        properties
    })
}

fn arb_complexes() -> impl Strategy<Value = Vec<Complex>> {
    let complex = (
        arb_region(),
        prop::sample::select(vec!["Antaria Development", "Athanasiou Group", "Leptos Estates"]),
        0..2_000_000_u64,
        0..1_500_000_u64,
        arb_coordinates(),
    )
        .prop_map(|(region, developer, min, spread, coordinates)| Complex {
            id: String::new(),
            name: format!("{developer} {region}"),
            developer: developer.to_string(),
            region,
            area: "Center".into(),
            coordinates,
            price_range: PriceRange {
                min,
                max: min + spread,
            },
            total_units: 40,
            available_units: 10,
        });
    prop::collection::vec(complex, 0..12).prop_map(|mut complexes| {
        for (i, c) in complexes.iter_mut().enumerate() {
            c.id = format!("cx-{i}");
        }
        complexes
    })
}

/// Blank, numeric, or garbage text, the way an agent types it.
fn arb_numeric_input(max: u64) -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (0..max).prop_map(|n| n.to_string()),
        (0..max, 0..10_u64).prop_map(|(n, tenths)| format!("{n}.{tenths}")),
        Just("abc".to_string()),
        Just("-5".to_string()),
    ]
}

fn arb_optional(values: Vec<&'static str>) -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::sample::select(values).prop_map(String::from),
    ]
}

fn arb_property_filters() -> impl Strategy<Value = PropertyFilters> {
    (
        prop_oneof![Just(String::new()), "[a-z]{1,3}"],
        arb_numeric_input(3_000_000),
        arb_numeric_input(3_000_000),
        arb_optional(REGIONS.to_vec()),
        arb_optional(vec!["apartment", "villa", "house", "studio", "castle"]),
        arb_optional(vec!["available", "reserved", "sold"]),
        arb_numeric_input(7),
        arb_numeric_input(5_000),
    )
        .prop_map(
            |(search_term, min, max, region, kind, status, rooms, max_distance_to_sea)| {
                PropertyFilters {
                    search_term,
                    price_range: PriceInput::new(min, max),
                    region,
                    kind,
                    status,
                    rooms,
                    max_distance_to_sea,
                }
            },
        )
}

fn arb_complex_filters() -> impl Strategy<Value = ComplexFilters> {
    (
        arb_numeric_input(3_000_000),
        arb_numeric_input(3_000_000),
        arb_optional(REGIONS.to_vec()),
        arb_optional(vec!["Antaria Development", "Leptos Estates"]),
    )
        .prop_map(|(min, max, region, developer)| ComplexFilters {
            search_term: String::new(),
            price_range: PriceInput::new(min, max),
            region,
            developer,
        })
}

// ---------------------------------------------------------------------------
// Reference predicate
// ---------------------------------------------------------------------------

fn satisfies(f: &PropertyFilters, p: &Property) -> bool {
    let min = parse_bound(&f.price_range.min);
    let max = parse_bound(&f.price_range.max);
    if let (Some(lo), Some(hi)) = (min, max)
        && lo > hi
    {
        return false;
    }
    let term = f.search_term.trim().to_lowercase();
    let text_ok = term.is_empty()
        || p.title.to_lowercase().contains(&term)
        || p.address.region.to_lowercase().contains(&term)
        || p.address.area.to_lowercase().contains(&term);
    text_ok
        && min.is_none_or(|lo| p.price as f64 >= lo)
        && max.is_none_or(|hi| p.price as f64 <= hi)
        && (f.region.is_empty() || f.region == p.address.region)
        && (f.kind.is_empty() || f.kind == p.kind.as_str())
        && (f.status.is_empty() || f.status == p.status.as_str())
        && parse_bound(&f.rooms).is_none_or(|r| r == f64::from(p.rooms))
        && parse_bound(&f.max_distance_to_sea).is_none_or(|d| f64::from(p.distance_to_sea) <= d)
}

fn ids<T>(items: &[&T], id: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|i| id(i).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_empty_criteria_is_identity(properties in arb_properties(), complexes in arb_complexes()) {
        let result = filter_properties(&PropertyFilters::default(), &properties);
        let expected: Vec<&Property> = properties.iter().collect();
        prop_assert_eq!(ids(&result, |p| &p.id), ids(&expected, |p| &p.id));

        let result = filter_complexes(&ComplexFilters::default(), &complexes);
        prop_assert_eq!(result.len(), complexes.len());
    }

    #[test]
    fn prop_filter_is_sound_and_complete(
        properties in arb_properties(),
        filters in arb_property_filters(),
    ) {
        let result = filter_properties(&filters, &properties);
        let expected: Vec<&Property> = properties.iter().filter(|p| satisfies(&filters, p)).collect();
        prop_assert_eq!(ids(&result, |p| &p.id), ids(&expected, |p| &p.id));
    }

    #[test]
    fn prop_filter_is_deterministic(
        properties in arb_properties(),
        filters in arb_property_filters(),
    ) {
        let first = filter_properties(&filters, &properties);
        let second = filter_properties(&filters, &properties);
        prop_assert_eq!(ids(&first, |p| &p.id), ids(&second, |p| &p.id));
    }

    #[test]
    fn prop_complex_results_overlap_price_range(
        complexes in arb_complexes(),
        filters in arb_complex_filters(),
    ) {
        let (min, max) = filters.price_range.bounds();
        for c in filter_complexes(&filters, &complexes) {
            prop_assert!(min.is_none_or(|lo| c.price_range.max as f64 >= lo));
            prop_assert!(max.is_none_or(|hi| c.price_range.min as f64 <= hi));
            prop_assert!(filters.region.is_empty() || c.region == filters.region);
            prop_assert!(filters.developer.is_empty() || c.developer == filters.developer);
        }
    }

    #[test]
    fn prop_fractional_max_price_excludes_pricier_listings(
        properties in arb_properties(),
        whole in 0..3_000_000_u64,
        tenths in 1..10_u64,
    ) {
        let filters = PropertyFilters {
            price_range: PriceInput::new("", format!("{whole}.{tenths}")),
            ..Default::default()
        };
        let result = filter_properties(&filters, &properties);
        let expected = properties.iter().filter(|p| p.price <= whole).count();
        prop_assert_eq!(result.len(), expected);
        prop_assert!(result.iter().all(|p| p.price <= whole));
    }

    #[test]
    fn prop_garbage_numeric_input_is_no_constraint(
        properties in arb_properties(),
        garbage in "[a-zA-Z.,]{1,8}",
    ) {
        let filters = PropertyFilters {
            price_range: PriceInput::new(garbage.clone(), garbage.clone()),
            rooms: garbage.clone(),
            max_distance_to_sea: garbage,
            ..Default::default()
        };
        prop_assert_eq!(filter_properties(&filters, &properties).len(), properties.len());
    }
}

// ---------------------------------------------------------------------------
// Selection and view mode
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_toggle_twice_restores_shortlist(
        initial in prop::collection::btree_set("[0-9]{3}", 0..10),
        id in "[0-9]{3}",
    ) {
        let mut tracker = SelectionTracker::new();
        for existing in &initial {
            tracker.toggle_shortlist(existing);
        }
        let before: BTreeSet<String> = tracker.shortlist().clone();
        tracker.toggle_shortlist(&id);
        tracker.toggle_shortlist(&id);
        prop_assert_eq!(tracker.shortlist(), &before);
    }

    #[test]
    fn prop_mode_round_trip_restores_results(
        properties in arb_properties(),
        complexes in arb_complexes(),
        property_filters in arb_property_filters(),
        complex_filters in arb_complex_filters(),
    ) {
        let listings = ListingSet::new(properties, complexes).unwrap();
        let mut session = PortalSession::new(listings, MapConfig::default());
        session.set_property_filters(property_filters.clone());
        session.set_complex_filters(complex_filters.clone());

        let before = ids(&session.filtered_properties(), |p| &p.id);
        session.switch_mode(ViewMode::Complexes);
        session.switch_mode(ViewMode::Properties);

        prop_assert_eq!(session.mode(), ViewMode::Properties);
        prop_assert_eq!(ids(&session.filtered_properties(), |p| &p.id), before);
        prop_assert_eq!(session.property_filters(), &property_filters);
        prop_assert_eq!(session.complex_filters(), &complex_filters);
    }
}

// ---------------------------------------------------------------------------
// Map synchronizer
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_reconcile_is_idempotent_in_marker_count(properties in arb_properties()) {
        let provider = HeadlessMapProvider::new();
        let mut sync = MapSynchronizer::new(MapConfig::default());
        prop_assert!(sync.attach(&provider));

        let visible: Vec<&Property> = properties.iter().collect();
        let once = sync.reconcile(MarkerSet::Properties(&visible), true);
        let twice = sync.reconcile(MarkerSet::Properties(&visible), true);

        prop_assert_eq!(once, properties.len());
        prop_assert_eq!(once, twice);
        prop_assert_eq!(sync.marker_count(), properties.len());
        prop_assert_eq!(provider.snapshot().unwrap().marker_count(), properties.len());
    }
}
