use std::collections::HashMap;

use maud::html;
use tracing::{debug, info, warn};

use crate::config::types::MapConfig;
use crate::domain::listing::{Complex, Coordinates, Property, format_distance, format_price};
use crate::domain::selection::FocusRef;
use crate::ports::map_surface::{MapProvider, MapSurface, MarkerHandle, MarkerIcon};

/// The entries to show as markers, already filtered for the active mode.
#[derive(Debug, Clone, Copy)]
pub enum MarkerSet<'a> {
    Properties(&'a [&'a Property]),
    Complexes(&'a [&'a Complex]),
}

/// Keeps the markers on the map surface in 1:1 correspondence with the
/// filtered collection of the active view mode.
///
/// The surface is acquired once by [`MapSynchronizer::attach`] and is owned
/// exclusively by this type; it is torn down with all markers on
/// [`MapSynchronizer::detach`] or drop. Until a surface is attached every
/// map operation is a no-op.
pub struct MapSynchronizer {
    config: MapConfig,
    surface: Option<Box<dyn MapSurface>>,
    markers: Vec<MarkerHandle>,
    targets: HashMap<MarkerHandle, FocusRef>,
}

impl MapSynchronizer {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            surface: None,
            markers: Vec::new(),
            targets: HashMap::new(),
        }
    }

    /// Acquire a surface from the provider. Returns whether the map is ready.
    pub fn attach(&mut self, provider: &dyn MapProvider) -> bool {
        if self.surface.is_some() {
            debug!("Map surface already attached");
            return true;
        }
        if !provider.is_available() {
            info!("Map provider not loaded, map stays in placeholder state");
            return false;
        }
        match provider.create_surface(
            &self.config.container,
            self.config.initial_center,
            self.config.initial_zoom,
        ) {
            Ok(mut surface) => {
                surface.add_tile_layer(&self.config.tile_url, &self.config.attribution);
                self.surface = Some(surface);
                info!(container = %self.config.container, "Map surface attached");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to create map surface");
                false
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Full teardown of the previous markers, then one marker per entry.
    /// When `fit` is set and at least one marker exists, the viewport is
    /// fitted to cover them all. Returns the number of markers placed.
    pub fn reconcile(&mut self, entries: MarkerSet<'_>, fit: bool) -> usize {
        let Some(surface) = self.surface.as_mut() else {
            return 0;
        };

        for handle in self.markers.drain(..) {
            surface.remove_marker(handle);
        }
        self.targets.clear();

        match entries {
            MarkerSet::Properties(properties) => {
                for property in properties {
                    let target = FocusRef::Property(property.id.clone());
                    let handle = surface.add_marker(
                        property.coordinates,
                        &MarkerIcon::for_status(property.status),
                        &target.to_string(),
                    );
                    surface.bind_popup(handle, &property_popup(property));
                    self.markers.push(handle);
                    self.targets.insert(handle, target);
                }
            }
            MarkerSet::Complexes(complexes) => {
                for complex in complexes {
                    let target = FocusRef::Complex(complex.id.clone());
                    let handle = surface.add_marker(
                        complex.coordinates,
                        &MarkerIcon::for_complex(complex.total_units),
                        &target.to_string(),
                    );
                    surface.bind_popup(handle, &complex_popup(complex));
                    self.markers.push(handle);
                    self.targets.insert(handle, target);
                }
            }
        }

        if fit
            && !self.markers.is_empty()
            && let Some(bounds) = surface.compute_bounds(&self.markers)
        {
            surface.fit_bounds(bounds, self.config.fit_padding);
        }

        debug!(markers = self.markers.len(), fit, "Reconciled map markers");
        self.markers.len()
    }

    /// Smoothly center on the focused entity; listings get a tighter zoom
    /// than complexes.
    pub fn center_on(&mut self, focus: &FocusRef, at: Coordinates) {
        let zoom = match focus {
            FocusRef::Property(_) => self.config.property_zoom,
            FocusRef::Complex(_) => self.config.complex_zoom,
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.set_view(at, zoom, true);
            debug!(%focus, zoom, "Centered map on focus");
        }
    }

    /// The entity behind a clicked marker.
    pub fn click_target(&self, handle: MarkerHandle) -> Option<&FocusRef> {
        self.targets.get(&handle)
    }

    /// The marker currently showing `focus`, if any.
    pub fn marker_for(&self, focus: &FocusRef) -> Option<MarkerHandle> {
        self.markers
            .iter()
            .copied()
            .find(|h| self.targets.get(h) == Some(focus))
    }

    /// Remove every marker and destroy the surface.
    pub fn detach(&mut self) {
        let Some(mut surface) = self.surface.take() else {
            return;
        };
        for handle in self.markers.drain(..) {
            surface.remove_marker(handle);
        }
        self.targets.clear();
        surface.destroy();
        info!("Map surface destroyed");
    }
}

impl Drop for MapSynchronizer {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for MapSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSynchronizer")
            .field("ready", &self.is_ready())
            .field("markers", &self.markers.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Popups
// ---------------------------------------------------------------------------

pub fn property_popup(property: &Property) -> String {
    html! {
        div class="property-popup" {
            img src=(property.primary_image()) alt=(property.title);
            h3 { (property.title) }
            p { strong { "Price:" } " " (format_price(property.price)) }
            p { strong { "Area:" } " " (property.area.total) " m²" }
            p { strong { "Rooms:" } " " (property.rooms) }
            p { strong { "Region:" } " " (property.address.region) }
            p { strong { "To the sea:" } " " (format_distance(property.distance_to_sea)) }
            @if !property.features.is_empty() {
                div class="features" {
                    @for feature in &property.features {
                        span { (feature) }
                    }
                }
            }
        }
    }
    .into_string()
}

pub fn complex_popup(complex: &Complex) -> String {
    html! {
        div class="property-popup" {
            h3 { (complex.name) }
            p { strong { "Developer:" } " " (complex.developer) }
            p { strong { "Region:" } " " (complex.region) ", " (complex.area) }
            p { strong { "Price from:" } " " (format_price(complex.price_range.min)) }
            p {
                strong { "Units:" }
                " " (complex.available_units) " of " (complex.total_units) " available"
            }
        }
    }
    .into_string()
}
