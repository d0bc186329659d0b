use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, warn};

use crate::domain::listing::Coordinates;
use crate::error::{PortalError, Result};
use crate::ports::map_surface::{Bounds, MapProvider, MapSurface, MarkerHandle, MarkerIcon};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub at: Coordinates,
    pub title: String,
    pub icon: MarkerIcon,
    pub popup: Option<String>,
}

/// Where the camera points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    View {
        center: Coordinates,
        zoom: u8,
        animated: bool,
    },
    Fitted {
        bounds: Bounds,
        padding: u32,
    },
}

/// Calls received by the surface, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOp {
    Create { container: String },
    TileLayer { url_template: String },
    AddMarker(MarkerHandle),
    BindPopup(MarkerHandle),
    RemoveMarker(MarkerHandle),
    FitBounds { bounds: Bounds, padding: u32 },
    SetView { center: Coordinates, zoom: u8, animate: bool },
    Destroy,
}

#[derive(Debug, Clone)]
pub struct MapState {
    pub container: String,
    pub viewport: Viewport,
    pub tile_layers: Vec<(String, String)>,
    pub markers: BTreeMap<MarkerHandle, PlacedMarker>,
    pub ops: Vec<MapOp>,
    pub destroyed: bool,
    next_handle: u64,
}

impl MapState {
    fn new(container: &str, center: Coordinates, zoom: u8) -> Self {
        Self {
            container: container.to_string(),
            viewport: Viewport::View {
                center,
                zoom,
                animated: false,
            },
            tile_layers: Vec::new(),
            markers: BTreeMap::new(),
            ops: vec![MapOp::Create {
                container: container.to_string(),
            }],
            destroyed: false,
            next_handle: 1,
        }
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn count_ops(&self, pred: impl Fn(&MapOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl std::fmt::Display for MapState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# Map ({})", self.container)?;
        if self.destroyed {
            return writeln!(f, "Surface destroyed");
        }
        match self.viewport {
            Viewport::View { center, zoom, .. } => {
                writeln!(f, "View: {:.4}, {:.4} @ zoom {zoom}", center.lat, center.lng)?;
            }
            Viewport::Fitted { bounds, padding } => writeln!(
                f,
                "Fitted: SW {:.4}, {:.4} / NE {:.4}, {:.4} (padding {padding}px)",
                bounds.south_west.lat,
                bounds.south_west.lng,
                bounds.north_east.lat,
                bounds.north_east.lng
            )?,
        }
        writeln!(f, "Markers: {}", self.markers.len())?;
        for (handle, marker) in &self.markers {
            writeln!(
                f,
                "- {handle} {} at {:.4}, {:.4} {}",
                marker.title, marker.at.lat, marker.at.lng, marker.icon.html
            )?;
        }
        Ok(())
    }
}

pub type SharedMapState = Arc<Mutex<MapState>>;

/// An in-process map widget. Keeps the full marker/viewport state so the
/// presentation layer and tests can inspect what a real widget would draw.
#[derive(Debug)]
pub struct HeadlessMapSurface {
    state: SharedMapState,
}

impl HeadlessMapSurface {
    fn with_state<R>(&self, op: &str, f: impl FnOnce(&mut MapState) -> R) -> Option<R> {
        let Ok(mut state) = self.state.lock() else {
            error!("Map state lock poisoned on {op}, skipping");
            return None;
        };
        if state.destroyed {
            warn!("Map surface already destroyed, ignoring {op}");
            return None;
        }
        Some(f(&mut state))
    }
}

impl MapSurface for HeadlessMapSurface {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        self.with_state("add_tile_layer", |s| {
            s.tile_layers
                .push((url_template.to_string(), attribution.to_string()));
            s.ops.push(MapOp::TileLayer {
                url_template: url_template.to_string(),
            });
        });
    }

    fn add_marker(&mut self, at: Coordinates, icon: &MarkerIcon, title: &str) -> MarkerHandle {
        self.with_state("add_marker", |s| {
            let handle = MarkerHandle(s.next_handle);
            s.next_handle += 1;
            s.markers.insert(
                handle,
                PlacedMarker {
                    at,
                    title: title.to_string(),
                    icon: icon.clone(),
                    popup: None,
                },
            );
            s.ops.push(MapOp::AddMarker(handle));
            handle
        })
        .unwrap_or(MarkerHandle(0))
    }

    fn bind_popup(&mut self, marker: MarkerHandle, html: &str) {
        self.with_state("bind_popup", |s| {
            if let Some(placed) = s.markers.get_mut(&marker) {
                placed.popup = Some(html.to_string());
                s.ops.push(MapOp::BindPopup(marker));
            }
        });
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.with_state("remove_marker", |s| {
            if s.markers.remove(&marker).is_some() {
                s.ops.push(MapOp::RemoveMarker(marker));
            }
        });
    }

    fn compute_bounds(&self, markers: &[MarkerHandle]) -> Option<Bounds> {
        self.with_state("compute_bounds", |s| {
            Bounds::covering(markers.iter().filter_map(|h| s.markers.get(h).map(|m| m.at)))
        })
        .flatten()
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32) {
        self.with_state("fit_bounds", |s| {
            s.viewport = Viewport::Fitted { bounds, padding };
            s.ops.push(MapOp::FitBounds { bounds, padding });
        });
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8, animate: bool) {
        self.with_state("set_view", |s| {
            s.viewport = Viewport::View {
                center,
                zoom,
                animated: animate,
            };
            s.ops.push(MapOp::SetView {
                center,
                zoom,
                animate,
            });
        });
    }

    fn destroy(&mut self) {
        self.with_state("destroy", |s| {
            s.markers.clear();
            s.destroyed = true;
            s.ops.push(MapOp::Destroy);
        });
    }
}

/// Provider for [`HeadlessMapSurface`]. All surfaces it creates share one
/// observable state, read through [`HeadlessMapProvider::snapshot`].
#[derive(Debug, Clone)]
pub struct HeadlessMapProvider {
    available: bool,
    state: SharedMapState,
}

impl Default for HeadlessMapProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessMapProvider {
    pub fn new() -> Self {
        Self {
            available: true,
            state: Arc::new(Mutex::new(MapState::new(
                "",
                Coordinates { lat: 0.0, lng: 0.0 },
                0,
            ))),
        }
    }

    /// A provider whose library never loaded.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Copy of the current state, or `None` if the lock is poisoned.
    pub fn snapshot(&self) -> Option<MapState> {
        self.state.lock().ok().map(|s| s.clone())
    }
}

impl MapProvider for HeadlessMapProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create_surface(
        &self,
        container: &str,
        center: Coordinates,
        zoom: u8,
    ) -> Result<Box<dyn MapSurface>> {
        if !self.available {
            return Err(PortalError::MapUnavailable);
        }
        let mut state = self
            .state
            .lock()
            .map_err(|_| PortalError::Config("map state lock poisoned".into()))?;
        *state = MapState::new(container, center, zoom);
        debug!(container, zoom, "Created headless map surface");
        Ok(Box::new(HeadlessMapSurface {
            state: Arc::clone(&self.state),
        }))
    }
}
