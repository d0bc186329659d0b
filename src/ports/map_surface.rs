use serde::{Deserialize, Serialize};

use crate::domain::listing::{Coordinates, ListingStatus};
use crate::error::Result;

/// Opaque handle to a marker living on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerHandle(pub u64);

impl std::fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl Bounds {
    /// Smallest box containing every point; `None` for no points.
    pub fn covering(points: impl IntoIterator<Item = Coordinates>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    south_west: p,
                    north_east: p,
                },
                Some(b) => Self {
                    south_west: Coordinates {
                        lat: b.south_west.lat.min(p.lat),
                        lng: b.south_west.lng.min(p.lng),
                    },
                    north_east: Coordinates {
                        lat: b.north_east.lat.max(p.lat),
                        lng: b.north_east.lng.max(p.lng),
                    },
                },
            })
        })
    }

    pub fn contains(&self, p: Coordinates) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&p.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&p.lng)
    }
}

/// A div-style marker icon: css class, inner html, size and anchor in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub class_name: String,
    pub html: String,
    pub size: (u32, u32),
    pub anchor: (u32, u32),
}

impl MarkerIcon {
    const CLASS: &'static str = "custom-div-icon";

    /// Dot colored by listing status.
    pub fn for_status(status: ListingStatus) -> Self {
        let class = match status {
            ListingStatus::Available => "property-marker",
            ListingStatus::Reserved => "property-marker reserved",
            ListingStatus::Sold => "property-marker sold",
        };
        Self {
            class_name: Self::CLASS.into(),
            html: format!("<div class=\"{class}\"></div>"),
            size: (25, 25),
            anchor: (12, 12),
        }
    }

    /// Badge showing the complex's total unit count.
    pub fn for_complex(total_units: u32) -> Self {
        Self {
            class_name: Self::CLASS.into(),
            html: format!("<div class=\"complex-marker\">{total_units}</div>"),
            size: (30, 30),
            anchor: (15, 15),
        }
    }
}

/// Creates map surfaces. A provider that is not loaded reports
/// `is_available() == false` and callers must not create surfaces from it.
pub trait MapProvider: Send + Sync {
    fn is_available(&self) -> bool;

    fn create_surface(
        &self,
        container: &str,
        center: Coordinates,
        zoom: u8,
    ) -> Result<Box<dyn MapSurface>>;
}

/// Imperative API of one live map widget.
pub trait MapSurface: Send {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    /// `title` is the marker's hover text and names what it points at.
    fn add_marker(&mut self, at: Coordinates, icon: &MarkerIcon, title: &str) -> MarkerHandle;
    fn bind_popup(&mut self, marker: MarkerHandle, html: &str);
    fn remove_marker(&mut self, marker: MarkerHandle);
    fn compute_bounds(&self, markers: &[MarkerHandle]) -> Option<Bounds>;
    fn fit_bounds(&mut self, bounds: Bounds, padding: u32);
    fn set_view(&mut self, center: Coordinates, zoom: u8, animate: bool);
    fn destroy(&mut self);
}
