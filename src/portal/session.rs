use tracing::{debug, info};

use crate::config::types::MapConfig;
use crate::domain::filter::{
    ComplexFilters, FilterOptions, FilterState, PropertyFilters, filter_complexes,
    filter_properties,
};
use crate::domain::listing::{Complex, Coordinates, ListingSet, Property};
use crate::domain::selection::{FocusRef, SelectionTracker};
use crate::domain::view_mode::{ViewMode, ViewModeState};
use crate::ports::map_surface::{MapProvider, MarkerHandle};

use super::map_sync::{MapSynchronizer, MarkerSet};
use super::view::{Focused, PortalView};

/// What an update touched, deciding which map effects run.
#[derive(Debug, Clone, Copy, Default)]
struct Change {
    /// The active filtered collection or the mode changed.
    data: bool,
    /// A new focus was requested.
    focus: bool,
}

/// The single coordinating context of an agent's portal session.
///
/// Owns the listing data and every piece of UI state. Each mutation runs
/// one update cycle: filter, prune focus, reconcile markers, then adjust
/// the viewport. A focus change in a cycle centers on the focused entity
/// and suppresses the bounds fit of that same cycle.
#[derive(Debug)]
pub struct PortalSession {
    listings: ListingSet,
    filters: FilterState,
    selection: SelectionTracker,
    mode: ViewModeState,
    map: MapSynchronizer,
}

impl PortalSession {
    pub fn new(listings: ListingSet, map_config: MapConfig) -> Self {
        Self {
            listings,
            filters: FilterState::default(),
            selection: SelectionTracker::new(),
            mode: ViewModeState::default(),
            map: MapSynchronizer::new(map_config),
        }
    }

    /// Acquire the map surface and draw the current markers. Returns whether
    /// the map is ready; when it is not, the session keeps working without it.
    pub fn attach_map(&mut self, provider: &dyn MapProvider) -> bool {
        let was_ready = self.map.is_ready();
        let ready = self.map.attach(provider);
        if ready && !was_ready {
            self.update(Change {
                data: true,
                focus: false,
            });
        }
        ready
    }

    pub fn detach_map(&mut self) {
        self.map.detach();
    }

    // -- reads ------------------------------------------------------------

    pub fn listings(&self) -> &ListingSet {
        &self.listings
    }

    pub fn mode(&self) -> ViewMode {
        self.mode.current()
    }

    pub fn property_filters(&self) -> &PropertyFilters {
        &self.filters.properties
    }

    pub fn complex_filters(&self) -> &ComplexFilters {
        &self.filters.complexes
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn map(&self) -> &MapSynchronizer {
        &self.map
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_listings(&self.listings)
    }

    pub fn filtered_properties(&self) -> Vec<&Property> {
        filter_properties(&self.filters.properties, self.listings.properties())
    }

    pub fn filtered_complexes(&self) -> Vec<&Complex> {
        filter_complexes(&self.filters.complexes, self.listings.complexes())
    }

    /// Everything the presentation layer renders for one cycle.
    pub fn view(&self) -> PortalView<'_> {
        let properties = self.filtered_properties();
        let complexes = self.filtered_complexes();
        let mode = self.mode.current();

        let focused = self.selection.focused().and_then(|focus| match focus {
            FocusRef::Property(id) if mode == ViewMode::Properties => properties
                .iter()
                .find(|p| &p.id == id)
                .copied()
                .map(Focused::Property),
            FocusRef::Complex(id) if mode == ViewMode::Complexes => complexes
                .iter()
                .find(|c| &c.id == id)
                .copied()
                .map(Focused::Complex),
            _ => None,
        });

        let shortlisted = self
            .selection
            .shortlist()
            .iter()
            .filter_map(|id| self.listings.property(id))
            .collect();

        PortalView {
            mode,
            properties,
            complexes,
            focused,
            shortlist: self.selection.shortlist().iter().cloned().collect(),
            shortlisted,
            map_ready: self.map.is_ready(),
            marker_count: self.map.marker_count(),
        }
    }

    // -- mutations --------------------------------------------------------

    pub fn set_property_filters(&mut self, filters: PropertyFilters) {
        if self.filters.properties == filters {
            return;
        }
        self.filters.properties = filters;
        self.update(Change {
            data: self.mode.current() == ViewMode::Properties,
            focus: false,
        });
    }

    pub fn set_complex_filters(&mut self, filters: ComplexFilters) {
        if self.filters.complexes == filters {
            return;
        }
        self.filters.complexes = filters;
        self.update(Change {
            data: self.mode.current() == ViewMode::Complexes,
            focus: false,
        });
    }

    /// Switch the active view mode. Filters of both modes and the shortlist
    /// are kept; a focus that does not exist in the new mode is cleared.
    pub fn switch_mode(&mut self, mode: ViewMode) -> bool {
        if !self.mode.switch_to(mode) {
            return false;
        }
        info!(%mode, "Switched view mode");
        self.update(Change {
            data: true,
            focus: false,
        });
        true
    }

    /// Focus a listing or complex. Returns whether the focus resolved in the
    /// active filtered collection; an unresolved focus is dropped.
    pub fn focus(&mut self, target: FocusRef) -> bool {
        self.selection.focus(target);
        self.update(Change {
            data: false,
            focus: true,
        });
        self.selection.focused().is_some()
    }

    /// Returns whether the id is shortlisted afterwards.
    pub fn toggle_shortlist(&mut self, id: &str) -> bool {
        let added = self.selection.toggle_shortlist(id);
        debug!(id, added, "Toggled shortlist");
        added
    }

    /// Clears both filter variants and the focus. The shortlist is kept.
    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.selection.clear_focus();
        info!("Filters reset");
        self.update(Change {
            data: true,
            focus: false,
        });
    }

    /// Clears the shortlist and the focus.
    pub fn clear_selection(&mut self) {
        self.selection.reset_all();
        info!("Selection cleared");
    }

    /// Feed a marker click back into the selection. Returns the focused
    /// entity, or `None` for a handle that is not on the map.
    pub fn click_marker(&mut self, handle: MarkerHandle) -> Option<FocusRef> {
        let target = self.map.click_target(handle)?.clone();
        debug!(%handle, focus = %target, "Marker clicked");
        self.focus(target.clone()).then_some(target)
    }

    // -- update cycle -----------------------------------------------------

    fn update(&mut self, change: Change) {
        let mode = self.mode.current();
        let properties = filter_properties(&self.filters.properties, self.listings.properties());
        let complexes = filter_complexes(&self.filters.complexes, self.listings.complexes());

        let focus_at = self
            .selection
            .focused()
            .and_then(|focus| resolve(focus, mode, &properties, &complexes));
        if focus_at.is_none()
            && let Some(dropped) = self.selection.clear_focus()
        {
            debug!(focus = %dropped, "Focus no longer resolves, cleared");
        }

        let center = change.focus && focus_at.is_some();
        if change.data {
            let entries = match mode {
                ViewMode::Properties => MarkerSet::Properties(&properties),
                ViewMode::Complexes => MarkerSet::Complexes(&complexes),
            };
            self.map.reconcile(entries, !center);
        }
        if center
            && let (Some(focus), Some(at)) = (self.selection.focused(), focus_at)
        {
            self.map.center_on(focus, at);
        }
    }
}

fn resolve(
    focus: &FocusRef,
    mode: ViewMode,
    properties: &[&Property],
    complexes: &[&Complex],
) -> Option<Coordinates> {
    if focus.mode() != mode {
        return None;
    }
    match focus {
        FocusRef::Property(id) => properties
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.coordinates),
        FocusRef::Complex(id) => complexes
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.coordinates),
    }
}
