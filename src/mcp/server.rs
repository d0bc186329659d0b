use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::Mutex;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ListResourceTemplatesResult, ListResourcesResult,
        PaginatedRequestParams, ProtocolVersion, RawResource, RawResourceTemplate,
        ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
        ResourceTemplate, ServerCapabilities, ServerInfo,
    },
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};

use crate::adapters::map::headless::HeadlessMapProvider;
use crate::domain::filter::{ComplexFilters, PropertyFilters};
use crate::domain::listing::format_price;
use crate::domain::selection::FocusRef;
use crate::domain::view_mode::ViewMode;
use crate::portal::session::PortalSession;
use crate::ports::map_surface::MarkerHandle;

const PROPERTY_URI_PREFIX: &str = "portal://property/";
const COMPLEX_URI_PREFIX: &str = "portal://complex/";

// ---------- Tool parameter types ----------

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ViewModeToolParams {
    /// View mode to show: "properties" or "complexes"
    pub mode: String,
}

/// Partial update of the property filters. Omitted fields keep their current
/// value; an empty string clears a field.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PropertyFilterToolParams {
    /// Case-insensitive text matched against title, region and area
    pub search_term: Option<String>,
    /// Minimum price in EUR, as text (non-numeric input is ignored)
    pub min_price: Option<String>,
    /// Maximum price in EUR, as text (non-numeric input is ignored)
    pub max_price: Option<String>,
    /// Exact region (e.g. "Limassol", "Paphos")
    pub region: Option<String>,
    /// Property type: apartment, villa, house or studio
    pub property_type: Option<String>,
    /// Status: available, reserved or sold
    pub status: Option<String>,
    /// Exact number of rooms, as text
    pub rooms: Option<String>,
    /// Maximum distance to the sea in meters, as text
    pub max_distance_to_sea: Option<String>,
}

impl PropertyFilterToolParams {
    fn apply(self, mut filters: PropertyFilters) -> PropertyFilters {
        let Self {
            search_term,
            min_price,
            max_price,
            region,
            property_type,
            status,
            rooms,
            max_distance_to_sea,
        } = self;
        overwrite(&mut filters.search_term, search_term);
        overwrite(&mut filters.price_range.min, min_price);
        overwrite(&mut filters.price_range.max, max_price);
        overwrite(&mut filters.region, region);
        overwrite(&mut filters.kind, property_type);
        overwrite(&mut filters.status, status);
        overwrite(&mut filters.rooms, rooms);
        overwrite(&mut filters.max_distance_to_sea, max_distance_to_sea);
        filters
    }
}

/// Partial update of the complex filters. Omitted fields keep their current
/// value; an empty string clears a field.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ComplexFilterToolParams {
    /// Case-insensitive text matched against name, region and area
    pub search_term: Option<String>,
    /// Minimum price in EUR, as text
    pub min_price: Option<String>,
    /// Maximum price in EUR, as text
    pub max_price: Option<String>,
    /// Exact region
    pub region: Option<String>,
    /// Exact developer name (see portal_filter_options)
    pub developer: Option<String>,
}

impl ComplexFilterToolParams {
    fn apply(self, mut filters: ComplexFilters) -> ComplexFilters {
        overwrite(&mut filters.search_term, self.search_term);
        overwrite(&mut filters.price_range.min, self.min_price);
        overwrite(&mut filters.price_range.max, self.max_price);
        overwrite(&mut filters.region, self.region);
        overwrite(&mut filters.developer, self.developer);
        filters
    }
}

fn overwrite(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FocusToolParams {
    /// Property or complex ID
    pub id: String,
    /// "property" or "complex". Defaults to the entity type of the current view mode.
    pub kind: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ShortlistToolParams {
    /// Property ID to add to or remove from the shortlist
    pub id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MapClickToolParams {
    /// Marker handle number as listed in the portal://map resource, where each
    /// line names its target (e.g. 3 for "- m3 property 451 at ...")
    pub marker: u64,
}

// ---------- MCP Server ----------

#[derive(Clone)]
pub struct AgentPortalServer {
    session: Arc<Mutex<PortalSession>>,
    map: HeadlessMapProvider,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for AgentPortalServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentPortalServer").finish_non_exhaustive()
    }
}

#[tool_router]
impl AgentPortalServer {
    /// Serve `session`. `map` is the provider the session's map was attached
    /// through; its state backs the `portal://map` resource.
    pub fn new(session: PortalSession, map: HeadlessMapProvider) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            map,
            tool_router: Self::tool_router(),
        }
    }

    async fn render(&self) -> String {
        self.session.lock().await.view().to_string()
    }

    /// Render the portal for the current state.
    #[tool(
        name = "portal_view",
        description = "Show the agent portal: active view mode, counts of filtered complexes and properties, the focused listing, map status and the listing cards. Use this first to see what is on screen.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn portal_view(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            self.render().await,
        )]))
    }

    #[tool(
        name = "portal_set_view_mode",
        description = "Switch between the properties view and the complexes view. Filters of both views and the shortlist are kept. A focused listing that does not belong to the new view is cleared.",
        annotations(read_only_hint = false, idempotent_hint = true, open_world_hint = false)
    )]
    async fn portal_set_view_mode(
        &self,
        Parameters(params): Parameters<ViewModeToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let mode = match params.mode.parse::<ViewMode>() {
            Ok(mode) => mode,
            Err(e) => {
                return Ok(CallToolResult::error(vec![Content::text(format!(
                    "{e}. Use \"properties\" or \"complexes\"."
                ))]));
            }
        };
        let mut session = self.session.lock().await;
        let changed = session.switch_mode(mode);
        let mut text = String::new();
        if !changed {
            let _ = writeln!(text, "Already showing {mode}.\n");
        }
        text.push_str(&session.view().to_string());
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "portal_filter_properties",
        description = "Update the property filters. Only the fields you pass change; pass an empty string to clear a field. Numeric fields are text: non-numeric input is ignored. Criteria combine with AND. Returns the updated portal view.",
        annotations(read_only_hint = false, idempotent_hint = true, open_world_hint = false)
    )]
    async fn portal_filter_properties(
        &self,
        Parameters(params): Parameters<PropertyFilterToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let filters = params.apply(session.property_filters().clone());
        session.set_property_filters(filters);
        Ok(CallToolResult::success(vec![Content::text(
            session.view().to_string(),
        )]))
    }

    #[tool(
        name = "portal_filter_complexes",
        description = "Update the complex filters. Only the fields you pass change; pass an empty string to clear a field. The price filter keeps complexes whose price range overlaps the requested one. Returns the updated portal view.",
        annotations(read_only_hint = false, idempotent_hint = true, open_world_hint = false)
    )]
    async fn portal_filter_complexes(
        &self,
        Parameters(params): Parameters<ComplexFilterToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let filters = params.apply(session.complex_filters().clone());
        session.set_complex_filters(filters);
        Ok(CallToolResult::success(vec![Content::text(
            session.view().to_string(),
        )]))
    }

    #[tool(
        name = "portal_reset_filters",
        description = "Clear the property and complex filters and the focused listing. The shortlist is kept.",
        annotations(read_only_hint = false, idempotent_hint = true, open_world_hint = false)
    )]
    async fn portal_reset_filters(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.reset_filters();
        Ok(CallToolResult::success(vec![Content::text(
            session.view().to_string(),
        )]))
    }

    #[tool(
        name = "portal_focus",
        description = "Focus a property or complex and center the map on it. The listing must be visible in the current view mode with the current filters.",
        annotations(read_only_hint = false, idempotent_hint = true, open_world_hint = false)
    )]
    async fn portal_focus(
        &self,
        Parameters(params): Parameters<FocusToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let kind = match params.kind.as_deref().map(str::parse::<ViewMode>) {
            None => session.mode(),
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                return Ok(CallToolResult::error(vec![Content::text(format!(
                    "{e}. Use \"property\" or \"complex\"."
                ))]));
            }
        };
        let target = match kind {
            ViewMode::Properties => FocusRef::Property(params.id),
            ViewMode::Complexes => FocusRef::Complex(params.id),
        };
        if session.focus(target.clone()) {
            Ok(CallToolResult::success(vec![Content::text(
                session.view().to_string(),
            )]))
        } else {
            Ok(CallToolResult::error(vec![Content::text(format!(
                "Cannot focus {target}: it is not in the current {} results. Check the view mode and filters with portal_view.",
                session.mode()
            ))]))
        }
    }

    #[tool(
        name = "portal_toggle_shortlist",
        description = "Add a property to the shortlist, or remove it if it is already there.",
        annotations(read_only_hint = false, open_world_hint = false)
    )]
    async fn portal_toggle_shortlist(
        &self,
        Parameters(params): Parameters<ShortlistToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let added = session.toggle_shortlist(&params.id);
        let mut text = String::new();
        let _ = writeln!(
            text,
            "{} {} shortlist ({} total).",
            params.id,
            if added { "added to" } else { "removed from" },
            session.selection().shortlist().len()
        );
        if added && session.listings().property(&params.id).is_none() {
            let _ = writeln!(text, "Note: no property with ID {} is loaded.", params.id);
        }
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "portal_clear_selection",
        description = "Empty the shortlist and clear the focused listing.",
        annotations(read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn portal_clear_selection(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.clear_selection();
        Ok(CallToolResult::success(vec![Content::text(
            session.view().to_string(),
        )]))
    }

    #[tool(
        name = "portal_map_click",
        description = "Click a map marker, focusing the property or complex it stands for. Marker handles are listed in the portal://map resource.",
        annotations(read_only_hint = false, open_world_hint = false)
    )]
    async fn portal_map_click(
        &self,
        Parameters(params): Parameters<MapClickToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let handle = MarkerHandle(params.marker);
        match session.click_marker(handle) {
            Some(target) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Clicked {handle}: focused {target}.\n\n{}",
                session.view()
            ))])),
            None => Ok(CallToolResult::error(vec![Content::text(format!(
                "No marker {handle} on the map. Read portal://map for the current markers."
            ))])),
        }
    }

    #[tool(
        name = "portal_filter_options",
        description = "List the choices offered by the filter selectors: regions, property types, statuses, room counts and developers.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn portal_filter_options(&self) -> Result<CallToolResult, McpError> {
        let options = self.session.lock().await.filter_options();
        Ok(CallToolResult::success(vec![Content::text(
            options.to_string(),
        )]))
    }
}

impl AgentPortalServer {
    async fn map_text(&self) -> String {
        if !self.session.lock().await.map().is_ready() {
            return "Map: loading...\nThe map library is unavailable; listings are still served."
                .into();
        }
        self.map
            .snapshot()
            .map_or_else(|| "Map state unavailable.".into(), |state| state.to_string())
    }

    async fn shortlist_text(&self) -> String {
        let session = self.session.lock().await;
        let shortlist = session.selection().shortlist();
        let mut text = String::new();
        let _ = writeln!(text, "# Shortlist ({})", shortlist.len());
        for id in shortlist {
            match session.listings().property(id) {
                Some(p) => {
                    let _ = writeln!(text, "- [{}] {} {}", p.id, p.title, format_price(p.price));
                }
                None => {
                    let _ = writeln!(text, "- [{id}] (not loaded)");
                }
            }
        }
        text
    }

    async fn read_uri(&self, uri: &str) -> Option<String> {
        match uri {
            "portal://map" => Some(self.map_text().await),
            "portal://shortlist" => Some(self.shortlist_text().await),
            _ => {
                let session = self.session.lock().await;
                if let Some(id) = uri.strip_prefix(PROPERTY_URI_PREFIX) {
                    session.listings().property(id).map(ToString::to_string)
                } else if let Some(id) = uri.strip_prefix(COMPLEX_URI_PREFIX) {
                    session.listings().complex(id).map(ToString::to_string)
                } else {
                    None
                }
            }
        }
    }
}

fn text_resource(uri: &str, name: &str, description: &str) -> Resource {
    Resource {
        annotations: None,
        raw: RawResource {
            uri: uri.into(),
            name: name.into(),
            title: None,
            description: Some(description.into()),
            mime_type: Some("text/plain".into()),
            size: None,
            icons: None,
            meta: None,
        },
    }
}

fn text_template(uri_template: &str, name: &str, title: &str, description: &str) -> ResourceTemplate {
    ResourceTemplate {
        annotations: None,
        raw: RawResourceTemplate {
            uri_template: uri_template.into(),
            name: name.into(),
            title: Some(title.into()),
            description: Some(description.into()),
            mime_type: Some("text/plain".into()),
            icons: None,
        },
    }
}

#[tool_handler]
impl ServerHandler for AgentPortalServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Agent portal for browsing real-estate listings in Cyprus.\n\
                 \n\
                 ## Views\n\
                 The portal shows either properties (individual units) or complexes \
                 (development projects). Start with portal_view, and switch with portal_set_view_mode.\n\
                 \n\
                 ## Tools\n\
                 - portal_filter_properties / portal_filter_complexes: narrow the results (partial updates)\n\
                 - portal_filter_options: allowed regions, types, statuses, rooms and developers\n\
                 - portal_reset_filters: clear all filters, keep the shortlist\n\
                 - portal_focus: focus one listing and center the map on it\n\
                 - portal_map_click: focus the listing behind a map marker\n\
                 - portal_toggle_shortlist / portal_clear_selection: manage the shortlist\n\
                 \n\
                 ## Resources\n\
                 - portal://map: viewport plus one line per marker naming its listing\n\
                 - portal://shortlist: shortlisted properties\n\
                 - portal://property/{id} and portal://complex/{id}: full listing cards"
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![
                text_resource("portal://map", "Map", "Markers and viewport of the portal map"),
                text_resource(
                    "portal://shortlist",
                    "Shortlist",
                    "Properties shortlisted by the agent",
                ),
            ],
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![
                text_template(
                    "portal://property/{id}",
                    "Property",
                    "Property card",
                    "Price, size, rooms, distance to sea and features of one property",
                ),
                text_template(
                    "portal://complex/{id}",
                    "Complex",
                    "Complex card",
                    "Developer, price range and unit availability of one complex",
                ),
            ],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = &request.uri;
        match self.read_uri(uri).await {
            Some(text) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, uri.clone())],
            }),
            None => Err(McpError::resource_not_found(
                format!("Resource not found: {uri}"),
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::MapConfig;
    use crate::test_helpers::scenario_listings;

    fn extract_text(result: &CallToolResult) -> &str {
        result.content[0]
            .raw
            .as_text()
            .expect("expected text content")
            .text
            .as_str()
    }

    fn make_server() -> AgentPortalServer {
        let provider = HeadlessMapProvider::new();
        let mut session = PortalSession::new(scenario_listings(), MapConfig::default());
        session.attach_map(&provider);
        AgentPortalServer::new(session, provider)
    }

    #[tokio::test]
    async fn view_lists_both_counts() {
        let server = make_server();
        let result = server.portal_view().await.unwrap();
        let text = extract_text(&result);
        assert!(text.contains("Complexes (2) | Properties (2)"));
        assert!(text.contains("Map: 2 markers"));
        assert!(text.contains("[451]"));
        assert!(text.contains("[452]"));
    }

    #[tokio::test]
    async fn property_filter_is_partial_update() {
        let server = make_server();
        server
            .portal_filter_properties(Parameters(PropertyFilterToolParams {
                region: Some("Paphos".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        let result = server
            .portal_filter_properties(Parameters(PropertyFilterToolParams {
                min_price: Some("abc".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        let text = extract_text(&result);
        assert!(text.contains("Found: 1 properties"));
        assert!(text.contains("[451]"));
        assert!(!text.contains("[452]"));

        let session = server.session.lock().await;
        assert_eq!(session.property_filters().region, "Paphos");
        assert_eq!(session.property_filters().price_range.min, "abc");
    }

    #[tokio::test]
    async fn empty_string_clears_field() {
        let server = make_server();
        server
            .portal_filter_properties(Parameters(PropertyFilterToolParams {
                region: Some("Paphos".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        let result = server
            .portal_filter_properties(Parameters(PropertyFilterToolParams {
                region: Some(String::new()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert!(extract_text(&result).contains("Found: 2 properties"));
    }

    #[tokio::test]
    async fn set_view_mode_rejects_unknown_mode() {
        let server = make_server();
        let result = server
            .portal_set_view_mode(Parameters(ViewModeToolParams {
                mode: "grid".into(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("grid"));
    }

    #[tokio::test]
    async fn set_view_mode_switches_to_complexes() {
        let server = make_server();
        let result = server
            .portal_set_view_mode(Parameters(ViewModeToolParams {
                mode: "complexes".into(),
            }))
            .await
            .unwrap();
        let text = extract_text(&result);
        assert!(text.contains("# Agent Portal (complexes)"));
        assert!(text.contains("[cx-1]"));

        let again = server
            .portal_set_view_mode(Parameters(ViewModeToolParams {
                mode: "complexes".into(),
            }))
            .await
            .unwrap();
        assert!(extract_text(&again).contains("Already showing complexes"));
    }

    #[tokio::test]
    async fn focus_defaults_to_current_mode() {
        let server = make_server();
        let result = server
            .portal_focus(Parameters(FocusToolParams {
                id: "451".into(),
                kind: None,
            }))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("Focused: [451]"));
    }

    #[tokio::test]
    async fn focus_outside_current_mode_is_an_error() {
        let server = make_server();
        let result = server
            .portal_focus(Parameters(FocusToolParams {
                id: "cx-1".into(),
                kind: Some("complex".into()),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("complex cx-1"));
    }

    #[tokio::test]
    async fn toggle_shortlist_reports_state() {
        let server = make_server();
        let added = server
            .portal_toggle_shortlist(Parameters(ShortlistToolParams { id: "451".into() }))
            .await
            .unwrap();
        assert!(extract_text(&added).contains("451 added to shortlist (1 total)"));

        let view = server.portal_view().await.unwrap();
        assert!(extract_text(&view).contains("✓ In shortlist"));

        let removed = server
            .portal_toggle_shortlist(Parameters(ShortlistToolParams { id: "451".into() }))
            .await
            .unwrap();
        assert!(extract_text(&removed).contains("451 removed from shortlist (0 total)"));
    }

    #[tokio::test]
    async fn toggle_unknown_id_notes_it() {
        let server = make_server();
        let result = server
            .portal_toggle_shortlist(Parameters(ShortlistToolParams { id: "999".into() }))
            .await
            .unwrap();
        assert!(extract_text(&result).contains("no property with ID 999"));
    }

    #[tokio::test]
    async fn map_click_focuses_marker_target() {
        let server = make_server();
        let handle = {
            let session = server.session.lock().await;
            session
                .map()
                .marker_for(&FocusRef::Property("452".into()))
                .unwrap()
        };
        let result = server
            .portal_map_click(Parameters(MapClickToolParams { marker: handle.0 }))
            .await
            .unwrap();
        let text = extract_text(&result);
        assert!(text.contains("focused property 452"));
        assert!(text.contains("Focused: [452]"));

        let missing = server
            .portal_map_click(Parameters(MapClickToolParams { marker: 9_999 }))
            .await
            .unwrap();
        assert_eq!(missing.is_error, Some(true));
    }

    #[tokio::test]
    async fn map_resource_names_targets_for_clicking() {
        let server = make_server();
        let map = server.read_uri("portal://map").await.unwrap();
        let line = map
            .lines()
            .find(|l| l.contains(" property 452 at "))
            .unwrap();
        let handle: u64 = line
            .strip_prefix("- m")
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap()
            .parse()
            .unwrap();

        let result = server
            .portal_map_click(Parameters(MapClickToolParams { marker: handle }))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("Focused: [452]"));
    }

    #[tokio::test]
    async fn reset_keeps_shortlist() {
        let server = make_server();
        server
            .portal_toggle_shortlist(Parameters(ShortlistToolParams { id: "452".into() }))
            .await
            .unwrap();
        server
            .portal_filter_properties(Parameters(PropertyFilterToolParams {
                region: Some("Paphos".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        let result = server.portal_reset_filters().await.unwrap();
        let text = extract_text(&result);
        assert!(text.contains("Found: 2 properties"));
        assert!(text.contains("## Shortlist (1)"));

        let cleared = server.portal_clear_selection().await.unwrap();
        assert!(!extract_text(&cleared).contains("## Shortlist"));
    }

    #[tokio::test]
    async fn filter_options_lists_developers() {
        let server = make_server();
        let result = server.portal_filter_options().await.unwrap();
        let text = extract_text(&result);
        assert!(text.contains("Regions: Limassol, Paphos"));
        assert!(text.contains("Types: apartment, villa, house, studio"));
        assert!(text.contains("Antaria Development"));
    }

    #[tokio::test]
    async fn read_uri_resolves_known_resources() {
        let server = make_server();
        let map = server.read_uri("portal://map").await.unwrap();
        assert!(map.contains("Markers: 2"));

        let property = server.read_uri("portal://property/451").await.unwrap();
        assert!(property.contains("€1,350,000"));

        let complex = server.read_uri("portal://complex/cx-1").await.unwrap();
        assert!(complex.contains("cx-1"));

        assert!(server.read_uri("portal://property/999").await.is_none());
        assert!(server.read_uri("portal://agents/1").await.is_none());
    }

    #[tokio::test]
    async fn shortlist_resource_marks_unknown_ids() {
        let server = make_server();
        server
            .portal_toggle_shortlist(Parameters(ShortlistToolParams { id: "451".into() }))
            .await
            .unwrap();
        server
            .portal_toggle_shortlist(Parameters(ShortlistToolParams { id: "ghost".into() }))
            .await
            .unwrap();
        let text = server.read_uri("portal://shortlist").await.unwrap();
        assert!(text.contains("# Shortlist (2)"));
        assert!(text.contains("[451]"));
        assert!(text.contains("[ghost] (not loaded)"));
    }

    #[tokio::test]
    async fn map_resource_without_map_reports_loading() {
        let provider = HeadlessMapProvider::unavailable();
        let mut session = PortalSession::new(scenario_listings(), MapConfig::default());
        session.attach_map(&provider);
        let server = AgentPortalServer::new(session, provider);
        let text = server.read_uri("portal://map").await.unwrap();
        assert!(text.contains("Map: loading..."));

        let view = server.portal_view().await.unwrap();
        assert!(extract_text(&view).contains("Found: 2 properties"));
    }
}
