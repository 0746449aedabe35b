//! HTTP handler functions for the site map API.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use site_map_engine::rank::{rank_bubbles, rank_locations};
use site_map_engine::session::MapSession;
use site_map_engine::source::{LocationSource as _, SourceError, VoteDelta, VoteSink as _};
use site_map_engine::visibility::visible_locations;
use site_map_geo::{BoundingBox, Coordinates, Viewport};
use site_map_metro::consolidate;
use site_map_server_models::{
    ApiCityBubble, ApiHealth, ApiLocation, ApiViewResponse, CitiesQueryParams, ColorFilterParams,
    LocationsQueryParams, ReleaseRequest, SuggestLocationRequest, ViewQueryParams, VoteRequest,
    VoteResponse,
};
use site_map_site_models::{
    FilterState, Location, ScoreCategory, Scorecard, SiteStatus, SizeClass, ViewerRole,
};
use uuid::Uuid;

use crate::AppState;
use crate::store::StoreError;

/// Bounds of the contiguous US, the default viewport for unscoped
/// requests.
const CONTIGUOUS_US_BOUNDS: BoundingBox = BoundingBox::new(-125.0, 24.0, -66.0, 50.0);

/// Zoom level assumed when a request carries no zoom (City tier).
const DEFAULT_ZOOM: f64 = 4.0;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/view`
///
/// Runs the full engine pipeline for a viewport: tier selection,
/// consolidation or per-location ranking, role visibility, and
/// pagination. `pages=N` reproduces N-1 presses of the "Next" control.
pub async fn view(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<ViewQueryParams>,
) -> HttpResponse {
    let role = viewer_role(&req, params.role.as_deref());
    let bounds = params
        .bbox
        .as_deref()
        .and_then(parse_bbox)
        .unwrap_or(CONTIGUOUS_US_BOUNDS);
    let center = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => Coordinates::new(lat, lng),
        _ => bounds.center(),
    };
    let viewport = Viewport::new(center, params.zoom.unwrap_or(DEFAULT_ZOOM), bounds);

    let mut session =
        MapSession::new(state.config.clone(), state.gazetteer.clone()).with_role(role);
    if role.is_admin() {
        session.set_filter(build_filter(&ColorFilterParams::from(&*params)));
    }

    session.refresh(state.store.as_ref(), viewport).await;

    for _ in 1..params.pages.unwrap_or(1) {
        session.next_page();
    }

    HttpResponse::Ok().json(ApiViewResponse::from(session.view()))
}

/// `GET /api/cities`
///
/// Returns every consolidated city bubble visible to the viewer, ranked
/// by total votes. Bubbles are nationwide; the map draws them all, so
/// this endpoint is not paginated.
pub async fn cities(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<CitiesQueryParams>,
) -> HttpResponse {
    let role = viewer_role(&req, params.role.as_deref());

    match state.store.all_locations(!role.is_admin()).await {
        Ok(locations) => {
            let visible = visible_locations(
                &locations,
                role,
                &FilterState::default(),
                &state.config.visibility_policy(),
            );
            let mut bubbles = consolidate(&visible, &state.gazetteer);
            rank_bubbles(&mut bubbles);
            let api_bubbles: Vec<ApiCityBubble> =
                bubbles.into_iter().map(ApiCityBubble::from).collect();
            HttpResponse::Ok().json(api_bubbles)
        }
        Err(e) => {
            log::error!("Failed to fetch locations for city bubbles: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch city bubbles"
            }))
        }
    }
}

/// `GET /api/locations`
///
/// Returns the filtered, ranked locations within a bounding box (the map
/// pin layer — unpaginated, unlike the card list served by `/api/view`).
pub async fn locations(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<LocationsQueryParams>,
) -> HttpResponse {
    let role = viewer_role(&req, params.role.as_deref());
    let bounds = params
        .bbox
        .as_deref()
        .and_then(parse_bbox)
        .unwrap_or(CONTIGUOUS_US_BOUNDS);
    let filter = if role.is_admin() {
        build_filter(&ColorFilterParams::from(&*params))
    } else {
        FilterState::default()
    };

    match state
        .store
        .locations_in_viewport(bounds, !role.is_admin())
        .await
    {
        Ok(raw) => {
            let mut visible =
                visible_locations(&raw, role, &filter, &state.config.visibility_policy());
            rank_locations(&mut visible, bounds.center());
            let api_locations: Vec<ApiLocation> =
                visible.into_iter().map(ApiLocation::from).collect();
            HttpResponse::Ok().json(api_locations)
        }
        Err(e) => {
            log::error!("Failed to fetch locations: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch locations"
            }))
        }
    }
}

/// `POST /api/locations`
///
/// Records a suggested site. Suggestions start pending and unreleased,
/// so they stay invisible to non-admin viewers until reviewed.
pub async fn suggest_location(
    state: web::Data<AppState>,
    body: web::Json<SuggestLocationRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let coordinates = match (body.lat, body.lng) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        _ => None,
    };
    let name = body
        .name
        .unwrap_or_else(|| format!("Suggested: {}", body.address));

    let location = Location {
        id: Uuid::new_v4().to_string(),
        name,
        address: body.address,
        city: body.city,
        state: body.state,
        coordinates,
        votes: 0,
        released: false,
        status: SiteStatus::Pending,
        size_class: SizeClass::Unclassified,
        scores: Scorecard::default(),
        suggested_at: Utc::now(),
        notes: body.notes,
    };

    log::info!(
        "New suggestion {} at {}, {}, {}",
        location.id,
        location.address,
        location.city,
        location.state
    );
    state.store.insert(location.clone());
    HttpResponse::Created().json(ApiLocation::from(location))
}

/// `POST /api/locations/{id}/vote`
///
/// Casts (`delta: 1`) or retracts (`delta: -1`) a vote and returns the
/// authoritative count. Clients apply an optimistic local adjustment and
/// reconcile against this response, rolling back if it errors.
pub async fn vote(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<VoteRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    let delta = match body.delta {
        1 => VoteDelta::Up,
        -1 => VoteDelta::Down,
        other => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("delta must be 1 or -1, got {other}")
            }));
        }
    };

    match state.store.cast_vote(&id, delta, body.comment.as_deref()).await {
        Ok(votes) => HttpResponse::Ok().json(VoteResponse { votes }),
        Err(SourceError::NotFound { id }) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Location {id} not found")
        })),
        Err(e) => {
            log::error!("Vote on {id} failed: {e}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Vote could not be recorded"
            }))
        }
    }
}

/// `POST /api/locations/{id}/approve`
///
/// Admin-only: transitions a pending suggestion to active.
pub async fn approve(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    set_status(&req, &state, &path.into_inner(), SiteStatus::Active)
}

/// `POST /api/locations/{id}/reject`
///
/// Admin-only: rejects a suggestion.
pub async fn reject(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    set_status(&req, &state, &path.into_inner(), SiteStatus::Rejected)
}

/// `POST /api/locations/{id}/release`
///
/// Admin-only: toggles the released flag gating non-admin visibility.
pub async fn release(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ReleaseRequest>,
) -> HttpResponse {
    if !viewer_role(&req, None).is_admin() {
        return forbidden();
    }
    match state.store.set_released(&path.into_inner(), body.released) {
        Ok(location) => HttpResponse::Ok().json(ApiLocation::from(location)),
        Err(StoreError::NotFound { id }) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Location {id} not found")
        })),
        Err(e) => {
            log::error!("Release toggle failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Release toggle failed"
            }))
        }
    }
}

fn set_status(
    req: &HttpRequest,
    state: &web::Data<AppState>,
    id: &str,
    status: SiteStatus,
) -> HttpResponse {
    if !viewer_role(req, None).is_admin() {
        return forbidden();
    }
    match state.store.set_status(id, status) {
        Ok(location) => HttpResponse::Ok().json(ApiLocation::from(location)),
        Err(StoreError::NotFound { id }) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Location {id} not found")
        })),
        Err(e) => {
            log::error!("Status transition failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Status transition failed"
            }))
        }
    }
}

fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({
        "error": "Admin role required"
    }))
}

/// Resolves the viewer role from the `role` query parameter or the
/// `X-Viewer-Role` header, defaulting to non-admin. The value is trusted
/// as supplied by the upstream auth collaborator; this server only
/// branches on it.
fn viewer_role(req: &HttpRequest, param: Option<&str>) -> ViewerRole {
    param
        .or_else(|| {
            req.headers()
                .get("X-Viewer-Role")
                .and_then(|value| value.to_str().ok())
        })
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_default()
}

/// Builds an admin filter state from comma-separated query parameters.
/// Absent parameters leave the default (all colors, all sizes except
/// `RedReject`, all released scopes).
fn build_filter(params: &ColorFilterParams) -> FilterState {
    let mut filter = FilterState::default();

    let categories = [
        (ScoreCategory::Neighborhood, &params.neighborhood_colors),
        (ScoreCategory::Regulatory, &params.regulatory_colors),
        (ScoreCategory::Building, &params.building_colors),
        (ScoreCategory::Price, &params.price_colors),
        (ScoreCategory::Overall, &params.overall_colors),
    ];
    for (category, colors) in categories {
        if let Some(colors) = colors.as_deref() {
            filter.restrict_colors(
                category,
                colors.split(',').filter_map(|c| c.trim().parse().ok()),
            );
        }
    }

    if let Some(sizes) = params.sizes.as_deref() {
        filter.sizes = sizes.split(',').filter_map(|s| s.trim().parse().ok()).collect();
    }

    if let Some(scope) = params.released_scope.as_deref() {
        if let Ok(scope) = scope.trim().parse() {
            filter.released_scope = scope;
        }
    }

    filter
}

/// Parses a bounding box string `"west,south,east,north"` into a
/// [`BoundingBox`].
fn parse_bbox(s: &str) -> Option<BoundingBox> {
    let parts: Vec<f64> = s.split(',').filter_map(|p| p.trim().parse().ok()).collect();
    if parts.len() == 4 {
        Some(BoundingBox::new(parts[0], parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use site_map_site_models::{ReleasedScope, ScoreColor};

    use super::*;

    #[test]
    fn parses_bbox_string() {
        let bbox = parse_bbox("-98.0, 30.0, -97.4, 30.6").unwrap();
        assert!((bbox.west - -98.0).abs() < f64::EPSILON);
        assert!((bbox.north - 30.6).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_short_bbox_string() {
        assert!(parse_bbox("-98.0, 30.0, -97.4").is_none());
        assert!(parse_bbox("").is_none());
    }

    #[test]
    fn builds_filter_from_query_params() {
        let params = ColorFilterParams {
            neighborhood_colors: None,
            regulatory_colors: None,
            building_colors: None,
            price_colors: None,
            overall_colors: Some("GREEN,YELLOW".to_string()),
            sizes: Some("MICRO,GROWTH".to_string()),
            released_scope: Some("UNRELEASED".to_string()),
        };
        let filter = build_filter(&params);
        assert!(filter.admits_color(ScoreCategory::Overall, ScoreColor::Green));
        assert!(!filter.admits_color(ScoreCategory::Overall, ScoreColor::Red));
        assert!(filter.admits_color(ScoreCategory::Price, ScoreColor::Red));
        assert!(filter.admits_size(SizeClass::Micro));
        assert!(!filter.admits_size(SizeClass::Flagship));
        assert_eq!(filter.released_scope, ReleasedScope::Unreleased);
    }

    #[test]
    fn unknown_filter_tokens_are_ignored() {
        let params = ColorFilterParams {
            neighborhood_colors: None,
            regulatory_colors: None,
            building_colors: None,
            price_colors: None,
            overall_colors: Some("GREEN,SPARKLY".to_string()),
            sizes: None,
            released_scope: Some("SOMETIMES".to_string()),
        };
        let filter = build_filter(&params);
        assert!(filter.admits_color(ScoreCategory::Overall, ScoreColor::Green));
        assert!(!filter.admits_color(ScoreCategory::Overall, ScoreColor::Yellow));
        assert_eq!(filter.released_scope, ReleasedScope::All);
    }
}
