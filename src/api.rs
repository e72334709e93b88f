//! REST API for Puno route planning.
//!
//! Provides endpoints for:
//! - Landmark listing
//! - Routes between named landmarks or raw coordinates
//! - Route computation with SSE progress updates
//! - Cached road graph inspection
//! - Swagger UI at /q/swagger-ui

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::Coordinate;
use crate::error::RoutingError;
use crate::geometry::encode_polyline;
use crate::landmarks::{LandmarkCategory, LandmarkRegistry};
use crate::planner::{Route, RoutePlanner, Trip};
use crate::store::CachedGraphInfo;

/// Application state shared across handlers.
pub struct AppState {
    pub planner: RoutePlanner,
}

/// Creates the API router with CORS, request tracing and Swagger UI enabled.
pub fn create_router(planner: RoutePlanner) -> Router {
    let state = Arc::new(AppState { planner });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Landmarks
        .route("/landmarks", get(list_landmarks))
        // Routes
        .route("/routes", post(create_route))
        .route("/routes/coordinates", post(create_route_from_coordinates))
        .route("/routes/stream", get(stream_route))
        // Cache
        .route("/graphs", get(list_graphs))
        // Swagger UI at /q/swagger-ui (Quarkus-style path)
        .merge(SwaggerUi::new("/q/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// A [`RoutingError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub RoutingError);

impl From<RoutingError> for ApiError {
    fn from(e: RoutingError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            RoutingError::SameEndpoints => StatusCode::BAD_REQUEST,
            RoutingError::UnknownLandmark(_) => StatusCode::NOT_FOUND,
            RoutingError::Fetch(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

// ============================================================================
// Health & Info
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status indicator ("UP" when healthy).
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// Application info response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    /// Application name.
    pub name: &'static str,
    /// Application version.
    pub version: &'static str,
    /// Road-network center as `[latitude, longitude]`.
    #[schema(value_type = Vec<f64>)]
    pub center: Coordinate,
    /// Road-network radius in meters.
    pub radius_meters: f64,
    /// Landmark proximity radius in meters.
    pub tolerance_meters: f64,
}

/// GET /info - Application info endpoint.
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "Application info", body = InfoResponse))
)]
async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    let config = state.planner.config();
    Json(InfoResponse {
        name: "Puno Routes",
        version: env!("CARGO_PKG_VERSION"),
        center: config.center,
        radius_meters: config.radius_m,
        tolerance_meters: config.tolerance_m,
    })
}

// ============================================================================
// Landmarks
// ============================================================================

/// Landmark DTO.
#[derive(Debug, Serialize, ToSchema)]
pub struct LandmarkDto {
    pub name: String,
    /// `[latitude, longitude]`.
    #[schema(value_type = Vec<f64>)]
    pub location: Coordinate,
    pub category: LandmarkCategory,
    pub emoji: &'static str,
}

/// GET /landmarks - List the landmark registry in order.
#[utoipa::path(
    get,
    path = "/landmarks",
    responses((status = 200, description = "Registered landmarks", body = Vec<LandmarkDto>))
)]
async fn list_landmarks(State(state): State<Arc<AppState>>) -> Json<Vec<LandmarkDto>> {
    let landmarks = state
        .planner
        .landmarks()
        .iter()
        .map(|l| LandmarkDto {
            name: l.name.clone(),
            location: l.position,
            category: l.category,
            emoji: l.category.emoji(),
        })
        .collect();
    Json(landmarks)
}

// ============================================================================
// Routes
// ============================================================================

/// Route request between two registered landmarks.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
}

/// Route request between two coordinates.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateRouteRequest {
    /// `[latitude, longitude]`.
    #[schema(value_type = Vec<f64>)]
    pub origin: Coordinate,
    /// `[latitude, longitude]`.
    #[schema(value_type = Vec<f64>)]
    pub destination: Coordinate,
    /// Road-network center; defaults to the configured one.
    #[schema(value_type = Option<Vec<f64>>)]
    #[serde(default)]
    pub center: Option<Coordinate>,
    /// Names used to pin the ends of the stop list.
    #[serde(default)]
    pub origin_name: Option<String>,
    #[serde(default)]
    pub destination_name: Option<String>,
}

/// A stop along the route.
#[derive(Debug, Serialize, ToSchema)]
pub struct StopDto {
    pub name: String,
    pub category: LandmarkCategory,
    pub emoji: &'static str,
}

/// Route result.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub reachable: bool,
    /// Route length from edge data; 0 when unreachable.
    pub distance_meters: f64,
    /// Search cost; null when unreachable.
    pub search_cost_meters: Option<f64>,
    /// Node positions in travel order, each `[latitude, longitude]`.
    #[schema(value_type = Vec<Vec<f64>>)]
    pub coordinates: Vec<Coordinate>,
    /// Google encoded polyline of `coordinates`.
    pub polyline: String,
    pub stops: Vec<StopDto>,
    pub message: String,
}

impl TripResponse {
    fn from_route(
        route: &Route,
        origin: Option<String>,
        destination: Option<String>,
        stops: &[String],
        landmarks: &LandmarkRegistry,
    ) -> Self {
        let reachable = route.is_reachable();
        let message = if reachable {
            format!("Total distance: {:.1} m", route.distance_m)
        } else {
            "No route found between origin and destination".to_string()
        };
        let stops = stops
            .iter()
            .map(|name| {
                let category = landmarks
                    .get(name)
                    .map(|l| l.category)
                    .unwrap_or_else(|| LandmarkCategory::classify(name));
                StopDto {
                    name: name.clone(),
                    category,
                    emoji: category.emoji(),
                }
            })
            .collect();

        Self {
            origin,
            destination,
            reachable,
            distance_meters: route.distance_m,
            search_cost_meters: reachable.then_some(route.search_cost_m),
            coordinates: route.coordinates.clone(),
            polyline: encode_polyline(&route.coordinates),
            stops,
            message,
        }
    }

    fn from_trip(trip: &Trip, landmarks: &LandmarkRegistry) -> Self {
        Self::from_route(
            &trip.route,
            Some(trip.origin.clone()),
            Some(trip.destination.clone()),
            &trip.stops,
            landmarks,
        )
    }
}

/// POST /routes - Route between two registered landmarks.
#[utoipa::path(
    post,
    path = "/routes",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Route computed (possibly unreachable)", body = TripResponse),
        (status = 400, description = "Origin equals destination", body = ErrorResponse),
        (status = 404, description = "Unknown landmark", body = ErrorResponse),
        (status = 503, description = "Road network unavailable", body = ErrorResponse)
    )
)]
async fn create_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    let planner = &state.planner;
    let trip = planner
        .plan_trip(&request.origin, &request.destination)
        .await?;
    Ok(Json(TripResponse::from_trip(&trip, planner.landmarks())))
}

/// POST /routes/coordinates - Route between two coordinates.
///
/// Stops are only reported when both endpoint names are given.
#[utoipa::path(
    post,
    path = "/routes/coordinates",
    request_body = CoordinateRouteRequest,
    responses(
        (status = 200, description = "Route computed (possibly unreachable)", body = TripResponse),
        (status = 400, description = "Origin equals destination", body = ErrorResponse),
        (status = 503, description = "Road network unavailable", body = ErrorResponse)
    )
)]
async fn create_route_from_coordinates(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CoordinateRouteRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    let planner = &state.planner;
    let center = request.center.unwrap_or(planner.config().center);
    let route = planner
        .compute_route(center, request.origin, request.destination)
        .await?;

    let stops = match (&request.origin_name, &request.destination_name) {
        (Some(o), Some(d)) => planner.annotate_stops(&route, planner.landmarks(), o, d),
        _ => Vec::new(),
    };
    Ok(Json(TripResponse::from_route(
        &route,
        request.origin_name,
        request.destination_name,
        &stops,
        planner.landmarks(),
    )))
}

/// Query parameters for the streaming endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StreamParams {
    /// Origin landmark name.
    pub origin: String,
    /// Destination landmark name.
    pub destination: String,
}

fn sse_event(value: serde_json::Value) -> Result<String, Infallible> {
    Ok(format!("data: {}\n\n", value))
}

fn sse_error(e: &RoutingError) -> Result<String, Infallible> {
    sse_event(json!({"event": "error", "message": e.to_string()}))
}

/// GET /routes/stream - Route between two landmarks with SSE progress updates.
///
/// Emits `progress` events for the `loading` and `routing` phases, then a
/// single `complete` event carrying the trip, or an `error` event.
/// Compatible with the browser EventSource API.
#[utoipa::path(
    get,
    path = "/routes/stream",
    params(StreamParams),
    responses((
        status = 200,
        description = "Server-sent events: progress, then complete or error",
        content_type = "text/event-stream",
        body = String
    ))
)]
async fn stream_route(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StreamParams>,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        let planner = &state.planner;

        if let Err(e) = planner.resolve_trip(&params.origin, &params.destination) {
            yield sse_error(&e);
            return;
        }

        yield sse_event(json!({
            "event": "progress",
            "phase": "loading",
            "message": "Loading road network...",
            "percent": 20
        }));

        let config = planner.config();
        if let Err(e) = planner.store().get_graph(config.center, config.radius_m).await {
            yield sse_error(&e);
            return;
        }

        yield sse_event(json!({
            "event": "progress",
            "phase": "routing",
            "message": "Computing shortest route...",
            "percent": 60
        }));

        match planner.plan_trip(&params.origin, &params.destination).await {
            Ok(trip) => {
                let dto = TripResponse::from_trip(&trip, planner.landmarks());
                let trip_json = serde_json::to_value(&dto).unwrap_or_default();
                yield sse_event(json!({
                    "event": "progress",
                    "phase": "complete",
                    "message": "Ready!",
                    "percent": 100
                }));
                yield sse_event(json!({"event": "complete", "trip": trip_json}));
            }
            Err(e) => {
                yield sse_error(&e);
            }
        }
    };

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(stream),
    )
}

// ============================================================================
// Cache
// ============================================================================

/// GET /graphs - List cached road graphs.
#[utoipa::path(
    get,
    path = "/graphs",
    responses((status = 200, description = "Cached road graphs", body = Vec<CachedGraphInfo>))
)]
async fn list_graphs(State(state): State<Arc<AppState>>) -> Json<Vec<CachedGraphInfo>> {
    Json(state.planner.store().entries())
}

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        info,
        list_landmarks,
        create_route,
        create_route_from_coordinates,
        stream_route,
        list_graphs,
    ),
    components(schemas(
        HealthResponse,
        InfoResponse,
        ErrorResponse,
        LandmarkDto,
        LandmarkCategory,
        RouteRequest,
        CoordinateRouteRequest,
        StopDto,
        TripResponse,
        CachedGraphInfo,
    ))
)]
struct ApiDoc;
