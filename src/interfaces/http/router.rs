//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::middleware::{auth_middleware, AuthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{auth, bookings, health, rooms};
use crate::application::{BookingService, RoomService, UserService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;

/// Application services shared by every route group
#[derive(Clone)]
pub struct ApiServices {
    pub rooms: Arc<RoomService>,
    pub bookings: Arc<BookingService>,
    pub users: Arc<UserService>,
}

impl ApiServices {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self {
            rooms: Arc::new(RoomService::new(repos.clone())),
            bookings: Arc::new(BookingService::new(repos.clone())),
            users: Arc::new(UserService::new(repos, jwt_config)),
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from POST /token"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::welcome,
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        // Rooms
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        rooms::get_room_availability,
        // Bookings
        bookings::list_bookings,
        bookings::get_booking,
        bookings::create_booking,
        bookings::update_booking,
        bookings::cancel_booking,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            health::WelcomeResponse,
            auth::TokenRequest,
            auth::TokenResponse,
            auth::RegisterRequest,
            auth::UserDto,
            rooms::RoomDto,
            rooms::CreateRoomRequest,
            rooms::UpdateRoomRequest,
            rooms::AvailabilitySlotDto,
            bookings::BookingDto,
            bookings::CreateBookingRequest,
            bookings::UpdateBookingRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service banner and health probe"),
        (name = "Authentication", description = "Access tokens, registration, current user"),
        (name = "Rooms", description = "Room registry and availability"),
        (name = "Bookings", description = "Booking lifecycle"),
    ),
    info(
        title = "Coworking Management System API",
        version = "1.0.0",
        description = "Room booking backend: conflict-free reservations, availability and pricing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the HTTP router.
///
/// `db` feeds the health probe; `None` means the in-memory store.
/// `/metrics` is mounted only when a Prometheus handle is given.
pub fn create_api_router(
    services: ApiServices,
    db: Option<DatabaseConnection>,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let auth_state = AuthState {
        users: services.users.clone(),
    };
    let auth_handler_state = auth::AuthHandlerState {
        users: services.users.clone(),
    };

    let auth_routes = Router::new()
        .route("/token", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth_handler_state.clone());

    let profile_routes = Router::new()
        .route("/users/me", get(auth::get_current_user))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_handler_state);

    let room_routes = Router::new()
        .route("/", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/{room_id}",
            get(rooms::get_room)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route("/{room_id}/availability", get(rooms::get_room_availability))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(rooms::RoomAppState {
            rooms: services.rooms.clone(),
        });

    let booking_routes = Router::new()
        .route("/", get(bookings::list_bookings).post(bookings::create_booking))
        .route(
            "/{booking_id}",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::cancel_booking),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(bookings::BookingAppState {
            bookings: services.bookings.clone(),
        });

    let health_routes = Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(auth_routes)
        .merge(profile_routes)
        .nest("/rooms", room_routes)
        .nest("/bookings", booking_routes);

    if let Some(handle) = prometheus {
        router = router.route(
            "/metrics",
            get(prometheus_metrics).with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
