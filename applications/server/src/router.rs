/// HTTP routing
use crate::{api, error, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the complete application router
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        // Albums
        .route("/albums", post(api::albums::create_album))
        .route(
            "/albums/:id",
            get(api::albums::get_album)
                .put(api::albums::update_album)
                .delete(api::albums::delete_album),
        )
        .route("/albums/:id/covers", post(api::albums::upload_cover))
        // Songs
        .route(
            "/songs",
            post(api::songs::create_song).get(api::songs::list_songs),
        )
        .route(
            "/songs/:id",
            get(api::songs::get_song)
                .put(api::songs::update_song)
                .delete(api::songs::delete_song),
        )
        // Users
        .route("/users", post(api::users::register_user))
        .route("/users/:id", get(api::users::get_user))
        // Authentications
        .route(
            "/authentications",
            post(api::authentications::login)
                .put(api::authentications::refresh)
                .delete(api::authentications::logout),
        );

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Playlists
        .route(
            "/playlists",
            post(api::playlists::create_playlist).get(api::playlists::list_playlists),
        )
        .route(
            "/playlists/:id",
            axum::routing::delete(api::playlists::delete_playlist),
        )
        .route(
            "/playlists/:id/songs",
            post(api::playlists::add_song)
                .get(api::playlists::get_songs)
                .delete(api::playlists::remove_song),
        )
        .route(
            "/playlists/:id/activities",
            get(api::playlists::get_activities),
        )
        // Collaborations
        .route(
            "/collaborations",
            post(api::collaborations::add_collaborator)
                .delete(api::collaborations::remove_collaborator),
        )
        // Exports
        .route(
            "/export/playlists/:playlist_id",
            post(api::exports::export_playlist),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    // Uploaded covers
    let uploads = ServeDir::new(app_state.file_storage.base_path());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/upload", uploads)
        .layer(axum_middleware::from_fn(error::normalize_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
