use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use social_types::api::StatusBanner;

use crate::middleware::{reflect_cors, require_admin, require_auth};
use crate::rate_limit::rate_limit;
use crate::state::AppState;
use crate::{admin, auth, friends, messages, notifications, photos, posts, search, settings, users};

/// JSON bodies above this are rejected before any handler runs.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

async fn status() -> Json<StatusBanner> {
    Json(StatusBanner {
        status: "insecure-social-backend",
        message: "This API is intentionally vulnerable. Do not expose publicly.",
    })
}

/// Build the full application.
///
/// Layers run outermost first: CORS, body cap, request logging, rate limit,
/// then per-route session and admin checks.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(status))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));

    let protected_routes = Router::new()
        .route("/api/users/{id}", get(users::get_profile).put(users::update_profile))
        .route("/api/friends", get(friends::list_friends))
        .route("/api/friends/add", post(friends::add_friend))
        .route("/api/friends/{id}", delete(friends::remove_friend))
        .route("/api/messages", get(messages::get_thread))
        .route("/api/messages/send", post(messages::send_message))
        .route("/api/search", get(search::search_users))
        .route("/api/photos/user/{user_id}", get(photos::photos_by_user))
        .route("/api/photos/publish", post(photos::publish_photo))
        .route("/api/photos/item/{id}", delete(photos::delete_photo))
        .route("/api/photos/{filename}", get(photos::get_photo))
        .route("/api/posts/feed", get(posts::get_feed))
        .route("/api/posts", post(posts::create_post))
        .route("/api/posts/{id}", put(posts::update_post).delete(posts::delete_post))
        .route("/api/settings/update", post(settings::update_settings))
        .route("/api/notifications", get(notifications::get_notifications))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // route_layer order: the last one added runs first.
    let admin_routes = Router::new()
        .route("/api/admin/users/{id}/block", post(admin::set_block_status))
        .route("/api/admin/files", get(admin::list_files))
        .route("/api/admin/files/upload", post(admin::upload_file))
        .route("/api/admin/files/{name}", delete(admin::delete_file))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .nest_service("/static-photos", ServeDir::new(&state.uploads_dir))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(reflect_cors))
        .with_state(state)
}
