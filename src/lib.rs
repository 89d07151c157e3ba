//! tripmate server library - exposes the router and modules for the binary and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod matching;
pub mod repositories;
pub mod services;
pub mod ws;

pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{any, get, post},
};
use std::sync::Arc;

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::authentication_middleware;
    use ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes(state.clone()))
        .nest("/profile", configure_profile_routes(state.clone()))
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/trips", configure_trip_routes(state.clone()))
        .nest("/requests", configure_request_routes(state.clone()))
        .nest("/chats", configure_chat_routes(state.clone()))
        .route(
            "/ws",
            any(ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .with_state(state)
}

/// Signup and login are public, `/me` needs a session
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let public_routes = Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user));

    let session_routes = Router::new()
        .route("/me", get(current_session))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(session_routes)
}

fn configure_profile_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(list_users))
        .route("/matches", get(list_matches))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Browsing is public, hosting and requesting need a session
fn configure_trip_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let public_routes = Router::new()
        .route("/", get(search_trips))
        .route("/{trip_id}", get(get_trip));

    let user_routes = Router::new()
        .route("/", post(host_trip))
        .route("/{trip_id}/requests", post(request_to_join))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(user_routes)
}

fn configure_request_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/pending", get(list_pending_requests))
        .route("/{request_id}/{action}", post(resolve_request))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_chat_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{authentication_middleware, room_participant_middleware};
    use services::*;

    // Authentication only
    let user_routes = Router::new()
        .route("/", get(list_rooms))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ));

    // Authentication + participation (the outer layer runs first)
    let participant_routes = Router::new()
        .route(
            "/{room_id}/messages",
            get(get_room_messages).post(send_message),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            room_participant_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    user_routes.merge(participant_routes)
}
