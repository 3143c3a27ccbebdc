//! Route table. Three groups, one per credential kind: public, bearer
//! session, and raw API key. The credential shape a request must carry is
//! decided entirely by which group its path lives in.

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::auth;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/auth/forgot-password",
            post(handlers::auth::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(handlers::auth::reset_password),
        );

    let session_routes = Router::new()
        .merge(task_routes("/api/tasks"))
        .route(
            "/api/keys",
            post(handlers::api_keys::issue_key)
                .get(handlers::api_keys::list_keys)
                .delete(handlers::api_keys::revoke_all_keys),
        )
        .route("/api/keys/{id}", delete(handlers::api_keys::revoke_key))
        .route(
            "/api/account/email",
            get(handlers::account::get_email).put(handlers::account::change_email),
        )
        .route(
            "/api/account/profile-photo",
            get(handlers::account::get_profile_photo).put(handlers::account::change_profile_photo),
        )
        .route("/api/account/sync-time", get(handlers::account::sync_time))
        .route(
            "/api/account/created-at",
            get(handlers::account::account_created_at),
        )
        .route("/api/account", delete(handlers::account::delete_account))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    // Programmatic access: same task handlers behind the API-key gate.
    let api_key_routes = task_routes("/api/ext/tasks").route_layer(
        axum_middleware::from_fn_with_state(state.clone(), auth::require_api_key),
    );

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(api_key_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}

fn task_routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(
            prefix,
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            &format!("{prefix}/completed"),
            get(handlers::tasks::list_completed_tasks),
        )
        .route(
            &format!("{prefix}/incomplete"),
            get(handlers::tasks::list_incomplete_tasks),
        )
        .route(
            &format!("{prefix}/{{id}}"),
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route(
            &format!("{prefix}/{{id}}/complete"),
            put(handlers::tasks::complete_task),
        )
        .route(
            &format!("{prefix}/{{id}}/incomplete"),
            put(handlers::tasks::incomplete_task),
        )
}
