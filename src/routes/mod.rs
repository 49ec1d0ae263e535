use axum::{middleware, response::Redirect, routing::get, Router};
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;

use crate::{
    middleware::{
        auth_guard::require_auth,
        session::{refresh_session, LOGIN_PATH},
    },
    state::AppState,
};

mod auth;
mod clinic;
mod dashboard;
mod debug;
mod users;

/// Build the full application router.
///
/// Every request passes the session middleware first; dashboard pages and the
/// `/api/v1` data routes additionally require a loaded profile via
/// [`require_auth`]. The debug page only exists in development.
pub fn app(state: AppState) -> Router {
    let dashboard_mw = middleware::from_fn_with_state(state.clone(), require_auth);

    let mut router = Router::new()
        .route("/", get(root))
        .merge(auth::router())
        .merge(dashboard::router().route_layer(dashboard_mw))
        .nest("/api/v1", api_routes(state.clone()))
        .nest_service("/assets", ServeDir::new("assets"));

    if state.config.is_development() {
        router = router.merge(debug::router());
    }

    router
        .layer(middleware::from_fn_with_state(state.clone(), refresh_session))
        .layer(CookieManagerLayer::new()) // outermost: the session layer reads the jar
        .with_state(state)
}

/// The `/api/v1` router. Session endpoints are public; everything else is
/// wrapped in [`require_auth`].
fn api_routes(state: AppState) -> Router<AppState> {
    let auth_mw = middleware::from_fn_with_state(state, require_auth);
    Router::new()
        .merge(auth::api_router())
        .merge(
            Router::new()
                .merge(users::router())
                .merge(clinic::router())
                .route_layer(auth_mw),
        )
}

/// Only reached when the session lookup failed open.
async fn root() -> Redirect {
    Redirect::temporary(LOGIN_PATH)
}
