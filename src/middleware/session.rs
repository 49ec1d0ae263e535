//! Session-refresh middleware.
//!
//! Asks the auth provider for the current user on every page/API request,
//! writes back any refreshed or expired session cookies, and applies the
//! routing policy: signed-in users are kept out of `/auth`, anonymous users
//! out of `/dashboard`, and `/` goes to whichever of the two fits. Lookup
//! failures fail open.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    auth::{cookies, SessionChange},
    state::AppState,
};

pub const LOGIN_PATH:     &str = "/auth/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
const AUTH_PREFIX:        &str = "/auth";

const SKIPPED_PREFIXES: &[&str] = &["/assets/", "/_next/static", "/_next/image"];
const IMAGE_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp", ".ico"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Continue,
    Redirect(&'static str),
}

/// `true` for paths the middleware should look at at all.
pub fn is_session_path(path: &str) -> bool {
    if path == "/favicon.ico" || SKIPPED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return false;
    }
    let lower = path.to_ascii_lowercase();
    !IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn route_decision(path: &str, authenticated: bool) -> RouteDecision {
    if path == "/" {
        return RouteDecision::Redirect(if authenticated { DASHBOARD_PATH } else { LOGIN_PATH });
    }
    if authenticated && under(path, AUTH_PREFIX) {
        return RouteDecision::Redirect(DASHBOARD_PATH);
    }
    if !authenticated && under(path, DASHBOARD_PATH) {
        return RouteDecision::Redirect(LOGIN_PATH);
    }
    RouteDecision::Continue
}

/// Safe methods keep theirs (307); anything else is turned into a GET (303)
/// so a form post to `/auth/login` does not land on a GET-only page.
fn redirect(method: &Method, to: &'static str) -> Response {
    if method == Method::GET || method == Method::HEAD {
        Redirect::temporary(to).into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

/// Every exit of the middleware goes through here so cookie changes from the
/// lookup land on the final response, redirect or not.
struct SessionResponse<'a> {
    cookies: &'a Cookies,
    secure:  bool,
}

impl SessionResponse<'_> {
    async fn finish(
        self,
        change: &SessionChange,
        decision: RouteDecision,
        req: Request,
        next: Next,
    ) -> Response {
        cookies::apply(self.cookies, change, self.secure);
        match decision {
            RouteDecision::Redirect(to) => redirect(req.method(), to),
            RouteDecision::Continue => next.run(req).await,
        }
    }
}

pub async fn refresh_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if !is_session_path(&path) {
        return next.run(req).await;
    }

    let tokens = cookies::read_tokens(&cookies);
    let lookup = match state.auth.get_user(&tokens).await {
        Ok(lookup) => lookup,
        Err(err) => {
            tracing::error!(
                error = %err,
                %path,
                "Session lookup failed, continuing unauthenticated"
            );
            return next.run(req).await;
        }
    };

    let authenticated = lookup.user.is_some();
    if let Some(user) = lookup.user {
        tracing::debug!(user_id = %user.id, "Session user attached");
        req.extensions_mut().insert(user);
    }

    let decision = route_decision(&path, authenticated);
    SessionResponse { cookies: &cookies, secure: !state.config.is_development() }
        .finish(&lookup.change, decision, req, next)
        .await
}
