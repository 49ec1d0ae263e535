//! Development-only diagnostics: which settings the process picked up and
//! whether the data service answers.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct EnvEntry {
    name:  &'static str,
    set:   bool,
    value: String,
}

#[derive(Serialize)]
struct DiagnosticQuery {
    ok:    bool,
    error: Option<String>,
}

#[derive(Serialize)]
struct EnvReport {
    environment:      Vec<EnvEntry>,
    diagnostic_query: DiagnosticQuery,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/debug/env", get(env_report))
}

fn entry(name: &'static str, value: &str) -> EnvEntry {
    EnvEntry { name, set: !value.is_empty(), value: value.to_owned() }
}

fn secret(name: &'static str, value: &str) -> EnvEntry {
    EnvEntry { name, set: !value.is_empty(), value: mask(value) }
}

/// Keep a short prefix so keys can be told apart without being leaked.
fn mask(value: &str) -> String {
    let prefix: String = value.chars().take(6).collect();
    if value.chars().count() <= 6 {
        "*".repeat(value.chars().count())
    } else {
        format!("{prefix}…")
    }
}

/// GET /debug/env
async fn env_report(State(state): State<AppState>) -> Json<EnvReport> {
    let config = &state.config;
    let environment = vec![
        entry("SUPABASE_URL", &config.supabase_url),
        secret("SUPABASE_ANON_KEY", &config.supabase_anon_key),
        entry("SITE_URL", &config.site_url),
        entry("APP_ENV", &config.app_env),
    ];

    let diagnostic_query = match state.stores.anonymous().ping().await {
        Ok(()) => DiagnosticQuery { ok: true, error: None },
        Err(err) => {
            tracing::warn!(error = %err, "Debug diagnostic query failed");
            DiagnosticQuery { ok: false, error: Some(err.to_string()) }
        }
    };

    Json(EnvReport { environment, diagnostic_query })
}
