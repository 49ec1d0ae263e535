//! Shared application state — injected into every handler via `axum::extract::State`.

use std::sync::Arc;

use crate::{auth::AuthProvider, config::Config, db::Db, store::StoreProvider};

/// Application-wide state passed via axum `State<AppState>`.
///
/// In production both `auth` and `stores` are the same data-service client;
/// tests plug in in-memory providers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth:   Arc<dyn AuthProvider>,
    pub stores: Arc<dyn StoreProvider>,
}

impl AppState {
    pub fn new(config: Config, db: Db) -> Self {
        let db = Arc::new(db);
        Self {
            config,
            auth:   db.clone(),
            stores: db,
        }
    }
}
