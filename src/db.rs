use std::time::Duration;

use crate::{
    config::Config,
    supabase::{Client, ClientError},
};

pub type Db = Client;

/// Build the data-service handle from config. Missing credentials are a hard
/// error; nothing is contacted until the first query.
pub fn connect(config: &Config) -> Result<Db, ClientError> {
    let client = Client::new(
        &config.supabase_url,
        &config.supabase_anon_key,
        Duration::from_secs(config.http_timeout_secs),
    )?;

    tracing::info!(url = %client.base_url(), "Data service client configured");
    Ok(client)
}
