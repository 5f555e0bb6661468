use std::time::Duration;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;

/// SurrealDB connection options
#[derive(Clone, Debug)]
pub struct SurrealOpts {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
}

/// Default number of connection retry attempts
const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
/// Default delay between retry attempts in seconds
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

pub async fn surreal_connect(opts: &SurrealOpts) -> anyhow::Result<Surreal<Any>> {
    surreal_connect_with_retries(opts, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS).await
}

/// Connect to SurrealDB, retrying failed attempts `max_retries` times with
/// `retry_delay_secs` between them. A server that is still starting up
/// is the common case.
pub async fn surreal_connect_with_retries(
    opts: &SurrealOpts,
    max_retries: u32,
    retry_delay_secs: u64,
) -> anyhow::Result<Surreal<Any>> {
    let endpoint = ws_endpoint(&opts.endpoint);

    tracing::debug!(
        "Connecting to SurrealDB at {} (namespace: {}, database: {})",
        endpoint,
        opts.namespace,
        opts.database
    );

    let mut last_error = None;

    for attempt in 1..=max_retries.max(1) {
        match try_connect(&endpoint, opts).await {
            Ok(surreal) => {
                if attempt > 1 {
                    tracing::info!(
                        "Successfully connected to SurrealDB after {} attempts",
                        attempt
                    );
                }
                return Ok(surreal);
            }
            Err(e) => {
                if attempt < max_retries {
                    tracing::warn!(
                        "Failed to connect to SurrealDB at '{}' (attempt {}/{}): {}. Retrying in {}s...",
                        endpoint,
                        attempt,
                        max_retries,
                        e,
                        retry_delay_secs
                    );
                    tokio::time::sleep(Duration::from_secs(retry_delay_secs)).await;
                }
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e.context(format!(
            "Failed to connect to SurrealDB at '{endpoint}' after {max_retries} attempts"
        ))),
        None => Err(anyhow::anyhow!(
            "Failed to connect to SurrealDB at '{endpoint}'"
        )),
    }
}

/// WebSocket form of an HTTP endpoint; other schemes pass through.
pub fn ws_endpoint(endpoint: &str) -> String {
    endpoint
        .replace("http://", "ws://")
        .replace("https://", "wss://")
}

async fn try_connect(endpoint: &str, opts: &SurrealOpts) -> anyhow::Result<Surreal<Any>> {
    let surreal = surrealdb::engine::any::connect(endpoint)
        .await
        .map_err(|e| anyhow::anyhow!("SurrealDB connection to '{endpoint}' failed: {e}"))?;

    let username = &opts.username;
    surreal
        .signin(surrealdb::opt::auth::Root {
            username,
            password: &opts.password,
        })
        .await
        .map_err(|e| {
            anyhow::anyhow!("SurrealDB authentication failed (user: '{username}'): {e}")
        })?;

    let (ns, db) = (&opts.namespace, &opts.database);
    surreal.use_ns(ns).use_db(db).await.map_err(|e| {
        anyhow::anyhow!("SurrealDB failed to select namespace '{ns}' / database '{db}': {e}")
    })?;

    Ok(surreal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_endpoints_become_websocket() {
        assert_eq!(ws_endpoint("http://localhost:8000"), "ws://localhost:8000");
        assert_eq!(ws_endpoint("https://db.example.com"), "wss://db.example.com");
        assert_eq!(ws_endpoint("ws://localhost:8000"), "ws://localhost:8000");
    }
}
