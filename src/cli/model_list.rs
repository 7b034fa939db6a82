//! Non-interactive model listing (`--list-models`).

use tracing::warn;

use crate::api::fetch_free_models;
use crate::core::catalog::FREE_MODELS;
use crate::core::config::Config;

/// Print one model id per line.
///
/// This path must succeed even with no network and no credential: any fetch
/// failure or an empty catalogue falls back to the built-in list.
pub async fn print_free_models(config: &Config) {
    for model in fetch_or_fallback(config).await {
        println!("{model}");
    }
}

async fn fetch_or_fallback(config: &Config) -> Vec<String> {
    let builtin = || FREE_MODELS.iter().map(|m| m.to_string()).collect();

    let http = match reqwest::Client::builder().timeout(config.timeout).build() {
        Ok(http) => http,
        Err(err) => {
            warn!(error = %err, "could not build HTTP client, using built-in model list");
            return builtin();
        }
    };

    let key = if config.api_key.is_empty() {
        None
    } else {
        Some(config.api_key.as_str())
    };

    match fetch_free_models(&http, config, key).await {
        Ok(models) if !models.is_empty() => models,
        Ok(_) => builtin(),
        Err(err) => {
            warn!(error = %err, "model catalogue fetch failed, using built-in model list");
            builtin()
        }
    }
}
