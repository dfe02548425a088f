//! Cloudflare CDN integration target.

use async_trait::async_trait;
use serde_json::{Value, json};

use tinybit_core::error::AppError;
use tinybit_core::result::AppResult;
use tinybit_hooks::{HookEvent, HookSpec, HookTarget};

/// Hook target adjusting the Cloudflare purge behavior.
///
/// The purge-URL filter currently passes the set through unchanged; it
/// exists as the seam where per-site purge adjustments go.
pub struct Cloudflare;

impl Cloudflare {
    /// Hook declarations for this target.
    ///
    /// Only the hook name is declared; the member resolves by probe.
    pub fn hooks() -> Vec<HookSpec> {
        vec![HookSpec::new("cloudflare_purge_by_url")]
    }

    /// Filters the set of URLs purged when content changes.
    pub fn filter_cloudflare_purge_by_url(&self, urls: Vec<String>) -> Vec<String> {
        urls
    }
}

#[async_trait]
impl HookTarget for Cloudflare {
    fn id(&self) -> &str {
        "cloudflare"
    }

    fn has_member(&self, member: &str) -> bool {
        member == "filter_cloudflare_purge_by_url"
    }

    async fn invoke(&self, member: &str, event: &HookEvent) -> AppResult<Value> {
        match member {
            "filter_cloudflare_purge_by_url" => {
                let urls: Vec<String> = serde_json::from_value(event.value.clone())
                    .map_err(|e| {
                        AppError::validation(format!(
                            "cloudflare_purge_by_url expects a list of URLs: {e}"
                        ))
                    })?;
                Ok(json!(self.filter_cloudflare_purge_by_url(urls)))
            }
            other => Err(AppError::hook(format!(
                "target 'cloudflare' has no member '{other}'"
            ))),
        }
    }
}
