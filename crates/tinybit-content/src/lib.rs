//! # tinybit-content
//!
//! Built-in hook targets for TinyBit: frontend content filtering, media
//! library processing, and external service integrations. Each target
//! declares its hooks as positional [`HookSpec`]s and is wired to the bus
//! through [`register_builtin_targets`].
//!
//! [`HookSpec`]: tinybit_hooks::HookSpec

pub mod attributes;
pub mod frontend;
pub mod integrations;
pub mod media;

use std::sync::Arc;

use tracing::info;

use tinybit_core::config::AppConfig;
use tinybit_core::result::AppResult;
use tinybit_core::traits::{AttachmentStore, ViewContext};
use tinybit_hooks::{HookRegistrar, ResolvedHook};

pub use attributes::force_element_attribute;
pub use frontend::Frontend;
pub use integrations::Cloudflare;
pub use media::Media;

/// Registers every built-in target with the bus.
///
/// Returns the parsed records of all targets, in registration order.
pub async fn register_builtin_targets(
    registrar: &HookRegistrar,
    config: &AppConfig,
    view: Arc<dyn ViewContext>,
    attachments: Arc<dyn AttachmentStore>,
) -> AppResult<Vec<ResolvedHook>> {
    let mut records = Vec::new();

    let frontend = Arc::new(Frontend::new(config.content.clone(), view));
    records.extend(registrar.register_all(frontend, &Frontend::hooks()).await?);

    let media = Arc::new(Media::new(config.media.clone(), attachments));
    records.extend(registrar.register_all(media, &Media::hooks()).await?);

    records.extend(
        registrar
            .register_all(Arc::new(Cloudflare), &Cloudflare::hooks())
            .await?,
    );

    info!(count = records.len(), "Built-in hook targets registered");

    Ok(records)
}
