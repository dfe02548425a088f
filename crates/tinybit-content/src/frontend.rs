//! Frontend content target.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use tinybit_core::config::content::ContentConfig;
use tinybit_core::error::AppError;
use tinybit_core::result::AppResult;
use tinybit_core::traits::ViewContext;
use tinybit_hooks::{HookEvent, HookSpec, HookTarget};

use crate::attributes::force_element_attribute;

/// Hook target for frontend content rendering.
pub struct Frontend {
    /// Content filter settings.
    config: ContentConfig,
    /// Host request state.
    view: Arc<dyn ViewContext>,
}

impl Frontend {
    /// Creates the frontend target.
    pub fn new(config: ContentConfig, view: Arc<dyn ViewContext>) -> Self {
        Self { config, view }
    }

    /// Hook declarations for this target.
    ///
    /// Runs at priority 1 so the images are rewritten before later content
    /// filters see them.
    pub fn hooks() -> Vec<HookSpec> {
        vec![
            HookSpec::new("the_content")
                .member("filter_the_content_early")
                .priority(1),
        ]
    }

    /// Forces images in the leading content blocks to load eagerly.
    ///
    /// Only applies on single-item views. Blocks are separated by blank
    /// lines; images past the configured block count keep whatever loading
    /// behavior they had.
    pub fn filter_the_content_early(&self, content: &str) -> AppResult<String> {
        if !self.view.is_single() {
            return Ok(content.to_string());
        }

        let mut blocks: Vec<String> = content.split("\n\n").map(str::to_string).collect();
        for block in blocks.iter_mut().take(self.config.eager_image_blocks) {
            *block = force_element_attribute(block, "img", "loading", "eager")?;
        }

        Ok(blocks.join("\n\n"))
    }
}

#[async_trait]
impl HookTarget for Frontend {
    fn id(&self) -> &str {
        "frontend"
    }

    fn has_member(&self, member: &str) -> bool {
        member == "filter_the_content_early"
    }

    async fn invoke(&self, member: &str, event: &HookEvent) -> AppResult<Value> {
        match member {
            "filter_the_content_early" => {
                let content = event.value.as_str().ok_or_else(|| {
                    AppError::validation("the_content value must be a string")
                })?;
                Ok(Value::String(self.filter_the_content_early(content)?))
            }
            other => Err(AppError::hook(format!(
                "target 'frontend' has no member '{other}'"
            ))),
        }
    }
}
