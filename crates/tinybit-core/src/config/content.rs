//! Frontend content filtering configuration.

use serde::{Deserialize, Serialize};

/// Settings for the frontend content filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Number of leading content blocks whose images are forced to load
    /// eagerly. Blocks past this count are left untouched.
    #[serde(default = "default_eager_image_blocks")]
    pub eager_image_blocks: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            eager_image_blocks: default_eager_image_blocks(),
        }
    }
}

fn default_eager_image_blocks() -> usize {
    5
}
