//! Media processing configuration.

use serde::{Deserialize, Serialize};

/// Settings for attachment compression and resizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// JPEG re-encode quality (1-100) applied to uploaded attachments.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_jpeg_quality() -> u8 {
    70
}
