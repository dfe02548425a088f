//! Media library target and image file helpers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use serde_json::Value;
use tracing::debug;

use tinybit_core::config::media::MediaConfig;
use tinybit_core::error::AppError;
use tinybit_core::result::AppResult;
use tinybit_core::traits::AttachmentStore;
use tinybit_hooks::{HookEvent, HookSpec, HookTarget};

/// MIME types eligible for JPEG re-encoding.
const JPEG_MIME_TYPES: &[&str] = &["image/jpg", "image/jpeg"];

/// Hook target for attachment processing.
pub struct Media {
    /// Media processing settings.
    config: MediaConfig,
    /// Host attachment library.
    store: Arc<dyn AttachmentStore>,
}

impl Media {
    /// Creates the media target.
    pub fn new(config: MediaConfig, store: Arc<dyn AttachmentStore>) -> Self {
        Self { config, store }
    }

    /// Hook declarations for this target.
    ///
    /// The member name is left to the probe; the hook passes the metadata
    /// plus the attachment id, hence two accepted arguments.
    pub fn hooks() -> Vec<HookSpec> {
        vec![
            HookSpec::new("generate_attachment_metadata")
                .priority(10)
                .accepted_args(2),
        ]
    }

    /// Re-encodes the original file behind a JPEG attachment at the
    /// configured quality.
    ///
    /// Attachments with another MIME type, no recorded MIME type, or no
    /// backing file are left alone.
    pub fn compress_attachment_original(&self, attachment_id: u64) -> AppResult<()> {
        let Some(mime) = self.store.mime_type(attachment_id) else {
            return Ok(());
        };
        if !JPEG_MIME_TYPES.contains(&mime.as_str()) {
            return Ok(());
        }
        let Some(file) = self.store.attached_file(attachment_id) else {
            debug!(attachment_id, "Attachment has no backing file, skipping compression");
            return Ok(());
        };

        compress_jpeg_file(&file, self.config.jpeg_quality)
    }
}

#[async_trait]
impl HookTarget for Media {
    fn id(&self) -> &str {
        "media"
    }

    fn has_member(&self, member: &str) -> bool {
        member == "filter_generate_attachment_metadata"
    }

    async fn invoke(&self, member: &str, event: &HookEvent) -> AppResult<Value> {
        match member {
            "filter_generate_attachment_metadata" => {
                let attachment_id = event.arg(0).and_then(Value::as_u64).ok_or_else(|| {
                    AppError::validation(
                        "generate_attachment_metadata expects an attachment id argument",
                    )
                })?;

                self.compress_attachment_original(attachment_id)?;

                // The metadata passes through untouched.
                Ok(event.value.clone())
            }
            other => Err(AppError::hook(format!(
                "target 'media' has no member '{other}'"
            ))),
        }
    }
}

/// Re-encodes a JPEG file in place at the given quality.
pub fn compress_jpeg_file(path: &Path, quality: u8) -> AppResult<()> {
    let img = image::open(path)
        .map_err(|e| AppError::media(format!("Failed to open '{}': {e}", path.display())))?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| AppError::media(format!("Failed to encode '{}': {e}", path.display())))?;
    writer.flush()?;

    debug!(file = %path.display(), quality, "Re-encoded JPEG in place");
    Ok(())
}

/// A generated width variant of an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthVariant {
    /// Path the variant was written to.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Resizes an image file to a target width, preserving the aspect ratio.
///
/// The variant is written next to the original under a `-WxH` name suffix
/// and keeps the original's format (by extension).
pub fn resize_to_width(file: &Path, width: u32) -> AppResult<WidthVariant> {
    let img = image::open(file)
        .map_err(|e| AppError::media(format!("Failed to open '{}': {e}", file.display())))?;

    let resized = img.resize(width, u32::MAX, FilterType::Lanczos3);
    let path = width_variant_path(file, resized.width(), resized.height());

    resized
        .save(&path)
        .map_err(|e| AppError::media(format!("Failed to save '{}': {e}", path.display())))?;

    Ok(WidthVariant {
        path,
        width: resized.width(),
        height: resized.height(),
    })
}

/// Builds the output path for a width variant: `name-WxH.ext`, replacing
/// any `-WxH` suffix already on the stem.
pub fn width_variant_path(file: &Path, width: u32, height: u32) -> PathBuf {
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let base = strip_dimension_suffix(stem);

    let mut name = format!("{base}-{width}x{height}");
    if let Some(ext) = file.extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(ext);
    }

    file.with_file_name(name)
}

/// Strips a trailing `-<digits>x<digits>` from a file stem, if present.
fn strip_dimension_suffix(stem: &str) -> &str {
    let Some((base, tail)) = stem.rsplit_once('-') else {
        return stem;
    };
    let Some((w, h)) = tail.split_once('x') else {
        return stem;
    };
    if !w.is_empty()
        && !h.is_empty()
        && w.bytes().all(|b| b.is_ascii_digit())
        && h.bytes().all(|b| b.is_ascii_digit())
    {
        base
    } else {
        stem
    }
}
