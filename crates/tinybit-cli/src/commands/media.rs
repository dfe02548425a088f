//! Image maintenance commands.

use std::collections::BTreeSet;
use std::path::Path;

use clap::{Args, Subcommand};

use crate::output;
use tinybit_content::media::{compress_jpeg_file, resize_to_width};
use tinybit_core::config::AppConfig;
use tinybit_core::error::AppError;

/// Arguments for media commands
#[derive(Debug, Args)]
pub struct MediaArgs {
    /// Media subcommand
    #[command(subcommand)]
    pub command: MediaCommand,
}

/// Media subcommands
#[derive(Debug, Subcommand)]
pub enum MediaCommand {
    /// Write proportionally resized width variants of an image
    GenerateWidths {
        /// Source image path
        file: String,
        /// Comma-separated pixel widths, e.g. 300,768,1024
        #[arg(short, long)]
        widths: String,
    },
    /// Re-encode a JPEG in place at reduced quality
    Compress {
        /// Source image path
        file: String,
        /// JPEG quality 1-100, defaults to the configured value
        #[arg(short, long)]
        quality: Option<u8>,
    },
}

/// Execute media commands
pub async fn execute(args: &MediaArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MediaCommand::GenerateWidths { file, widths } => {
            generate_widths(Path::new(file), widths)
        }
        MediaCommand::Compress { file, quality } => {
            let quality = quality.unwrap_or(config.media.jpeg_quality);
            compress(Path::new(file), quality)
        }
    }
}

/// Resize an image to every requested width that is narrower than the
/// original. Widths at or above the original are skipped with a warning.
fn generate_widths(file: &Path, widths: &str) -> Result<(), AppError> {
    if !file.exists() {
        return Err(AppError::not_found("File does not exist."));
    }

    let widths = parse_widths(widths)?;

    let (original_width, _) = image::image_dimensions(file)
        .map_err(|e| AppError::media(format!("Failed to read image dimensions: {}", e)))?;

    for width in widths {
        if width >= original_width {
            output::print_warning(&format!(
                "Skipping: provided width '{}' exceeds original image width '{}'.",
                width, original_width
            ));
            continue;
        }

        let variant = resize_to_width(file, width)?;
        let name = variant
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| variant.path.display().to_string());
        println!("Generated {}", name);
    }

    output::print_success("Image widths created.");
    Ok(())
}

/// Re-encode a JPEG file in place at the given quality.
fn compress(file: &Path, quality: u8) -> Result<(), AppError> {
    if !file.exists() {
        return Err(AppError::not_found("File does not exist."));
    }

    let is_jpeg = file
        .extension()
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false);
    if !is_jpeg {
        return Err(AppError::validation("Only JPEG files can be compressed"));
    }

    if quality == 0 || quality > 100 {
        return Err(AppError::validation("Quality must be between 1 and 100"));
    }

    compress_jpeg_file(file, quality)?;

    output::print_success(&format!(
        "Compressed '{}' at quality {}",
        file.display(),
        quality
    ));
    Ok(())
}

/// Parse a comma-separated width list into sorted, deduplicated widths.
fn parse_widths(raw: &str) -> Result<Vec<u32>, AppError> {
    let mut widths = BTreeSet::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let width: u32 = part
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid width '{}'", part)))?;
        if width == 0 {
            return Err(AppError::validation("Width must be at least 1 pixel"));
        }

        widths.insert(width);
    }

    if widths.is_empty() {
        return Err(AppError::validation("No widths provided"));
    }

    Ok(widths.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use tinybit_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_parse_widths_sorts_and_dedupes() {
        let widths = parse_widths("768, 300,768,1024").unwrap();

        assert_eq!(widths, vec![300, 768, 1024]);
    }

    #[test]
    fn test_parse_widths_rejects_non_numeric_entries() {
        let err = parse_widths("300,abc").unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_parse_widths_rejects_zero() {
        let err = parse_widths("0,300").unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_parse_widths_rejects_empty_input() {
        let err = parse_widths(" , ").unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
