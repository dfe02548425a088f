//! Host platform traits.
//!
//! TinyBit runs embedded in a host publishing platform. The host exposes its
//! request state and attachment library through these traits; the built-in
//! hook targets only ever see these seams, never the host itself.

use std::path::PathBuf;

/// Read access to the host's current request state.
///
/// Implementations answer queries about what the host is currently
/// rendering. They are expected to be cheap; filters call them on every
/// invocation.
pub trait ViewContext: Send + Sync {
    /// Whether the current request renders a single content item
    /// (as opposed to an archive, listing, or feed).
    fn is_single(&self) -> bool;
}

/// Read access to the host's attachment library.
///
/// Attachments are host-managed uploads identified by a numeric id. The
/// host keeps the backing file and its recorded MIME type; TinyBit only
/// reads them.
pub trait AttachmentStore: Send + Sync {
    /// Filesystem path of the original file behind an attachment, if the
    /// attachment has one.
    fn attached_file(&self, attachment_id: u64) -> Option<PathBuf>;

    /// MIME type recorded for an attachment, if any.
    fn mime_type(&self, attachment_id: u64) -> Option<String>;
}
