//! Core traits defined in `tinybit-core` and implemented by the host adapter.

pub mod host;

pub use host::{AttachmentStore, ViewContext};
