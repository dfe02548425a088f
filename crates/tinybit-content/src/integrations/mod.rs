//! Integrations with services living outside the host platform.

pub mod cloudflare;

pub use cloudflare::Cloudflare;
