//! # tinybit-hooks
//!
//! Convention-based hook system for TinyBit. Provides:
//!
//! - Positional hook declarations ([`HookSpec`]) and their parsed form
//!   ([`ResolvedHook`])
//! - A pluggable naming convention ([`NamingConvention`]) with the default
//!   `filter_`/`action_` prefix rule
//! - A parser ([`HookParser`]) that resolves declarations against a target
//! - A registration driver ([`HookRegistrar`]) and an in-memory dispatch
//!   bus ([`HookRegistry`])

pub mod convention;
pub mod definitions;
pub mod parser;
pub mod registrar;
pub mod registry;
pub mod target;

pub use convention::{NamingConvention, PrefixConvention};
pub use definitions::{HookEvent, HookKind, HookSpec, ResolvedHook, SpecAtom};
pub use parser::HookParser;
pub use registrar::HookRegistrar;
pub use registry::{HookBinding, HookBus, HookRegistry};
pub use target::HookTarget;
