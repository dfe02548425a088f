//! Hook target trait.

use async_trait::async_trait;
use serde_json::Value;

use tinybit_core::result::AppResult;

use crate::definitions::HookEvent;

/// An object that declares hooks and exposes invocable members.
///
/// Targets answer two questions: does a member with a given name exist
/// (the capability probe the parser uses for convention-based resolution),
/// and what does invoking it yield. `has_member` must answer `true` for
/// exactly the member names `invoke` can dispatch.
#[async_trait]
pub trait HookTarget: Send + Sync {
    /// Stable identifier for this target, used in records and logs.
    fn id(&self) -> &str;

    /// Returns whether the target exposes a member with this name.
    fn has_member(&self, member: &str) -> bool;

    /// Invokes a member with the given event.
    ///
    /// Filters return the replacement value; actions return `Null`.
    /// Unknown member names yield a hook error.
    async fn invoke(&self, member: &str, event: &HookEvent) -> AppResult<Value>;
}
