//! Hook subscription registry and dispatch bus.
//!
//! Subscriptions are kept per hook name and sorted by priority (lower runs
//! first, ties run in registration order). Dispatch never aborts the chain:
//! a handler error is logged and, for filters, the previous value travels
//! on unchanged.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::definitions::{HookEvent, HookKind};
use crate::target::HookTarget;

/// A resolved (target, member) pair subscribed to a hook.
#[derive(Clone)]
pub struct HookBinding {
    /// The target whose member is invoked.
    pub target: Arc<dyn HookTarget>,
    /// The member to invoke on dispatch.
    pub member: String,
    /// Priority (lower = earlier execution).
    pub priority: i64,
    /// Number of arguments the member accepts.
    pub accepted_args: i64,
}

impl fmt::Debug for HookBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBinding")
            .field("target", &self.target.id())
            .field("member", &self.member)
            .field("priority", &self.priority)
            .field("accepted_args", &self.accepted_args)
            .finish()
    }
}

/// The registration surface consumed by [`HookRegistrar`].
///
/// [`HookRegistrar`]: crate::registrar::HookRegistrar
#[async_trait]
pub trait HookBus: Send + Sync {
    /// Subscribes a binding to a hook on the filter path.
    async fn add_filter(&self, hook: &str, binding: HookBinding);

    /// Subscribes a binding to a hook on the action path.
    async fn add_action(&self, hook: &str, binding: HookBinding);
}

/// Entry in the hook registry.
#[derive(Debug)]
struct Subscription {
    /// The bound target member.
    binding: HookBinding,
    /// Which dispatch path fires this subscription.
    kind: HookKind,
}

/// In-memory hook bus with priority-ordered dispatch.
#[derive(Debug)]
pub struct HookRegistry {
    /// Hook name → sorted list of subscriptions.
    subscriptions: RwLock<HashMap<String, Vec<Subscription>>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
        }
    }

    async fn add(&self, hook: &str, binding: HookBinding, kind: HookKind) {
        let mut subscriptions = self.subscriptions.write().await;
        let entries = subscriptions.entry(hook.to_string()).or_default();

        info!(
            hook = %hook,
            target = %binding.target.id(),
            member = %binding.member,
            priority = binding.priority,
            kind = %kind,
            "Hook subscription added"
        );

        entries.push(Subscription { binding, kind });

        // Stable sort keeps registration order within equal priorities
        entries.sort_by_key(|s| s.binding.priority);
    }

    /// Returns the subscriptions for a hook on one path, in dispatch order.
    async fn bindings_for(&self, hook: &str, kind: HookKind) -> Vec<HookBinding> {
        let subscriptions = self.subscriptions.read().await;
        subscriptions
            .get(hook)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|s| s.kind == kind)
                    .map(|s| s.binding.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Runs a value through every filter subscribed to a hook.
    ///
    /// Each filter sees the value produced by its predecessor. At most
    /// `accepted_args - 1` of the extra arguments are forwarded, the value
    /// itself counting as the first argument. A failing filter is logged
    /// and skipped, leaving the value as it was.
    pub async fn apply_filters(&self, hook: &str, value: Value, args: &[Value]) -> Value {
        let bindings = self.bindings_for(hook, HookKind::Filter).await;

        if bindings.is_empty() {
            return value;
        }

        debug!(hook = %hook, count = bindings.len(), "Applying filters");

        let mut value = value;
        for binding in bindings {
            let extras = usize::try_from(binding.accepted_args - 1).unwrap_or(0);
            let event = HookEvent {
                hook: hook.to_string(),
                value: value.clone(),
                args: args.iter().take(extras).cloned().collect(),
            };

            match binding.target.invoke(&binding.member, &event).await {
                Ok(next) => value = next,
                Err(e) => {
                    warn!(
                        hook = %hook,
                        target = %binding.target.id(),
                        member = %binding.member,
                        error = %e,
                        "Filter handler failed, keeping previous value"
                    );
                }
            }
        }

        value
    }

    /// Fires every action subscribed to a hook.
    ///
    /// At most `accepted_args` arguments are forwarded. A failing action is
    /// logged; the remaining actions still run.
    pub async fn do_action(&self, hook: &str, args: &[Value]) {
        let bindings = self.bindings_for(hook, HookKind::Action).await;

        if bindings.is_empty() {
            return;
        }

        debug!(hook = %hook, count = bindings.len(), "Firing actions");

        for binding in bindings {
            let take = usize::try_from(binding.accepted_args).unwrap_or(0);
            let event = HookEvent {
                hook: hook.to_string(),
                value: Value::Null,
                args: args.iter().take(take).cloned().collect(),
            };

            if let Err(e) = binding.target.invoke(&binding.member, &event).await {
                warn!(
                    hook = %hook,
                    target = %binding.target.id(),
                    member = %binding.member,
                    error = %e,
                    "Action handler failed"
                );
            }
        }
    }

    /// Removes every subscription belonging to a target.
    pub async fn unregister_target(&self, target_id: &str) {
        let mut subscriptions = self.subscriptions.write().await;

        for entries in subscriptions.values_mut() {
            entries.retain(|s| s.binding.target.id() != target_id);
        }

        subscriptions.retain(|_, entries| !entries.is_empty());

        info!(target = %target_id, "All subscriptions removed for target");
    }

    /// Returns whether any subscription exists for a hook.
    pub async fn has_subscribers(&self, hook: &str) -> bool {
        let subscriptions = self.subscriptions.read().await;
        subscriptions
            .get(hook)
            .map(|entries| !entries.is_empty())
            .unwrap_or(false)
    }

    /// Returns the number of subscriptions for a hook.
    pub async fn subscription_count(&self, hook: &str) -> usize {
        let subscriptions = self.subscriptions.read().await;
        subscriptions.get(hook).map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns all hook names with at least one subscription.
    pub async fn hooks(&self) -> Vec<String> {
        let subscriptions = self.subscriptions.read().await;
        subscriptions.keys().cloned().collect()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HookBus for HookRegistry {
    async fn add_filter(&self, hook: &str, binding: HookBinding) {
        self.add(hook, binding, HookKind::Filter).await;
    }

    async fn add_action(&self, hook: &str, binding: HookBinding) {
        self.add(hook, binding, HookKind::Action).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use tinybit_core::error::AppError;
    use tinybit_core::result::AppResult;

    use super::*;

    /// Filter target that appends its tag to a string value and records
    /// how many extra arguments each invocation carried.
    struct Tagger {
        id: &'static str,
        tag: &'static str,
        seen_arg_counts: Mutex<Vec<usize>>,
    }

    impl Tagger {
        fn new(id: &'static str, tag: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                tag,
                seen_arg_counts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HookTarget for Tagger {
        fn id(&self) -> &str {
            self.id
        }

        fn has_member(&self, member: &str) -> bool {
            member == "filter_tag" || member == "action_tag"
        }

        async fn invoke(&self, member: &str, event: &HookEvent) -> AppResult<Value> {
            self.seen_arg_counts.lock().unwrap().push(event.args.len());
            match member {
                "filter_tag" => {
                    let text = event.value.as_str().unwrap_or_default();
                    Ok(json!(format!("{text}{}", self.tag)))
                }
                "action_tag" => Ok(Value::Null),
                other => Err(AppError::hook(format!("no member '{other}'"))),
            }
        }
    }

    fn binding(target: Arc<Tagger>, member: &str, priority: i64, accepted_args: i64) -> HookBinding {
        HookBinding {
            target,
            member: member.to_string(),
            priority,
            accepted_args,
        }
    }

    #[tokio::test]
    async fn test_filters_run_in_priority_then_registration_order() {
        let registry = HookRegistry::new();
        registry
            .add_filter("title", binding(Tagger::new("a", "+a"), "filter_tag", 20, 1))
            .await;
        registry
            .add_filter("title", binding(Tagger::new("b", "+b"), "filter_tag", 10, 1))
            .await;
        registry
            .add_filter("title", binding(Tagger::new("c", "+c"), "filter_tag", 10, 1))
            .await;

        let out = registry.apply_filters("title", json!("x"), &[]).await;

        assert_eq!(out, json!("x+b+c+a"));
    }

    #[tokio::test]
    async fn test_filter_extra_args_are_capped_by_accepted_count() {
        let registry = HookRegistry::new();
        let one = Tagger::new("one", "+1");
        let three = Tagger::new("three", "+3");
        registry
            .add_filter("meta", binding(one.clone(), "filter_tag", 10, 1))
            .await;
        registry
            .add_filter("meta", binding(three.clone(), "filter_tag", 10, 3))
            .await;

        let args = [json!(1), json!(2), json!(3), json!(4)];
        registry.apply_filters("meta", json!(""), &args).await;

        assert_eq!(*one.seen_arg_counts.lock().unwrap(), vec![0]);
        assert_eq!(*three.seen_arg_counts.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_action_args_are_capped_by_accepted_count() {
        let registry = HookRegistry::new();
        let target = Tagger::new("observer", "");
        registry
            .add_action("saved", binding(target.clone(), "action_tag", 10, 2))
            .await;

        registry.do_action("saved", &[json!(1), json!(2), json!(3)]).await;

        assert_eq!(*target.seen_arg_counts.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_failing_filter_keeps_previous_value() {
        let registry = HookRegistry::new();
        registry
            .add_filter("title", binding(Tagger::new("a", "+a"), "filter_tag", 10, 1))
            .await;
        registry
            .add_filter("title", binding(Tagger::new("boom", ""), "no_such", 20, 1))
            .await;
        registry
            .add_filter("title", binding(Tagger::new("b", "+b"), "filter_tag", 30, 1))
            .await;

        let out = registry.apply_filters("title", json!("x"), &[]).await;

        assert_eq!(out, json!("x+a+b"));
    }

    #[tokio::test]
    async fn test_unknown_hook_returns_value_unchanged() {
        let registry = HookRegistry::new();

        let out = registry.apply_filters("nothing", json!(42), &[]).await;

        assert_eq!(out, json!(42));
    }

    #[tokio::test]
    async fn test_paths_are_independent_per_hook() {
        let registry = HookRegistry::new();
        let target = Tagger::new("dual", "+d");
        registry
            .add_filter("mixed", binding(target.clone(), "filter_tag", 10, 1))
            .await;
        registry
            .add_action("mixed", binding(target.clone(), "action_tag", 10, 1))
            .await;

        let out = registry.apply_filters("mixed", json!(""), &[]).await;

        // Only the filter subscription ran on the filter path.
        assert_eq!(out, json!("+d"));
        assert_eq!(registry.subscription_count("mixed").await, 2);
    }

    #[tokio::test]
    async fn test_unregister_target_removes_its_subscriptions() {
        let registry = HookRegistry::new();
        registry
            .add_filter("title", binding(Tagger::new("a", "+a"), "filter_tag", 10, 1))
            .await;
        registry
            .add_filter("title", binding(Tagger::new("b", "+b"), "filter_tag", 10, 1))
            .await;

        registry.unregister_target("a").await;

        assert_eq!(registry.subscription_count("title").await, 1);
        let out = registry.apply_filters("title", json!(""), &[]).await;
        assert_eq!(out, json!("+b"));
    }

    #[tokio::test]
    async fn test_inspection_reports_registered_hooks() {
        let registry = HookRegistry::new();
        assert!(!registry.has_subscribers("title").await);

        registry
            .add_filter("title", binding(Tagger::new("a", "+a"), "filter_tag", 10, 1))
            .await;

        assert!(registry.has_subscribers("title").await);
        assert_eq!(registry.hooks().await, vec!["title".to_string()]);
    }
}
