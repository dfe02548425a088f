//! Hook registrar: parses a target's declarations and subscribes them.

use std::sync::Arc;

use tracing::{info, warn};

use tinybit_core::result::AppResult;

use crate::definitions::{HookKind, HookSpec, ResolvedHook};
use crate::parser::HookParser;
use crate::registry::{HookBinding, HookBus};
use crate::target::HookTarget;

/// Drives registration: parse declarations, then subscribe each resolved
/// record on the matching bus path.
///
/// Records whose member could not be resolved are skipped (with a warning);
/// records without a classified kind go to the filter path, also with a
/// warning.
pub struct HookRegistrar {
    /// Declaration parser.
    parser: HookParser,
    /// Subscription sink.
    bus: Arc<dyn HookBus>,
}

impl HookRegistrar {
    /// Creates a registrar with the default parser.
    pub fn new(bus: Arc<dyn HookBus>) -> Self {
        Self::with_parser(HookParser::new(), bus)
    }

    /// Creates a registrar with a custom parser.
    pub fn with_parser(parser: HookParser, bus: Arc<dyn HookBus>) -> Self {
        Self { parser, bus }
    }

    /// Parses and registers every declaration of one target.
    ///
    /// Returns the parsed records in declaration order, including the ones
    /// that were skipped for lack of a member. A malformed declaration
    /// fails the whole batch and registers nothing.
    pub async fn register_all(
        &self,
        target: Arc<dyn HookTarget>,
        specs: &[HookSpec],
    ) -> AppResult<Vec<ResolvedHook>> {
        let records = self.parser.parse(target.as_ref(), specs)?;

        let mut registered = 0usize;
        for record in &records {
            let Some(member) = record.member.clone() else {
                warn!(
                    hook = %record.hook,
                    target = %record.target,
                    "No member resolved for hook, skipping registration"
                );
                continue;
            };

            let binding = HookBinding {
                target: Arc::clone(&target),
                member,
                priority: record.priority,
                accepted_args: record.accepted_args,
            };

            match record.kind {
                Some(HookKind::Action) => self.bus.add_action(&record.hook, binding).await,
                Some(HookKind::Filter) => self.bus.add_filter(&record.hook, binding).await,
                None => {
                    warn!(
                        hook = %record.hook,
                        target = %record.target,
                        member = %binding.member,
                        "Member matches no naming convention, registering as filter"
                    );
                    self.bus.add_filter(&record.hook, binding).await;
                }
            }
            registered += 1;
        }

        info!(
            target = %target.id(),
            declared = records.len(),
            registered = registered,
            "Hook declarations registered"
        );

        Ok(records)
    }
}
