//! Hook declaration parser.
//!
//! A declaration is a positional array of one to four atoms:
//!
//! 1. hook name (text, required)
//! 2. member name (text; skipped entirely when the next atom is an integer)
//! 3. priority (integer, default 10)
//! 4. accepted argument count (integer, default 1)
//!
//! When no member is named, the parser asks the naming convention for the
//! filter-shaped candidate first and the action-shaped candidate second,
//! and probes the target for each. Parsing only ever calls `id` and
//! `has_member` on the target, so it is pure: the same target shape and
//! declarations always produce the same records, in declaration order.

use std::sync::Arc;

use tinybit_core::error::AppError;
use tinybit_core::result::AppResult;

use crate::convention::{NamingConvention, PrefixConvention};
use crate::definitions::{
    DEFAULT_ACCEPTED_ARGS, DEFAULT_PRIORITY, HookKind, HookSpec, ResolvedHook, SpecAtom,
};
use crate::target::HookTarget;

/// Parses positional hook declarations into [`ResolvedHook`] records.
#[derive(Clone)]
pub struct HookParser {
    /// Naming rule used for classification and probing.
    convention: Arc<dyn NamingConvention>,
}

impl HookParser {
    /// Creates a parser using the default prefix convention.
    pub fn new() -> Self {
        Self::with_convention(Arc::new(PrefixConvention))
    }

    /// Creates a parser using a custom naming convention.
    pub fn with_convention(convention: Arc<dyn NamingConvention>) -> Self {
        Self { convention }
    }

    /// Parses a batch of declarations against one target.
    ///
    /// Records come back in declaration order. A malformed declaration
    /// fails the whole batch; a declaration whose member cannot be
    /// resolved does not (its record simply carries no member).
    pub fn parse(&self, target: &dyn HookTarget, specs: &[HookSpec]) -> AppResult<Vec<ResolvedHook>> {
        specs
            .iter()
            .map(|spec| self.parse_spec(target, spec))
            .collect()
    }

    /// Parses a single declaration against one target.
    pub fn parse_spec(&self, target: &dyn HookTarget, spec: &HookSpec) -> AppResult<ResolvedHook> {
        let mut atoms = spec.atoms().iter().peekable();

        let hook = match atoms.next() {
            Some(SpecAtom::Text(hook)) => hook.clone(),
            Some(SpecAtom::Int(n)) => {
                return Err(AppError::malformed_spec(format!(
                    "hook name must be text, got integer {n} (target '{}')",
                    target.id()
                )));
            }
            None => {
                return Err(AppError::malformed_spec(format!(
                    "empty hook declaration (target '{}')",
                    target.id()
                )));
            }
        };

        // The member slot only exists when the next atom is text. An
        // integer here is already the priority.
        let named_member = match atoms.peek() {
            Some(SpecAtom::Text(member)) => {
                let member = member.clone();
                atoms.next();
                Some(member)
            }
            _ => None,
        };

        let priority = match atoms.next() {
            Some(SpecAtom::Int(priority)) => *priority,
            Some(SpecAtom::Text(text)) => {
                return Err(AppError::malformed_spec(format!(
                    "priority for hook '{hook}' must be an integer, got '{text}'"
                )));
            }
            None => DEFAULT_PRIORITY,
        };

        let accepted_args = match atoms.next() {
            Some(SpecAtom::Int(accepted_args)) => *accepted_args,
            Some(SpecAtom::Text(text)) => {
                return Err(AppError::malformed_spec(format!(
                    "argument count for hook '{hook}' must be an integer, got '{text}'"
                )));
            }
            None => DEFAULT_ACCEPTED_ARGS,
        };

        // Atoms past the fourth position carry no meaning and are ignored.

        let (kind, member) = match named_member {
            Some(member) => (self.convention.kind_of(&member), Some(member)),
            None => self.probe_member(target, &hook),
        };

        Ok(ResolvedHook {
            kind,
            hook,
            target: target.id().to_string(),
            member,
            priority,
            accepted_args,
        })
    }

    /// Probes the target for a conventional member name, filter first.
    fn probe_member(
        &self,
        target: &dyn HookTarget,
        hook: &str,
    ) -> (Option<HookKind>, Option<String>) {
        for kind in [HookKind::Filter, HookKind::Action] {
            let candidate = self.convention.member_for(kind, hook);
            if target.has_member(&candidate) {
                return (Some(kind), Some(candidate));
            }
        }
        (None, None)
    }
}

impl Default for HookParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::Value;

    use tinybit_core::error::ErrorKind;

    use super::*;
    use crate::definitions::HookEvent;

    /// Inert target with a fixed member list, enough for probing.
    struct Probe {
        id: &'static str,
        members: &'static [&'static str],
    }

    #[async_trait]
    impl HookTarget for Probe {
        fn id(&self) -> &str {
            self.id
        }

        fn has_member(&self, member: &str) -> bool {
            self.members.contains(&member)
        }

        async fn invoke(&self, member: &str, _event: &HookEvent) -> AppResult<Value> {
            Err(AppError::hook(format!(
                "target '{}' has no member '{member}'",
                self.id
            )))
        }
    }

    fn parse_one(target: &Probe, spec: HookSpec) -> ResolvedHook {
        HookParser::new().parse_spec(target, &spec).unwrap()
    }

    #[test]
    fn test_name_only_spec_probes_filter_member_and_applies_defaults() {
        let target = Probe {
            id: "cloudflare",
            members: &["filter_cloudflare_purge_by_url"],
        };

        let record = parse_one(&target, HookSpec::new("cloudflare_purge_by_url"));

        assert_eq!(record.kind, Some(HookKind::Filter));
        assert_eq!(record.hook, "cloudflare_purge_by_url");
        assert_eq!(record.target, "cloudflare");
        assert_eq!(
            record.member.as_deref(),
            Some("filter_cloudflare_purge_by_url")
        );
        assert_eq!(record.priority, DEFAULT_PRIORITY);
        assert_eq!(record.accepted_args, DEFAULT_ACCEPTED_ARGS);
    }

    #[test]
    fn test_explicit_member_and_priority_are_honored() {
        let target = Probe {
            id: "frontend",
            members: &["filter_the_content_early"],
        };

        let record = parse_one(
            &target,
            HookSpec::new("the_content")
                .member("filter_the_content_early")
                .priority(1),
        );

        assert_eq!(record.kind, Some(HookKind::Filter));
        assert_eq!(record.member.as_deref(), Some("filter_the_content_early"));
        assert_eq!(record.priority, 1);
        assert_eq!(record.accepted_args, DEFAULT_ACCEPTED_ARGS);
    }

    #[test]
    fn test_integer_after_hook_name_skips_the_member_slot() {
        let target = Probe {
            id: "media",
            members: &["filter_generate_attachment_metadata"],
        };

        let record = parse_one(
            &target,
            HookSpec::new("generate_attachment_metadata")
                .priority(10)
                .accepted_args(2),
        );

        assert_eq!(record.kind, Some(HookKind::Filter));
        assert_eq!(
            record.member.as_deref(),
            Some("filter_generate_attachment_metadata")
        );
        assert_eq!(record.priority, 10);
        assert_eq!(record.accepted_args, 2);
    }

    #[test]
    fn test_action_prefix_classifies_as_action() {
        let target = Probe {
            id: "widget",
            members: &["action_widget_init"],
        };

        let record = parse_one(&target, HookSpec::new("widget_init").member("action_widget_init"));

        assert_eq!(record.kind, Some(HookKind::Action));
    }

    #[test]
    fn test_classification_is_ascii_case_insensitive() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let filter = parse_one(&target, HookSpec::new("a").member("Filter_a"));
        let action = parse_one(&target, HookSpec::new("b").member("ACTION_b"));

        assert_eq!(filter.kind, Some(HookKind::Filter));
        assert_eq!(action.kind, Some(HookKind::Action));
    }

    #[test]
    fn test_unconventional_member_keeps_member_but_no_kind() {
        let target = Probe {
            id: "widget",
            members: &["normalize_title"],
        };

        let record = parse_one(&target, HookSpec::new("the_title").member("normalize_title"));

        assert_eq!(record.kind, None);
        assert_eq!(record.member.as_deref(), Some("normalize_title"));
    }

    #[test]
    fn test_explicit_member_is_not_probed_for_existence() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let record = parse_one(&target, HookSpec::new("the_title").member("filter_the_title"));

        // Naming a member is taken at face value; only omitted members probe.
        assert_eq!(record.kind, Some(HookKind::Filter));
        assert_eq!(record.member.as_deref(), Some("filter_the_title"));
    }

    #[test]
    fn test_probe_prefers_filter_over_action() {
        let target = Probe {
            id: "widget",
            members: &["filter_setup", "action_setup"],
        };

        let record = parse_one(&target, HookSpec::new("setup"));

        assert_eq!(record.kind, Some(HookKind::Filter));
        assert_eq!(record.member.as_deref(), Some("filter_setup"));
    }

    #[test]
    fn test_probe_falls_back_to_action_member() {
        let target = Probe {
            id: "widget",
            members: &["action_setup"],
        };

        let record = parse_one(&target, HookSpec::new("setup"));

        assert_eq!(record.kind, Some(HookKind::Action));
        assert_eq!(record.member.as_deref(), Some("action_setup"));
    }

    #[test]
    fn test_failed_probe_yields_record_without_member() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let record = parse_one(&target, HookSpec::new("setup").priority(30));

        assert_eq!(record.kind, None);
        assert_eq!(record.member, None);
        assert_eq!(record.priority, 30);
    }

    #[test]
    fn test_empty_declaration_is_malformed() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let err = HookParser::new()
            .parse_spec(&target, &HookSpec::from_atoms(Vec::new()))
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::MalformedSpec);
    }

    #[test]
    fn test_integer_hook_name_is_malformed() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let err = HookParser::new()
            .parse_spec(&target, &HookSpec::from_atoms(vec![SpecAtom::Int(10)]))
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::MalformedSpec);
    }

    #[test]
    fn test_text_in_priority_slot_is_malformed() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let spec = HookSpec::new("setup").member("filter_setup").member("oops");
        let err = HookParser::new().parse_spec(&target, &spec).unwrap_err();

        assert_eq!(err.kind, ErrorKind::MalformedSpec);
    }

    #[test]
    fn test_text_in_argument_count_slot_is_malformed() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let spec = HookSpec::from_atoms(vec![
            SpecAtom::from("setup"),
            SpecAtom::from(10),
            SpecAtom::from("oops"),
        ]);
        let err = HookParser::new().parse_spec(&target, &spec).unwrap_err();

        assert_eq!(err.kind, ErrorKind::MalformedSpec);
    }

    #[test]
    fn test_atoms_past_the_fourth_are_ignored() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let spec = HookSpec::new("setup")
            .member("filter_setup")
            .priority(5)
            .accepted_args(3)
            .priority(99)
            .member("ignored");
        let record = parse_one(&target, spec);

        assert_eq!(record.priority, 5);
        assert_eq!(record.accepted_args, 3);
    }

    #[test]
    fn test_batch_preserves_declaration_order() {
        let target = Probe {
            id: "widget",
            members: &["filter_b"],
        };

        let specs = vec![
            HookSpec::new("a").member("filter_a"),
            HookSpec::new("b"),
            HookSpec::new("c").member("action_c").priority(2),
        ];
        let records = HookParser::new().parse(&target, &specs).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].hook, "a");
        assert_eq!(records[1].hook, "b");
        assert_eq!(records[2].hook, "c");
    }

    #[test]
    fn test_one_malformed_declaration_fails_the_whole_batch() {
        let target = Probe {
            id: "widget",
            members: &[],
        };

        let specs = vec![
            HookSpec::new("a").member("filter_a"),
            HookSpec::from_atoms(Vec::new()),
        ];
        let err = HookParser::new().parse(&target, &specs).unwrap_err();

        assert_eq!(err.kind, ErrorKind::MalformedSpec);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let target = Probe {
            id: "widget",
            members: &["filter_setup"],
        };

        let specs = vec![HookSpec::new("setup"), HookSpec::new("other").priority(4)];
        let parser = HookParser::new();

        let first = parser.parse(&target, &specs).unwrap();
        let second = parser.parse(&target, &specs).unwrap();

        assert_eq!(first, second);
    }
}
