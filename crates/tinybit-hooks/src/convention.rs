//! Member naming conventions.
//!
//! A convention ties member names to hook kinds in both directions: it
//! classifies an explicit member name, and it produces the candidate
//! member name the parser probes for when a declaration names no member.

use crate::definitions::HookKind;

/// Member prefix that marks a filter under the default convention.
pub const FILTER_PREFIX: &str = "filter_";

/// Member prefix that marks an action under the default convention.
pub const ACTION_PREFIX: &str = "action_";

/// A naming rule linking member names to hook kinds.
pub trait NamingConvention: Send + Sync {
    /// Classifies a member name. Returns `None` when the name matches
    /// neither kind.
    fn kind_of(&self, member: &str) -> Option<HookKind>;

    /// Returns the conventional member name for a kind and hook.
    fn member_for(&self, kind: HookKind, hook: &str) -> String;
}

/// The default convention: members are named `filter_<hook>` or
/// `action_<hook>`. Classification is ASCII case-insensitive, so
/// `Filter_the_content` still counts as a filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixConvention;

impl NamingConvention for PrefixConvention {
    fn kind_of(&self, member: &str) -> Option<HookKind> {
        if starts_with_ignore_ascii_case(member, FILTER_PREFIX) {
            Some(HookKind::Filter)
        } else if starts_with_ignore_ascii_case(member, ACTION_PREFIX) {
            Some(HookKind::Action)
        } else {
            None
        }
    }

    fn member_for(&self, kind: HookKind, hook: &str) -> String {
        match kind {
            HookKind::Filter => format!("{FILTER_PREFIX}{hook}"),
            HookKind::Action => format!("{ACTION_PREFIX}{hook}"),
        }
    }
}

fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
