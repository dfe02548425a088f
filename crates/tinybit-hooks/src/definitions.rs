//! Hook declaration and dispatch types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Priority assigned to a subscription when the declaration omits one.
pub const DEFAULT_PRIORITY: i64 = 10;

/// Argument count assigned to a subscription when the declaration omits one.
pub const DEFAULT_ACCEPTED_ARGS: i64 = 1;

/// A single element of a positional hook declaration.
///
/// Declarations mix text (hook and member names) and integers (priority,
/// argument count) in one array, so atoms deserialize untagged from plain
/// JSON/TOML arrays like `["the_content", "filter_the_content_early", 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecAtom {
    /// An integer element (priority or argument count).
    Int(i64),
    /// A text element (hook or member name).
    Text(String),
}

impl From<i64> for SpecAtom {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for SpecAtom {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SpecAtom {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A positional hook declaration, one to four atoms long.
///
/// The positions mean: hook name, member name (optional), priority
/// (optional), accepted argument count (optional). Atoms past the fourth
/// position are ignored by the parser. The builder methods push atoms in
/// order, so they must be called in declaration order:
///
/// ```
/// use tinybit_hooks::HookSpec;
///
/// let spec = HookSpec::new("the_content")
///     .member("filter_the_content_early")
///     .priority(1);
/// assert_eq!(spec.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookSpec(Vec<SpecAtom>);

impl HookSpec {
    /// Creates a declaration holding only the hook name.
    pub fn new(hook: impl Into<String>) -> Self {
        Self(vec![SpecAtom::Text(hook.into())])
    }

    /// Creates a declaration from raw atoms.
    pub fn from_atoms(atoms: Vec<SpecAtom>) -> Self {
        Self(atoms)
    }

    /// Appends a member name atom.
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.0.push(SpecAtom::Text(member.into()));
        self
    }

    /// Appends a priority atom.
    pub fn priority(mut self, priority: i64) -> Self {
        self.0.push(SpecAtom::Int(priority));
        self
    }

    /// Appends an accepted-argument-count atom.
    pub fn accepted_args(mut self, accepted_args: i64) -> Self {
        self.0.push(SpecAtom::Int(accepted_args));
        self
    }

    /// Returns the atoms in declaration order.
    pub fn atoms(&self) -> &[SpecAtom] {
        &self.0
    }

    /// Returns the number of atoms.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the declaration has no atoms.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The two kinds of host hook a member can subscribe to.
///
/// Filters transform a value and must return one; actions observe an event
/// and return nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// A value-transforming hook.
    Filter,
    /// A notification-only hook.
    Action,
}

impl HookKind {
    /// Returns the string name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Action => "action",
        }
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully parsed hook declaration.
///
/// `kind` is `None` when the member name matches no naming convention;
/// such records are still registered, on the filter path. `member` is
/// `None` when the declaration omitted it and the capability probe found
/// no conventional member on the target; such records are not registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedHook {
    /// The classified kind, if the member followed a convention.
    pub kind: Option<HookKind>,
    /// The host hook name to subscribe to.
    pub hook: String,
    /// Identifier of the target that declared this hook.
    pub target: String,
    /// The member to invoke, if one was named or probed successfully.
    pub member: Option<String>,
    /// Subscription priority (lower runs first).
    pub priority: i64,
    /// Number of arguments the member accepts.
    pub accepted_args: i64,
}

impl ResolvedHook {
    /// Returns whether a member was resolved for this declaration.
    pub fn is_resolved(&self) -> bool {
        self.member.is_some()
    }
}

/// Payload passed to a hook member on dispatch.
///
/// For filters, `value` carries the value under filtration and `args` any
/// extra arguments the hook supplies. For actions, `value` is `Null` and
/// `args` carries the event arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookEvent {
    /// The hook name being fired.
    pub hook: String,
    /// The value under filtration (`Null` for actions).
    pub value: Value,
    /// Extra hook arguments, already truncated to the accepted count.
    pub args: Vec<Value>,
}

impl HookEvent {
    /// Creates a new event.
    pub fn new(hook: impl Into<String>, value: Value) -> Self {
        Self {
            hook: hook.into(),
            value,
            args: Vec::new(),
        }
    }

    /// Appends an extra argument.
    pub fn with_arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }

    /// Gets an extra argument by position.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_deserializes_from_plain_json_array() {
        let spec: HookSpec =
            serde_json::from_str(r#"["the_content", "filter_the_content_early", 1]"#).unwrap();

        assert_eq!(
            spec.atoms(),
            &[
                SpecAtom::Text("the_content".to_string()),
                SpecAtom::Text("filter_the_content_early".to_string()),
                SpecAtom::Int(1),
            ]
        );
    }

    #[test]
    fn test_spec_serializes_back_to_plain_json_array() {
        let spec = HookSpec::new("generate_attachment_metadata")
            .priority(10)
            .accepted_args(2);

        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"["generate_attachment_metadata",10,2]"#);
    }

    #[test]
    fn test_builder_pushes_atoms_in_declaration_order() {
        let spec = HookSpec::new("init").member("action_init").priority(20);

        assert_eq!(spec.len(), 3);
        assert_eq!(spec.atoms()[2], SpecAtom::Int(20));
    }

    #[test]
    fn test_kind_round_trips_through_snake_case() {
        let json = serde_json::to_string(&HookKind::Filter).unwrap();
        assert_eq!(json, r#""filter""#);

        let kind: HookKind = serde_json::from_str(r#""action""#).unwrap();
        assert_eq!(kind, HookKind::Action);
    }
}
