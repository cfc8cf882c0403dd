//! Role-based access policy.
//!
//! Pure decision functions, no IO. Two layers exist and both must pass:
//!
//! - [`has_permission`]: type-level gate, can this principal even attempt the
//!   action against the resource type (gates list/create)?
//! - [`has_object_permission`]: instance-level gate against a concrete
//!   resource and its owner (gates retrieve/update/delete by id).
//!
//! [`scope`] is the third, list-time concern: it narrows a collection query
//! to what the principal may see. Anything admitted by `scope` must pass the
//! instance-level read check for the same principal; `policy_tests` below
//! pins that property.
//!
//! An unauthenticated actor (`None`) is denied everything before the role is
//! even inspected.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Role of an authenticated user. Closed set; unknown database values are a
/// validation failure, never a silent fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Visitor,
    Guide,
    Admin,
}

impl Role {
    /// Returns the canonical role string used by the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Guide => "guide",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "visitor" => Ok(Self::Visitor),
            "guide" => Ok(Self::Guide),
            "admin" => Ok(Self::Admin),
            other => Err(EngineError::Validation(format!("invalid role: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Safe actions never mutate; they map to the read-only branch of every
    /// policy clause.
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Read)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Trip,
    Location,
    Expense,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trip => "trip",
            Self::Location => "location",
            Self::Expense => "expense",
        }
    }
}

/// The authenticated actor behind a request: identity plus role.
///
/// Construction is decoupled from transport; the server resolves credentials
/// into a `Principal` once and the engine never parses credentials itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

/// Visibility of a collection for a principal at list time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListScope {
    /// The unfiltered set.
    All,
    /// Only records owned by the principal (for expenses: records on trips
    /// the principal owns).
    Owner,
    /// The empty set.
    Nothing,
}

/// Type-level gate: may this actor attempt `action` against `kind` at all,
/// independent of which instance?
pub fn has_permission(actor: Option<&Principal>, action: Action, kind: ResourceKind) -> bool {
    let Some(principal) = actor else {
        return false;
    };
    match (principal.role, kind) {
        (Role::Admin, _) | (Role::Guide, _) => true,
        (Role::Visitor, ResourceKind::Expense) => false,
        (Role::Visitor, _) => action.is_safe(),
    }
}

/// Instance-level gate against a concrete resource owned by `owner_id`.
///
/// Clauses evaluate short-circuit in fixed priority: anonymous deny, then
/// admin, then the safe-action clause, then the owner check. The order
/// matters: a guide who is not the owner must still pass reads through the
/// safe-action clause.
pub fn has_object_permission(
    actor: Option<&Principal>,
    action: Action,
    kind: ResourceKind,
    owner_id: &str,
) -> bool {
    let Some(principal) = actor else {
        return false;
    };
    match principal.role {
        Role::Admin => true,
        Role::Guide => action.is_safe() || principal.user_id == owner_id,
        Role::Visitor => match kind {
            ResourceKind::Expense => false,
            ResourceKind::Trip | ResourceKind::Location => action.is_safe(),
        },
    }
}

/// Resolves which user id counts as the owner of an expense for `role`.
///
/// Guides are keyed by the owning trip's user; everyone else by the
/// expense's own `user` field (latest-revision policy, kept as-is).
pub fn expense_owner_id<'a>(role: Role, expense_user_id: &'a str, trip_owner_id: &'a str) -> &'a str {
    match role {
        Role::Guide => trip_owner_id,
        Role::Visitor | Role::Admin => expense_user_id,
    }
}

/// List-time narrowing for collection queries. Never used for fetch-by-id,
/// which goes through [`has_object_permission`].
pub fn scope(actor: Option<&Principal>, kind: ResourceKind) -> ListScope {
    let Some(principal) = actor else {
        return ListScope::Nothing;
    };
    match (principal.role, kind) {
        (Role::Admin, _) => ListScope::All,
        (Role::Guide, _) => ListScope::Owner,
        (Role::Visitor, ResourceKind::Expense) => ListScope::Nothing,
        (Role::Visitor, ResourceKind::Trip | ResourceKind::Location) => ListScope::All,
    }
}
