//! Event status transition table
//!
//! This module defines every legal `(from, to)` status edge of the event
//! approval lifecycle together with the roles that may take it. Any pair not
//! listed here is an invalid transition, for every role including admin.

use std::fmt;

use serde::Serialize;

use crate::models::{EventStatus, Role};

/// One legal edge of the lifecycle graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRule {
    /// Source status
    pub from: EventStatus,
    /// Target status
    pub to: EventStatus,
    /// Roles allowed to take the edge. Admin is always listed.
    pub allowed_roles: &'static [Role],
    /// Human-readable purpose of the edge
    pub rationale: &'static str,
}

impl TransitionRule {
    /// Table key in `"<from>-><to>"` form
    pub fn key(&self) -> String {
        transition_key(self.from, self.to)
    }

    /// Role membership; admin is implicitly allowed on every edge
    pub fn permits_role(&self, role: Role) -> bool {
        role == Role::Admin || self.allowed_roles.contains(&role)
    }

    /// Whether the creator restriction applies to this edge
    pub fn requires_creator(&self) -> bool {
        matches!(self.from, EventStatus::Draft | EventStatus::Rejected)
    }
}

impl fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key(), self.rationale)
    }
}

pub fn transition_key(from: EventStatus, to: EventStatus) -> String {
    format!("{}->{}", from, to)
}

const SUBMITTERS: &[Role] = &[Role::SalesManager, Role::Admin];
const GM_REVIEWERS: &[Role] = &[Role::GeneralManager, Role::Admin];
const MARKETING_REVIEWERS: &[Role] = &[Role::MarketingHead, Role::Admin];
const COMPLETERS: &[Role] = &[
    Role::SalesManager,
    Role::GeneralManager,
    Role::MarketingHead,
    Role::MarketingManager,
    Role::Admin,
];
const REVISERS: &[Role] = &[Role::SalesManager, Role::GeneralManager, Role::Admin];

/// Look up the edge for `(from, to)`, if one exists
pub fn rule_for(from: EventStatus, to: EventStatus) -> Option<TransitionRule> {
    use EventStatus::*;

    let (allowed_roles, rationale) = match (from, to) {
        (Draft, PendingGm) => (SUBMITTERS, "Sales manager submits a draft for GM review"),
        (Draft, PendingMarketing) => (GM_REVIEWERS, "General manager submits their own draft straight to marketing"),
        (PendingGm, PendingMarketing) => (GM_REVIEWERS, "General manager approves and forwards to marketing"),
        (PendingGm, Rejected) => (GM_REVIEWERS, "General manager rejects the event"),
        (PendingGm, Draft) => (GM_REVIEWERS, "General manager returns the event for changes"),
        (PendingMarketing, Approved) => (MARKETING_REVIEWERS, "Marketing head gives final approval"),
        (PendingMarketing, Rejected) => (MARKETING_REVIEWERS, "Marketing head rejects the event"),
        (PendingMarketing, PendingGm) => (MARKETING_REVIEWERS, "Marketing head sends the event back to the general manager"),
        (Approved, Completed) => (COMPLETERS, "Event ran and its actual results are recorded"),
        (Rejected, Draft) => (REVISERS, "Creator reopens a rejected event for revision"),
        _ => return None,
    };

    Some(TransitionRule {
        from,
        to,
        allowed_roles,
        rationale,
    })
}

/// Every legal edge, grouped by source status
pub fn all_rules() -> Vec<TransitionRule> {
    EventStatus::ALL
        .into_iter()
        .flat_map(|from| EventStatus::ALL.into_iter().filter_map(move |to| rule_for(from, to)))
        .collect()
}

/// Statuses reachable from `from` in one step
pub fn next_statuses(from: EventStatus) -> Vec<EventStatus> {
    EventStatus::ALL
        .into_iter()
        .filter(|to| rule_for(from, *to).is_some())
        .collect()
}

/// Statuses with no outgoing edge
pub fn is_terminal(status: EventStatus) -> bool {
    next_statuses(status).is_empty()
}
