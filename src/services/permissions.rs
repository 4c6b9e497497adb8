//! Permission evaluation
//!
//! Pure functions deciding whether an actor may move, edit or delete an
//! event. Every decision carries a user-facing reason naming the rule that
//! applied; the reason is returned verbatim in Forbidden errors.

use serde::{Deserialize, Serialize};

use crate::models::{Event, EventStatus, Role, User};
use crate::state::transitions::{rule_for, TransitionRule};
use crate::utils::errors::{PromoFlowError, Result};
use crate::utils::helpers::human_list;

/// Outcome of a permission check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDecision {
    pub allowed: bool,
    pub reason: String,
}

impl PermissionDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: reason.into(),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }

    /// `Forbidden` carrying the reason when denied
    pub fn into_result(self) -> Result<()> {
        if self.allowed {
            Ok(())
        } else {
            Err(PromoFlowError::Forbidden(self.reason))
        }
    }
}

/// Whether `actor` may move `event` to `to`.
///
/// Gate 1: the edge must exist and list the actor's role (admin always
/// passes). Gate 2: leaving `draft` or `rejected` additionally requires the
/// actor to be the organizer or an admin, even when gate 1 passed.
/// Neither gate looks at branches; branch scope only limits editing and
/// deleting.
pub fn can_transition(actor: &User, event: &Event, to: EventStatus) -> PermissionDecision {
    let Some(rule) = rule_for(event.status, to) else {
        return PermissionDecision::deny("Invalid status transition");
    };

    if !rule.permits_role(actor.role) {
        return PermissionDecision::deny(role_gate_reason(&rule));
    }

    if rule.requires_creator() && !actor.is_admin() && !event.is_organizer(actor.id) {
        return PermissionDecision::deny(format!(
            "Only the event creator or an admin can change the status of a {} event",
            event.status
        ));
    }

    PermissionDecision::allow(rule.rationale)
}

fn role_gate_reason(rule: &TransitionRule) -> String {
    let roles: Vec<&str> = rule.allowed_roles.iter().map(Role::as_str).collect();
    format!(
        "Only {} can move an event from {} to {}",
        human_list(&roles),
        rule.from,
        rule.to
    )
}

/// Whether `actor` may modify the fields of `event`
pub fn can_edit(actor: &User, event: &Event) -> PermissionDecision {
    use EventStatus::*;

    match actor.role {
        Role::Admin => PermissionDecision::allow("Admins can edit any event"),
        Role::SalesManager => {
            if !event.is_organizer(actor.id) {
                PermissionDecision::deny("Sales managers can only edit events they created")
            } else if matches!(event.status, Draft | Rejected | PendingGm) {
                PermissionDecision::allow("Creator can edit the event until GM approval")
            } else {
                PermissionDecision::deny("Sales managers cannot edit an event once the general manager has approved it")
            }
        }
        Role::GeneralManager => {
            if !actor.covers_branch(event.branch_id) {
                PermissionDecision::deny("General managers can only edit events from their own branch")
            } else if matches!(event.status, Draft | PendingGm) {
                PermissionDecision::allow("General manager can edit branch events awaiting GM review")
            } else {
                PermissionDecision::deny("General managers can only edit events in draft or pending_gm status")
            }
        }
        Role::MarketingHead => {
            if event.status == PendingMarketing {
                PermissionDecision::allow("Marketing head can edit events under marketing review")
            } else {
                PermissionDecision::deny("Marketing head can only edit events in pending_marketing status")
            }
        }
        Role::MarketingManager => {
            if matches!(event.status, Approved | Completed) {
                PermissionDecision::allow("Marketing managers can edit metrics of approved events")
            } else {
                PermissionDecision::deny("Marketing managers can only edit approved or completed events")
            }
        }
        role => PermissionDecision::deny(format!("Role {} is not permitted to edit events", role)),
    }
}

/// Whether `actor` may delete `event`. Stricter than editing: nothing is
/// deletable once approved.
pub fn can_delete(actor: &User, event: &Event) -> PermissionDecision {
    use EventStatus::*;

    if matches!(event.status, Approved | Completed) {
        return PermissionDecision::deny(format!("Events cannot be deleted once {}", event.status));
    }

    match actor.role {
        Role::Admin => PermissionDecision::allow("Admins can delete events that are not yet approved"),
        Role::SalesManager => {
            if !event.is_organizer(actor.id) {
                PermissionDecision::deny("Sales managers can only delete events they created")
            } else if matches!(event.status, Draft | Rejected) {
                PermissionDecision::allow("Creator can delete a draft or rejected event")
            } else {
                PermissionDecision::deny("Sales managers can only delete events in draft or rejected status")
            }
        }
        Role::GeneralManager => {
            if !actor.covers_branch(event.branch_id) {
                PermissionDecision::deny("General managers can only delete events from their own branch")
            } else if matches!(event.status, Draft | PendingGm | Rejected) {
                PermissionDecision::allow("General manager can delete branch events before marketing review")
            } else {
                PermissionDecision::deny("General managers can only delete events in draft, pending_gm or rejected status")
            }
        }
        Role::MarketingHead => {
            if event.status == PendingMarketing {
                PermissionDecision::allow("Marketing head can delete events under marketing review")
            } else {
                PermissionDecision::deny("Marketing head can only delete events in pending_marketing status")
            }
        }
        role => PermissionDecision::deny(format!("Role {} is not permitted to delete events", role)),
    }
}
