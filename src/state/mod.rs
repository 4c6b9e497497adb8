//! State management module
//!
//! This module holds the event lifecycle graph

pub mod transitions;

// Re-export commonly used state components
pub use transitions::{all_rules, is_terminal, next_statuses, rule_for, transition_key, TransitionRule};
