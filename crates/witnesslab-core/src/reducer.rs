//! Reducer abstraction.
//!
//! All run-state mutation goes through a single `apply` entry point that
//! takes a closed set of actions. Implementations must stay free of I/O;
//! persistence and telemetry observe transitions from the outside.

/// Trait that all actions implement.
pub trait Action: Send + Sync + std::fmt::Debug {
    /// The type name for this action (for logging/routing).
    fn action_type(&self) -> &'static str;
}

/// Trait for state that advances only by applying actions.
pub trait Reducer {
    /// The action type this state consumes.
    type Action: Action;

    /// Apply an action to mutate state.
    fn apply(&mut self, action: &Self::Action);
}
