//! Bladeburner action start gate.
//!
//! Decides whether an action can be started from the action list, and starts
//! it. The gate mirrors what disables the Start button in game:
//! - no remaining count (contracts and operations are consumable)
//! - a Raid in a city with no known communities
//! - a black operation above the player's rank

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ActionError;

/// Name of the operation that needs communities to target.
pub const RAID: &str = "Raid";

/// Category of a Bladeburner action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Always available; never runs out.
    General,
    /// Consumable bounty work.
    Contract,
    /// Consumable field operation.
    Operation,
    /// One-shot story operation gated on rank.
    BlackOperation,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::Contract => write!(f, "contract"),
            Self::Operation => write!(f, "operation"),
            Self::BlackOperation => write!(f, "black_operation"),
        }
    }
}

/// Identifies an action by kind and name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionRef {
    /// Action category.
    pub kind: ActionKind,
    /// Action name, unique within its kind.
    pub name: String,
}

impl ActionRef {
    /// Creates a reference.
    pub fn new(kind: ActionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// An action the player can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Display name.
    pub name: String,
    /// Action category.
    pub kind: ActionKind,
    /// Remaining times this action can be performed.
    pub count: f64,
    /// Minimum rank; only enforced for black operations.
    #[serde(default)]
    pub required_rank: f64,
}

impl Action {
    /// A general action. These never run out.
    pub fn general(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ActionKind::General,
            count: f64::MAX,
            required_rank: 0.0,
        }
    }

    /// A contract with `count` remaining.
    pub fn contract(name: impl Into<String>, count: f64) -> Self {
        Self {
            name: name.into(),
            kind: ActionKind::Contract,
            count,
            required_rank: 0.0,
        }
    }

    /// An operation with `count` remaining.
    pub fn operation(name: impl Into<String>, count: f64) -> Self {
        Self {
            name: name.into(),
            kind: ActionKind::Operation,
            count,
            required_rank: 0.0,
        }
    }

    /// A one-shot black operation gated on rank.
    pub fn black_operation(name: impl Into<String>, required_rank: f64) -> Self {
        Self {
            name: name.into(),
            kind: ActionKind::BlackOperation,
            count: 1.0,
            required_rank,
        }
    }

    /// Reference to this action.
    #[must_use]
    pub fn reference(&self) -> ActionRef {
        ActionRef::new(self.kind, self.name.clone())
    }
}

/// The city the player is operating in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// City name.
    pub name: String,
    /// Estimated number of synthoid communities.
    pub communities: u64,
}

/// Bladeburner progress relevant to starting actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BladeburnerState {
    /// Current rank. Fractional, as earned in game.
    pub rank: f64,
    /// City the player operates in.
    pub city: City,
    /// Action in progress, if any.
    #[serde(default)]
    pub current: Option<ActionRef>,
    #[serde(default)]
    actions: Vec<Action>,
}

/// Result of starting an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    /// The action now in progress.
    pub action: ActionRef,
    /// True if the player's other work has to stop.
    pub interrupts_work: bool,
}

impl BladeburnerState {
    /// Creates a state with no actions registered.
    pub fn new(rank: f64, city: City) -> Self {
        Self {
            rank,
            city,
            current: None,
            actions: Vec::new(),
        }
    }

    /// Registers an action, replacing one with the same kind and name.
    pub fn add_action(&mut self, action: Action) -> Option<Action> {
        match self
            .actions
            .iter_mut()
            .find(|a| a.kind == action.kind && a.name == action.name)
        {
            Some(slot) => Some(std::mem::replace(slot, action)),
            None => {
                self.actions.push(action);
                None
            }
        }
    }

    /// Looks up a registered action.
    #[must_use]
    pub fn action(&self, kind: ActionKind, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.kind == kind && a.name == name)
    }

    /// Iterates registered actions in registration order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Returns true if the Start button for `action` would be enabled.
    #[must_use]
    pub fn can_start(&self, action: &Action) -> bool {
        check_start(self, action).is_ok()
    }

    /// Starts the named action.
    ///
    /// `has_simulacrum` is whether the player owns the augmentation that
    /// lets Bladeburner work run alongside other work.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAction` if no such action is registered, otherwise the
    /// first gate the action fails (see [`check_start`]).
    pub fn start_action(
        &mut self,
        kind: ActionKind,
        name: &str,
        has_simulacrum: bool,
    ) -> Result<StartOutcome, ActionError> {
        let action = self
            .action(kind, name)
            .ok_or_else(|| ActionError::UnknownAction {
                name: name.to_string(),
            })?;
        check_start(self, action)?;

        let reference = action.reference();
        self.current = Some(reference.clone());
        info!(action = %reference.name, kind = %reference.kind, "bladeburner action started");
        Ok(StartOutcome {
            action: reference,
            interrupts_work: !has_simulacrum,
        })
    }
}

/// Checks whether `action` can be started in `state`.
///
/// # Errors
///
/// In order of precedence:
/// - `NoneRemaining` if `count < 1`
/// - `NoCommunities` for a Raid where the current city has none
/// - `RankTooLow` for a black operation above the current rank
pub fn check_start(state: &BladeburnerState, action: &Action) -> Result<(), ActionError> {
    // NaN counts fail this too.
    if !(action.count >= 1.0) {
        debug!(action = %action.name, count = action.count, "no remaining count");
        return Err(ActionError::NoneRemaining {
            name: action.name.clone(),
        });
    }

    if action.name == RAID && state.city.communities == 0 {
        return Err(ActionError::NoCommunities {
            name: action.name.clone(),
            city: state.city.name.clone(),
        });
    }

    if action.kind == ActionKind::BlackOperation && !(state.rank >= action.required_rank) {
        return Err(ActionError::RankTooLow {
            name: action.name.clone(),
            required: action.required_rank,
            rank: state.rank,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(rank: f64, communities: u64) -> BladeburnerState {
        let mut s = BladeburnerState::new(
            rank,
            City {
                name: "Sector-12".to_string(),
                communities,
            },
        );
        s.add_action(Action::general("Training"));
        s.add_action(Action::contract("Tracking", 3.0));
        s.add_action(Action::operation(RAID, 5.0));
        s.add_action(Action::operation("Investigation", 0.0));
        s.add_action(Action::black_operation("Operation Typhoon", 2_500.0));
        s
    }

    #[test]
    fn test_general_always_startable() {
        let s = state(0.0, 0);
        let training = s.action(ActionKind::General, "Training").unwrap();
        assert!(s.can_start(training));
    }

    #[test]
    fn test_zero_count_disabled() {
        let s = state(0.0, 10);
        let inv = s.action(ActionKind::Operation, "Investigation").unwrap();
        assert!(matches!(
            check_start(&s, inv),
            Err(ActionError::NoneRemaining { .. })
        ));
    }

    #[test]
    fn test_fractional_count_below_one_disabled() {
        let s = state(0.0, 10);
        let contract = Action::contract("Bounty Hunter", 0.5);
        assert!(!s.can_start(&contract));
    }

    #[test]
    fn test_raid_needs_communities() {
        let s = state(0.0, 0);
        let raid = s.action(ActionKind::Operation, RAID).unwrap();
        let err = check_start(&s, raid).unwrap_err();
        assert_eq!(
            err,
            ActionError::NoCommunities {
                name: RAID.to_string(),
                city: "Sector-12".to_string()
            }
        );

        let s = state(0.0, 3);
        let raid = s.action(ActionKind::Operation, RAID).unwrap();
        assert!(s.can_start(raid));
    }

    #[test]
    fn test_black_op_rank_gate() {
        let low = state(100.0, 0);
        let op = low.action(ActionKind::BlackOperation, "Operation Typhoon").unwrap();
        assert!(matches!(
            check_start(&low, op),
            Err(ActionError::RankTooLow { required, rank, .. }) if required == 2_500.0 && rank == 100.0
        ));

        let almost = state(2_499.6, 0);
        let op = almost.action(ActionKind::BlackOperation, "Operation Typhoon").unwrap();
        assert!(!almost.can_start(op));

        let high = state(2_500.0, 0);
        let op = high.action(ActionKind::BlackOperation, "Operation Typhoon").unwrap();
        assert!(high.can_start(op));
    }

    #[test]
    fn test_rank_ignored_for_non_black_ops() {
        let s = state(0.0, 1);
        let mut contract = Action::contract("Retirement", 1.0);
        contract.required_rank = 1_000.0;
        assert!(s.can_start(&contract));
    }

    #[test]
    fn test_start_sets_current() {
        let mut s = state(0.0, 1);
        let outcome = s.start_action(ActionKind::Contract, "Tracking", false).unwrap();
        assert!(outcome.interrupts_work);
        assert_eq!(s.current, Some(ActionRef::new(ActionKind::Contract, "Tracking")));
    }

    #[test]
    fn test_simulacrum_keeps_other_work() {
        let mut s = state(0.0, 1);
        let outcome = s.start_action(ActionKind::General, "Training", true).unwrap();
        assert!(!outcome.interrupts_work);
    }

    #[test]
    fn test_failed_start_keeps_current() {
        let mut s = state(0.0, 0);
        s.start_action(ActionKind::General, "Training", false).unwrap();
        let err = s.start_action(ActionKind::Operation, RAID, false).unwrap_err();
        assert!(matches!(err, ActionError::NoCommunities { .. }));
        assert_eq!(s.current, Some(ActionRef::new(ActionKind::General, "Training")));
    }

    #[test]
    fn test_add_action_replaces() {
        let mut s = state(0.0, 0);
        let old = s.add_action(Action::contract("Tracking", 9.0)).unwrap();
        assert_eq!(old.count, 3.0);
        assert_eq!(s.action(ActionKind::Contract, "Tracking").unwrap().count, 9.0);
        assert_eq!(s.actions().count(), 5);
    }

    #[test]
    fn test_state_serde_roundtrip() {
        let mut s = state(10.0, 2);
        s.start_action(ActionKind::General, "Training", true).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let back: BladeburnerState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_unknown_action() {
        let mut s = state(0.0, 0);
        let err = s.start_action(ActionKind::Contract, "Nope", false).unwrap_err();
        assert_eq!(err, ActionError::UnknownAction { name: "Nope".to_string() });
        assert!(s.current.is_none());
    }
}
