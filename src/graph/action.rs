use crate::types::{Action, TeamId};
use serde::{Deserialize, Serialize};

/// What a learner does when it wins a bid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionObject {
    /// Emit a concrete action
    Atomic(Action),
    /// Delegate to another team (non-owning)
    TeamPointer(TeamId),
}

impl ActionObject {
    pub fn is_atomic(&self) -> bool {
        matches!(self, ActionObject::Atomic(_))
    }

    pub fn team(&self) -> Option<TeamId> {
        match self {
            ActionObject::TeamPointer(team) => Some(*team),
            ActionObject::Atomic(_) => None,
        }
    }

    pub fn atomic(&self) -> Option<Action> {
        match self {
            ActionObject::Atomic(action) => Some(*action),
            ActionObject::TeamPointer(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_accessors() {
        let atomic = ActionObject::Atomic(3);
        let pointer = ActionObject::TeamPointer(TeamId(7));

        assert!(atomic.is_atomic());
        assert_eq!(atomic.atomic(), Some(3));
        assert_eq!(atomic.team(), None);

        assert!(!pointer.is_atomic());
        assert_eq!(pointer.team(), Some(TeamId(7)));
        assert_eq!(pointer.atomic(), None);
    }
}
