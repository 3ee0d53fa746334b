//! Commands accepted by a session.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, SideId};
use crate::effects::TargetId;
use crate::error::EngineError;

/// An instruction from a presentation layer or test driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Place a hand card into a slot of the side's row.
    PlaceCard { side: SideId, slot: u8, card: EntityId },
    /// Put points of the open effect on a target.
    AllocateEffect { target: TargetId, value: u32 },
    /// Resolve the open effect now.
    ConfirmEffect,
    /// Draw the top card of a side's deck.
    DrawCard { side: SideId },
    /// Give up the player's priority token.
    ReleasePriority,
    /// Trigger a named special action.
    UseSpecialAction { name: String },
    /// Pause the clock from outside.
    Pause,
    /// Lift an outside pause.
    Resume,
    /// Start over with fresh sides and an empty battlefield.
    Restart,
}

/// Special actions available to the side holding priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAction {
    /// Neutralize the first eligible card regardless of chance.
    ForceNeutralization,
}

impl SpecialAction {
    /// Wire name of the action.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SpecialAction::ForceNeutralization => "force_neutralization",
        }
    }
}

impl FromStr for SpecialAction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force_neutralization" | "forceNeutralization" => Ok(SpecialAction::ForceNeutralization),
            other => Err(EngineError::UnknownSpecialAction(other.to_string())),
        }
    }
}

impl std::fmt::Display for SpecialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_special_action() {
        assert_eq!(
            "force_neutralization".parse::<SpecialAction>(),
            Ok(SpecialAction::ForceNeutralization)
        );
        assert_eq!(
            "summon_dragon".parse::<SpecialAction>(),
            Err(EngineError::UnknownSpecialAction("summon_dragon".into()))
        );
        assert_eq!(SpecialAction::ForceNeutralization.to_string(), "force_neutralization");
    }

    #[test]
    fn test_command_serde_roundtrip() {
        let command = Command::PlaceCard {
            side: SideId::Player,
            slot: 5,
            card: EntityId::new(3),
        };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(serde_json::from_str::<Command>(&json).unwrap(), command);
    }
}
