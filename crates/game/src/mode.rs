//! Difficulty presets.
//!
//! A mode is a named bundle of gameplay parameters chosen when a session
//! starts. It never changes for a running game; picking a different mode
//! requires a restart with a fresh game instance.

use serde::{Deserialize, Serialize};

/// Named difficulty configuration for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMode {
    pub name: String,
    pub ghost_piece: bool,
    pub next_preview: bool,
    pub can_pause: bool,
    /// Divisor applied to the base gravity period; higher falls faster.
    pub fall_speed: u32,
    pub score_multiplier: f64,
}

impl GameMode {
    /// Slow fall, previews on, pausing allowed.
    pub fn beginner() -> Self {
        Self {
            name: String::from("Beginner"),
            ghost_piece: true,
            next_preview: true,
            can_pause: true,
            fall_speed: 1,
            score_multiplier: 1.0,
        }
    }

    /// Fast fall, no previews, no pausing, scores x1.5.
    pub fn classic() -> Self {
        Self {
            name: String::from("Classic"),
            ghost_piece: false,
            next_preview: false,
            can_pause: false,
            fall_speed: 3,
            score_multiplier: 1.5,
        }
    }

    /// Resolves a mode selector from the wire; anything unrecognized
    /// falls back to beginner.
    pub fn from_name(name: &str) -> Self {
        match name {
            "classic" => Self::classic(),
            _ => Self::beginner(),
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        Self::beginner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_selector_falls_back_to_beginner() {
        assert_eq!(GameMode::from_name("classic").name, "Classic");
        assert_eq!(GameMode::from_name("beginner").name, "Beginner");
        assert_eq!(GameMode::from_name("").name, "Beginner");
        assert_eq!(GameMode::from_name("nightmare").name, "Beginner");
    }

    #[test]
    fn classic_is_harder_than_beginner() {
        let beginner = GameMode::beginner();
        let classic = GameMode::classic();
        assert!(classic.fall_speed > beginner.fall_speed);
        assert!(classic.score_multiplier > beginner.score_multiplier);
        assert!(!classic.can_pause);
        assert!(beginner.can_pause);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(GameMode::classic()).unwrap();
        assert_eq!(json["name"], "Classic");
        assert_eq!(json["ghostPiece"], false);
        assert_eq!(json["nextPreview"], false);
        assert_eq!(json["canPause"], false);
        assert_eq!(json["fallSpeed"], 3);
        assert_eq!(json["scoreMultiplier"], 1.5);
    }
}
