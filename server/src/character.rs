//! The polymorphic character hierarchy replaced by a tagged variant, per
//! spec §9: "Replace with a tagged variant `Character = Player | Mobile`
//! and a capability set... Commands dispatch on variant, not on vtable."
//! Grounded in spirit on the teacher's `core::types::Character`
//! (`is_sane_character`, flag-based variant test) but expressed as an enum
//! instead of a single god-struct indexed by raw `usize`.

use std::collections::VecDeque;

use tokio::sync::mpsc::UnboundedSender;

use crate::ids::{CharacterId, MobileInstanceId};
use crate::world::vnum::RoomVnum;

/// A character's physical state, ordered dead (worst) to standing (best) —
/// declaration order is derive-order, so `Position::Sleeping <
/// Position::Resting` etc. falls out of `#[derive(PartialOrd, Ord)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Position {
    Dead,
    MortallyWounded,
    Incapacitated,
    Stunned,
    Sleeping,
    Resting,
    Sitting,
    Fighting,
    Standing,
}

impl Position {
    /// The human-readable name used in position-rejection replies (§4.I).
    pub fn name(self) -> &'static str {
        match self {
            Position::Dead => "dead",
            Position::MortallyWounded => "mortally wounded",
            Position::Incapacitated => "incapacitated",
            Position::Stunned => "stunned",
            Position::Sleeping => "sleeping",
            Position::Resting => "resting",
            Position::Sitting => "sitting",
            Position::Fighting => "fighting",
            Position::Standing => "standing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityScores {
    pub strength: i32,
    /// Strength-add for values above 18 (§3), e.g. 18/50.
    pub strength_add: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        AbilityScores {
            strength: 13,
            strength_add: 0,
            intelligence: 13,
            wisdom: 13,
            dexterity: 13,
            constitution: 13,
            charisma: 13,
        }
    }
}

/// A line of outbound text destined for a player's connection. Sending is
/// infallible from the caller's point of view — a closed channel just
/// means the session is already tearing down (§7 `ConnectionClosed`).
pub type OutboundSink = UnboundedSender<String>;

#[derive(Debug, Clone)]
pub struct PlayerCharacter {
    pub id: CharacterId,
    pub name: String,
    pub room: RoomVnum,
    pub position: Position,
    pub hit_points: i32,
    pub max_hit_points: i32,
    pub armor_class: i32,
    pub abilities: AbilityScores,
    pub level: i32,
    pub fight_target: Option<CharacterId>,
    pub experience: i64,
    pub gold: i64,
    pub inventory: Vec<crate::ids::ObjectInstanceId>,
    pub equipment: std::collections::HashMap<core::constants::WearSlot, crate::ids::ObjectInstanceId>,
    /// Scales resurrection harshness (§4.J Resurrect).
    pub recent_deaths: u32,
    /// Queued raw input lines, drained by the dispatcher (§4.G).
    pub input_queue: VecDeque<String>,
    /// Output channel back to this player's writer task. `None` once the
    /// connection has gone away but the character object is still being
    /// torn down (e.g. mid-corpse-creation).
    pub outbound: Option<OutboundSink>,
}

impl PlayerCharacter {
    pub fn send_line(&self, line: &str) {
        if let Some(tx) = &self.outbound {
            let _ = tx.send(line.to_string());
        }
    }
}

#[derive(Debug, Clone)]
pub struct MobileCharacter {
    pub id: CharacterId,
    pub instance_id: MobileInstanceId,
    pub template: crate::world::vnum::MobileVnum,
    pub name: String,
    pub room: RoomVnum,
    pub position: Position,
    pub hit_points: i32,
    pub max_hit_points: i32,
    pub armor_class: i32,
    pub abilities: AbilityScores,
    pub level: i32,
    pub fight_target: Option<CharacterId>,
    pub damage_dice: core::dice::Dice,
    pub experience_award: i64,
    pub gold: i64,
    pub inventory: Vec<crate::ids::ObjectInstanceId>,
    pub equipment: std::collections::HashMap<core::constants::WearSlot, crate::ids::ObjectInstanceId>,
}

impl MobileCharacter {
    /// Mobiles have no client to write to; sending a line is a no-op,
    /// matching spec §3 ("the ability to receive a line of text — a
    /// no-op for mobiles").
    pub fn send_line(&self, _line: &str) {}
}

/// The tagged variant named in spec §9, replacing the teacher's shared
/// base-class approach.
#[derive(Debug, Clone)]
pub enum Character {
    Player(PlayerCharacter),
    Mobile(MobileCharacter),
}

impl Character {
    pub fn id(&self) -> CharacterId {
        match self {
            Character::Player(p) => p.id,
            Character::Mobile(m) => m.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Character::Player(p) => &p.name,
            Character::Mobile(m) => &m.name,
        }
    }

    pub fn room(&self) -> RoomVnum {
        match self {
            Character::Player(p) => p.room,
            Character::Mobile(m) => m.room,
        }
    }

    pub fn set_room(&mut self, room: RoomVnum) {
        match self {
            Character::Player(p) => p.room = room,
            Character::Mobile(m) => m.room = room,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Character::Player(p) => p.position,
            Character::Mobile(m) => m.position,
        }
    }

    pub fn set_position(&mut self, position: Position) {
        match self {
            Character::Player(p) => p.position = position,
            Character::Mobile(m) => m.position = position,
        }
    }

    pub fn hit_points(&self) -> i32 {
        match self {
            Character::Player(p) => p.hit_points,
            Character::Mobile(m) => m.hit_points,
        }
    }

    pub fn set_hit_points(&mut self, hp: i32) {
        match self {
            Character::Player(p) => p.hit_points = hp,
            Character::Mobile(m) => m.hit_points = hp,
        }
    }

    pub fn max_hit_points(&self) -> i32 {
        match self {
            Character::Player(p) => p.max_hit_points,
            Character::Mobile(m) => m.max_hit_points,
        }
    }

    pub fn armor_class(&self) -> i32 {
        match self {
            Character::Player(p) => p.armor_class,
            Character::Mobile(m) => m.armor_class,
        }
    }

    pub fn abilities(&self) -> AbilityScores {
        match self {
            Character::Player(p) => p.abilities,
            Character::Mobile(m) => m.abilities,
        }
    }

    pub fn level(&self) -> i32 {
        match self {
            Character::Player(p) => p.level,
            Character::Mobile(m) => m.level,
        }
    }

    pub fn fight_target(&self) -> Option<CharacterId> {
        match self {
            Character::Player(p) => p.fight_target,
            Character::Mobile(m) => m.fight_target,
        }
    }

    pub fn set_fight_target(&mut self, target: Option<CharacterId>) {
        match self {
            Character::Player(p) => p.fight_target = target,
            Character::Mobile(m) => m.fight_target = target,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Character::Player(_))
    }

    pub fn send_line(&self, line: &str) {
        match self {
            Character::Player(p) => p.send_line(line),
            Character::Mobile(m) => m.send_line(line),
        }
    }

    pub fn gold(&self) -> i64 {
        match self {
            Character::Player(p) => p.gold,
            Character::Mobile(m) => m.gold,
        }
    }

    pub fn set_gold(&mut self, gold: i64) {
        match self {
            Character::Player(p) => p.gold = gold,
            Character::Mobile(m) => m.gold = gold,
        }
    }

    pub fn take_inventory(&mut self) -> Vec<crate::ids::ObjectInstanceId> {
        match self {
            Character::Player(p) => std::mem::take(&mut p.inventory),
            Character::Mobile(m) => std::mem::take(&mut m.inventory),
        }
    }

    pub fn inventory(&self) -> &[crate::ids::ObjectInstanceId] {
        match self {
            Character::Player(p) => &p.inventory,
            Character::Mobile(m) => &m.inventory,
        }
    }

    pub fn inventory_mut(&mut self) -> &mut Vec<crate::ids::ObjectInstanceId> {
        match self {
            Character::Player(p) => &mut p.inventory,
            Character::Mobile(m) => &mut m.inventory,
        }
    }

    pub fn equipment(&self) -> &std::collections::HashMap<core::constants::WearSlot, crate::ids::ObjectInstanceId> {
        match self {
            Character::Player(p) => &p.equipment,
            Character::Mobile(m) => &m.equipment,
        }
    }

    pub fn equipment_mut(&mut self) -> &mut std::collections::HashMap<core::constants::WearSlot, crate::ids::ObjectInstanceId> {
        match self {
            Character::Player(p) => &mut p.equipment,
            Character::Mobile(m) => &mut m.equipment,
        }
    }

    pub fn experience(&self) -> i64 {
        match self {
            Character::Player(p) => p.experience,
            Character::Mobile(_) => 0,
        }
    }
}

/// Strength-based hit/damage bonus table (§4.J), shared by both piecewise
/// lookups the spec defines.
pub fn strength_hit_bonus(strength: i32) -> i32 {
    match strength {
        s if s >= 18 => 1,
        13..=17 => 0,
        9..=12 => 0,
        6..=8 => -1,
        3..=5 => -2,
        _ => -2,
    }
}

pub fn strength_damage_bonus(strength: i32) -> i32 {
    match strength {
        s if s >= 18 => 2,
        13..=17 => 1,
        9..=12 => 0,
        6..=8 => 0,
        3..=5 => -1,
        _ => -2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ordering_matches_spec() {
        assert!(Position::Dead < Position::MortallyWounded);
        assert!(Position::Sleeping < Position::Resting);
        assert!(Position::Resting < Position::Sitting);
        assert!(Position::Fighting < Position::Standing);
    }

    #[test]
    fn strength_bonus_piecewise() {
        assert_eq!(strength_hit_bonus(18), 1);
        assert_eq!(strength_hit_bonus(15), 0);
        assert_eq!(strength_hit_bonus(7), -1);
        assert_eq!(strength_hit_bonus(4), -2);
        assert_eq!(strength_damage_bonus(18), 2);
        assert_eq!(strength_damage_bonus(16), 1);
        assert_eq!(strength_damage_bonus(4), -1);
        assert_eq!(strength_damage_bonus(3), -2);
    }
}
