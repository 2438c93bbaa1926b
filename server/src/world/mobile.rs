//! Mobile templates and instances (§3).

use std::collections::HashMap;

use core::dice::Dice;

use crate::character::{AbilityScores, Position};
use crate::ids::{CharacterId, MobileInstanceId};
use crate::world::vnum::{MobileVnum, RoomVnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    Neutral,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MobileActionFlags: u32 {
        const AGGRESSIVE = 1 << 0;
        const SENTINEL   = 1 << 1;
        const SCAVENGER  = 1 << 2;
        const WIMPY      = 1 << 3;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MobileAffectionFlags: u32 {
        const BLIND   = 1 << 0;
        const INVISIBLE = 1 << 1;
        const DETECT_INVIS = 1 << 2;
        const SANCTUARY = 1 << 3;
    }
}

/// The immutable template loaded from the `.mob` file at boot.
#[derive(Debug, Clone)]
pub struct MobileTemplate {
    pub vnum: MobileVnum,
    pub keyword: String,
    pub short_description: String,
    pub long_description: String,
    pub detailed_description: String,
    pub level: i32,
    pub max_hit_points: i32,
    pub armor_class: i32,
    pub damage_dice: Dice,
    pub experience: i64,
    pub gold: i64,
    pub alignment: i32,
    pub action_flags: MobileActionFlags,
    pub affection_flags: MobileAffectionFlags,
    pub default_position: Position,
    pub sex: Sex,
    pub abilities: AbilityScores,
    pub size: i32,
    pub skills: HashMap<String, u8>,
    pub special_attack_types: Vec<i32>,
}

/// A live mobile, created by a zone reset or spawn command.
#[derive(Debug, Clone)]
pub struct MobileInstance {
    pub instance_id: MobileInstanceId,
    pub character_id: CharacterId,
    pub template: MobileVnum,
    pub room: RoomVnum,
    pub hit_points: i32,
    pub mana: i32,
    pub position: Position,
    pub spawned_at_secs: u64,
    pub active: bool,
}
