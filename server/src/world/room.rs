//! Rooms and exits (§3). Exits hold destination vnums, never direct
//! references, "to keep the graph patchable and avoid cycle-breaking
//! concerns" — ported from the teacher's `repository.rs` map-of-records
//! pattern, generalized from an `unsafe` global array to a concurrent map
//! (see `world::database`).

use std::collections::{HashMap, HashSet};

use core::constants::{Direction, DoorFlags, RoomFlags, SectorType};

use crate::ids::{CharacterId, ObjectInstanceId};
use crate::world::vnum::{RoomVnum, ZoneVnum};

#[derive(Debug, Clone)]
pub struct Exit {
    pub direction: Direction,
    pub destination: RoomVnum,
    pub name: Option<String>,
    pub description: Option<String>,
    pub door_flags: DoorFlags,
    /// `-1` means no key (§3).
    pub key_vnum: i32,
}

impl Exit {
    pub fn is_closed(&self) -> bool {
        self.door_flags.contains(DoorFlags::CLOSED)
    }

    pub fn is_locked(&self) -> bool {
        self.door_flags.contains(DoorFlags::LOCKED)
    }
}

/// The immutable template loaded from the `.wld` file at boot.
#[derive(Debug, Clone)]
pub struct RoomTemplate {
    pub vnum: RoomVnum,
    pub name: String,
    pub description: String,
    pub zone: ZoneVnum,
    pub flags: RoomFlags,
    pub sector: SectorType,
    pub light_level: i32,
    pub mana_regen: i32,
    pub hp_regen: i32,
    pub min_level: i32,
    pub exits: HashMap<Direction, Exit>,
}

/// Live room state: the template plus who/what is currently inside.
/// "A character is present in exactly one room's character set, and that
/// room's vnum equals the character's recorded location" (§3 invariant).
#[derive(Debug, Clone)]
pub struct Room {
    pub template: RoomTemplate,
    pub characters: HashSet<CharacterId>,
    pub objects: Vec<ObjectInstanceId>,
}

impl Room {
    pub fn new(template: RoomTemplate) -> Self {
        Room {
            template,
            characters: HashSet::new(),
            objects: Vec::new(),
        }
    }

    pub fn vnum(&self) -> RoomVnum {
        self.template.vnum
    }

    pub fn exit(&self, direction: Direction) -> Option<&Exit> {
        self.template.exits.get(&direction)
    }

    pub fn exit_mut(&mut self, direction: Direction) -> Option<&mut Exit> {
        self.template.exits.get_mut(&direction)
    }
}
