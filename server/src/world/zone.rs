//! Zones and reset commands (§3/§4.D).

use core::constants::ResetOp;

use crate::world::vnum::{MobileVnum, ObjectVnum, RoomVnum, ZoneVnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    Never,
    WhenEmpty,
    Always,
}

/// One line of a zone's reset command list (§4.D/§6). Arguments keep their
/// on-disk names (`a1..a5`) since their meaning is op-dependent.
#[derive(Debug, Clone, Copy)]
pub struct ResetCommand {
    pub op: ResetOp,
    pub if_flag: bool,
    pub a2: i32,
    pub a3: i32,
    pub a4: i32,
    pub a5: i32,
}

impl ResetCommand {
    pub fn mobile_vnum(&self) -> MobileVnum {
        MobileVnum(self.a2)
    }
    pub fn object_vnum(&self) -> ObjectVnum {
        ObjectVnum(self.a2)
    }
    pub fn room_vnum(&self, field: i32) -> RoomVnum {
        RoomVnum(field)
    }
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub vnum: ZoneVnum,
    pub name: String,
    pub top_room: RoomVnum,
    pub lifespan_minutes: i32,
    pub reset_mode: ResetMode,
    pub reset_chance: u8,
    pub max_players: i32,
    pub min_level: i32,
    pub reset_commands: Vec<ResetCommand>,
    pub last_reset_secs: u64,
    pub age_minutes: i32,
}

impl Zone {
    pub fn room_range(&self) -> std::ops::RangeInclusive<i32> {
        (self.vnum.0 * 100)..=(self.top_room.0)
    }
}
