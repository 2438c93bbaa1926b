//! Shared constants: compass directions, wear slots, room/sector tags,
//! zone reset command codes and the legacy command-id table (§6 of the
//! specification this crate implements).

use bitflags::bitflags;

/// One of the six DikuMUD-style exits a room may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    /// Maps the on-disk `D<n>` exit index (`0..5`) to a direction.
    pub fn from_index(n: u8) -> Option<Direction> {
        match n {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::South),
            3 => Some(Direction::West),
            4 => Some(Direction::Up),
            5 => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_index(self) -> u8 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
            Direction::Up => 4,
            Direction::Down => 5,
        }
    }

    /// The exit a character arrives through when moving this direction,
    /// i.e. the direction that leads back.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "east" | "e" => Ok(Direction::East),
            "south" | "s" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            _ => Err(()),
        }
    }
}

bitflags! {
    /// Room flags (§6), powers of two exactly as the on-disk format stores them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RoomFlags: u32 {
        const DARK        = 1 << 0;
        const DEATH       = 1 << 1;
        const NO_MOB      = 1 << 2;
        const INDOORS     = 1 << 3;
        const PEACEFUL    = 1 << 4;
        const NO_SUMMON   = 1 << 5;
        const NO_TELEPORT = 1 << 6;
        const PRIVATE     = 1 << 7;
        const GOD_ROOM    = 1 << 8;
        const HOUSE       = 1 << 9;
        const HOUSE_CRASH = 1 << 10;
        const ATRIUM      = 1 << 11;
        const CLAN        = 1 << 12;
    }
}

/// Terrain/sector tag (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorType {
    Inside,
    City,
    Field,
    Forest,
    Hills,
    Mountain,
    WaterSwim,
    WaterNoSwim,
    Underwater,
    Flying,
    Desert,
    Swamp,
    Ice,
    Road,
    Underground,
}

impl SectorType {
    pub fn from_code(code: i32) -> Option<SectorType> {
        use SectorType::*;
        Some(match code {
            0 => Inside,
            1 => City,
            2 => Field,
            3 => Forest,
            4 => Hills,
            5 => Mountain,
            6 => WaterSwim,
            7 => WaterNoSwim,
            8 => Underwater,
            9 => Flying,
            10 => Desert,
            11 => Swamp,
            12 => Ice,
            13 => Road,
            14 => Underground,
            _ => return None,
        })
    }
}

bitflags! {
    /// Door-state bitset for an exit (§3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DoorFlags: u16 {
        const EXISTS     = 1 << 0;
        const CLOSED     = 1 << 1;
        const LOCKED     = 1 << 2;
        const PICKPROOF  = 1 << 3;
        const AUTOCLOSE  = 1 << 4;
        const AUTOLOCK   = 1 << 5;
        const HIDDEN     = 1 << 6;
        const ONEWAY     = 1 << 7;
    }
}

/// Wear slot index (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum WearSlot {
    Light = 0,
    FingerRight = 1,
    FingerLeft = 2,
    Neck1 = 3,
    Neck2 = 4,
    Body = 5,
    Head = 6,
    Legs = 7,
    Feet = 8,
    Hands = 9,
    Arms = 10,
    Shield = 11,
    About = 12,
    Waist = 13,
    WristRight = 14,
    WristLeft = 15,
    Wield = 16,
    Hold = 17,
    Tail = 18,
    FourLegs1 = 19,
    FourLegs2 = 20,
}

impl WearSlot {
    pub const ALL: [WearSlot; 21] = [
        WearSlot::Light,
        WearSlot::FingerRight,
        WearSlot::FingerLeft,
        WearSlot::Neck1,
        WearSlot::Neck2,
        WearSlot::Body,
        WearSlot::Head,
        WearSlot::Legs,
        WearSlot::Feet,
        WearSlot::Hands,
        WearSlot::Arms,
        WearSlot::Shield,
        WearSlot::About,
        WearSlot::Waist,
        WearSlot::WristRight,
        WearSlot::WristLeft,
        WearSlot::Wield,
        WearSlot::Hold,
        WearSlot::Tail,
        WearSlot::FourLegs1,
        WearSlot::FourLegs2,
    ];

    pub fn from_code(code: i32) -> Option<WearSlot> {
        if !(0..=20).contains(&code) {
            return None;
        }
        Some(Self::ALL[code as usize])
    }
}

/// One letter of a zone reset command (§4.D / §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOp {
    LoadMobile,
    LoadObject,
    Equip,
    Give,
    Door,
    PutInContainer,
    RemoveFromRoom,
}

impl ResetOp {
    pub fn from_letter(c: char) -> Option<ResetOp> {
        match c {
            'M' => Some(ResetOp::LoadMobile),
            'O' => Some(ResetOp::LoadObject),
            'E' => Some(ResetOp::Equip),
            'G' => Some(ResetOp::Give),
            'D' => Some(ResetOp::Door),
            'P' => Some(ResetOp::PutInContainer),
            'R' => Some(ResetOp::RemoveFromRoom),
            _ => None,
        }
    }
}

/// Legacy integer command ids mirrored for tooling parity (§4.I). Unknown
/// commands map to `-1`.
pub fn legacy_command_id(primary_name: &str) -> i32 {
    match primary_name {
        "north" => 1,
        "east" => 2,
        "south" => 3,
        "west" => 4,
        "up" => 5,
        "down" => 6,
        "look" => 15,
        "say" => 17,
        "inventory" => 20,
        "score" => 14,
        "help" => 38,
        "who" => 39,
        "quit" => 73,
        "time" => 76,
        _ => -1,
    }
}
