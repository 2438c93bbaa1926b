//! Virtual numbers (§3). Rooms, mobile templates, object templates and
//! zones each have their own vnum namespace; the newtype wrappers keep
//! them from being accidentally mixed up at a call site, which the
//! teacher's raw `usize` indices (`Repository::with_characters`, `cn:
//! usize`) did not protect against.

use std::fmt;

macro_rules! vnum_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(v: i32) -> Self {
                $name(v)
            }
        }
    };
}

vnum_type!(RoomVnum);
vnum_type!(MobileVnum);
vnum_type!(ObjectVnum);
vnum_type!(ZoneVnum);

impl RoomVnum {
    /// DikuMUD convention: a room's zone number is its vnum divided by 100.
    pub fn zone_number(self) -> i32 {
        self.0 / 100
    }
}
