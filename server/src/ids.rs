//! Process-local instance identifiers, allocated from atomic counters.
//! Unlike the teacher's raw array indices (`cn: usize` into
//! `Repository::with_characters`), these are distinct types so a
//! character id can never be passed where an object-instance id or
//! connection id is expected.

use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! instance_id {
    ($name:ident, $counter:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        static $counter: AtomicU64 = AtomicU64::new(1);

        impl $name {
            pub fn next() -> Self {
                $name($counter.fetch_add(1, Ordering::Relaxed))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

instance_id!(CharacterId, NEXT_CHARACTER_ID);
instance_id!(ObjectInstanceId, NEXT_OBJECT_INSTANCE_ID);
instance_id!(MobileInstanceId, NEXT_MOBILE_INSTANCE_ID);
instance_id!(ConnectionId, NEXT_CONNECTION_ID);
