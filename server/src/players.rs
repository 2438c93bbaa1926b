//! The player-file persistence layer sketched as an external collaborator
//! (§1 Non-goals: "the player file persistence format and password
//! hashing choice"; §6 only specifies the login flow's *behavior*, not
//! its backing store). `PlayerStore` is the seam a real implementation
//! would plug a disk- or database-backed store into; [`InMemoryPlayerStore`]
//! is the stand-in that makes the login flow in this repository actually
//! runnable end to end.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::character::AbilityScores;

/// Durable fields a returning player needs restored on login. Everything
/// else (room, position, fight target, input queue) is session-local and
/// reinitialized fresh each connection.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub name: String,
    pub password: String,
    pub level: i32,
    pub hit_points: i32,
    pub max_hit_points: i32,
    pub armor_class: i32,
    pub abilities: AbilityScores,
    pub experience: i64,
    pub gold: i64,
    pub recent_deaths: u32,
    pub last_room: crate::world::vnum::RoomVnum,
}

impl PlayerRecord {
    /// A freshly created character's starting stats — deliberately
    /// unremarkable; balancing starting stats is out of this spec's scope.
    pub fn new(name: String, password: String, starting_room: crate::world::vnum::RoomVnum) -> Self {
        PlayerRecord {
            name,
            password,
            level: 1,
            hit_points: 20,
            max_hit_points: 20,
            armor_class: 10,
            abilities: AbilityScores::default(),
            experience: 0,
            gold: 0,
            recent_deaths: 0,
            last_room: starting_room,
        }
    }
}

pub trait PlayerStore: Send + Sync {
    fn exists(&self, name: &str) -> bool;
    fn check_password(&self, name: &str, password: &str) -> bool;
    fn load(&self, name: &str) -> Option<PlayerRecord>;
    fn save(&self, record: PlayerRecord);
}

/// An in-process stand-in for the real player-file/database layer. Not
/// durable across restarts — the actual persistence format is out of
/// scope per §1.
#[derive(Default)]
pub struct InMemoryPlayerStore {
    records: RwLock<HashMap<String, PlayerRecord>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn exists(&self, name: &str) -> bool {
        self.records.read().unwrap().contains_key(name)
    }

    fn check_password(&self, name: &str, password: &str) -> bool {
        self.records.read().unwrap().get(name).map(|r| r.password == password).unwrap_or(false)
    }

    fn load(&self, name: &str) -> Option<PlayerRecord> {
        self.records.read().unwrap().get(name).cloned()
    }

    fn save(&self, record: PlayerRecord) {
        self.records.write().unwrap().insert(record.name.clone(), record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::vnum::RoomVnum;

    #[test]
    fn unknown_name_does_not_exist() {
        let store = InMemoryPlayerStore::new();
        assert!(!store.exists("Nobody"));
    }

    #[test]
    fn save_then_check_password_round_trips() {
        let store = InMemoryPlayerStore::new();
        store.save(PlayerRecord::new("Alice".to_string(), "secret".to_string(), RoomVnum(3001)));
        assert!(store.exists("Alice"));
        assert!(store.check_password("Alice", "secret"));
        assert!(!store.check_password("Alice", "wrong"));
    }
}
