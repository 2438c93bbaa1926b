//! The game world: boot-time templates (`WorldDb`), live instances
//! (`InstanceManager`), live characters (`CharacterRegistry`) and live room
//! occupancy, bundled into a single `World` handle that the rest of the
//! server shares via `Arc`.

pub mod characters;
pub mod database;
pub mod instances;
pub mod mobile;
pub mod object;
pub mod room;
pub mod vnum;
pub mod zone;

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use crate::character::Character;
use crate::ids::CharacterId;

pub use characters::CharacterRegistry;
pub use database::WorldDb;
pub use instances::InstanceManager;
pub use room::Room;
pub use vnum::RoomVnum;

/// Everything that makes up the live game world. Rooms own the character
/// set that currently occupies them (§3 invariant); the `characters`
/// registry is purely an id-to-handle index over the same characters.
pub struct World {
    pub db: WorldDb,
    pub instances: InstanceManager,
    pub characters: CharacterRegistry,
    rooms: DashMap<RoomVnum, Room>,
}

impl World {
    pub fn new(db: WorldDb) -> Self {
        let rooms = DashMap::new();
        for vnum in db.all_room_vnums() {
            if let Some(template) = db.get_room(vnum) {
                rooms.insert(vnum, Room::new(template));
            }
        }
        World {
            db,
            instances: InstanceManager::new(),
            characters: CharacterRegistry::new(),
            rooms,
        }
    }

    /// Rebuilds the live `Room` table from the current templates in `db`.
    /// Used after a zone reset mutates a room's door state in place, and
    /// at boot once loading has finished.
    pub fn resync_room(&self, vnum: RoomVnum) {
        if let Some(template) = self.db.get_room(vnum) {
            self.rooms
                .entry(vnum)
                .and_modify(|r| r.template = template.clone())
                .or_insert_with(|| Room::new(template));
        }
    }

    pub fn room_exists(&self, vnum: RoomVnum) -> bool {
        self.rooms.contains_key(&vnum)
    }

    pub fn with_room<R>(&self, vnum: RoomVnum, f: impl FnOnce(&Room) -> R) -> Option<R> {
        self.rooms.get(&vnum).map(|r| f(&r))
    }

    /// Places a newly created character into its recorded room and
    /// registers it, in one step, so the invariant never observes a
    /// character that exists in the registry but not in any room's set.
    pub fn spawn_character(&self, character: Character) -> Arc<Mutex<Character>> {
        let room = character.room();
        let id = character.id();
        let handle = self.characters.insert(character);
        if let Some(mut r) = self.rooms.get_mut(&room) {
            r.characters.insert(id);
        }
        handle
    }

    /// Removes a character from the world entirely (logout, death cleanup
    /// after the corpse has been created).
    pub fn despawn_character(&self, id: CharacterId, room: RoomVnum) {
        if let Some(mut r) = self.rooms.get_mut(&room) {
            r.characters.remove(&id);
        }
        self.characters.remove(id);
    }

    /// Moves `id` from `from` to `to`. Callers update the character's own
    /// `room` field under its mutex; this only maintains the room-side
    /// sets so the two never disagree for longer than the caller's own
    /// critical section.
    pub fn move_character(&self, id: CharacterId, from: RoomVnum, to: RoomVnum) {
        if let Some(mut r) = self.rooms.get_mut(&from) {
            r.characters.remove(&id);
        }
        if let Some(mut r) = self.rooms.get_mut(&to) {
            r.characters.insert(id);
        }
    }

    pub fn occupants_of(&self, room: RoomVnum) -> Vec<CharacterId> {
        self.rooms
            .get(&room)
            .map(|r| r.characters.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn occupant_count(&self, room: RoomVnum) -> usize {
        self.rooms.get(&room).map(|r| r.characters.len()).unwrap_or(0)
    }

    pub fn send_line(&self, id: CharacterId, line: &str) {
        if let Some(handle) = self.characters.get(id) {
            if let Ok(character) = handle.lock() {
                character.send_line(line);
            }
        }
    }

    /// Sends `line` to every occupant of `room` (used for room-wide
    /// broadcasts: arrivals, departures, combat rounds, say).
    pub fn broadcast_to_room(&self, room: RoomVnum, line: &str) {
        for id in self.occupants_of(room) {
            self.send_line(id, line);
        }
    }

    /// Like `broadcast_to_room`, but skips `exclude` (the character whose
    /// own action triggered the broadcast).
    pub fn broadcast_to_room_except(&self, room: RoomVnum, exclude: CharacterId, line: &str) {
        for id in self.occupants_of(room) {
            if id != exclude {
                self.send_line(id, line);
            }
        }
    }
}
