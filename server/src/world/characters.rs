//! The live character registry: id-to-handle lookup for every character
//! currently in the game, player or mobile.
//!
//! Per §9 ("connection ↔ session ↔ character cycle"), a character holds
//! no reference back to its connection/session; this registry plus the
//! per-room occupancy sets in `World` (§3: "a character is present in
//! exactly one room's character set") are the only places that know how
//! to find one.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use crate::character::Character;
use crate::ids::CharacterId;

#[derive(Default)]
pub struct CharacterRegistry {
    characters: DashMap<CharacterId, Arc<Mutex<Character>>>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, character: Character) -> Arc<Mutex<Character>> {
        let id = character.id();
        let handle = Arc::new(Mutex::new(character));
        self.characters.insert(id, handle.clone());
        handle
    }

    pub fn get(&self, id: CharacterId) -> Option<Arc<Mutex<Character>>> {
        self.characters.get(&id).map(|e| e.value().clone())
    }

    pub fn remove(&self, id: CharacterId) -> Option<Arc<Mutex<Character>>> {
        self.characters.remove(&id).map(|(_, handle)| handle)
    }

    pub fn all_ids(&self) -> Vec<CharacterId> {
        self.characters.iter().map(|e| *e.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
