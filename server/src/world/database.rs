//! The world database (§4.B): concurrent, vnum-keyed lookup maps for
//! rooms, mobile templates, object templates and zones. Grounded on the
//! teacher's `repository.rs` (a process-global map-of-records reached
//! through `with_*`/`with_*_mut` closures) but backed by ordinary
//! `RwLock<HashMap<..>>`s instead of an `unsafe`-wrapped global array —
//! readers may read concurrently, writers (load-time only in the steady
//! state) get exclusive access, exactly as §4.B specifies.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::world::room::RoomTemplate;
use crate::world::vnum::{MobileVnum, ObjectVnum, RoomVnum, ZoneVnum};
use crate::world::zone::Zone;
use crate::world::mobile::MobileTemplate;
use crate::world::object::ObjectTemplate;

#[derive(Default)]
pub struct WorldDb {
    rooms: RwLock<HashMap<RoomVnum, RoomTemplate>>,
    mobiles: RwLock<HashMap<MobileVnum, MobileTemplate>>,
    objects: RwLock<HashMap<ObjectVnum, ObjectTemplate>>,
    zones: RwLock<HashMap<ZoneVnum, Zone>>,
}

impl WorldDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_room(&self, room: RoomTemplate) {
        self.rooms.write().unwrap().insert(room.vnum, room);
    }

    pub fn load_mobile(&self, mobile: MobileTemplate) {
        self.mobiles.write().unwrap().insert(mobile.vnum, mobile);
    }

    pub fn load_object(&self, object: ObjectTemplate) {
        self.objects.write().unwrap().insert(object.vnum, object);
    }

    pub fn load_zone(&self, zone: Zone) {
        self.zones.write().unwrap().insert(zone.vnum, zone);
    }

    pub fn get_room(&self, vnum: RoomVnum) -> Option<RoomTemplate> {
        self.rooms.read().unwrap().get(&vnum).cloned()
    }

    pub fn get_mobile_template(&self, vnum: MobileVnum) -> Option<MobileTemplate> {
        self.mobiles.read().unwrap().get(&vnum).cloned()
    }

    pub fn get_object_template(&self, vnum: ObjectVnum) -> Option<ObjectTemplate> {
        self.objects.read().unwrap().get(&vnum).cloned()
    }

    pub fn room_exists(&self, vnum: RoomVnum) -> bool {
        self.rooms.read().unwrap().contains_key(&vnum)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().unwrap().len()
    }

    pub fn all_room_vnums(&self) -> Vec<RoomVnum> {
        self.rooms.read().unwrap().keys().copied().collect()
    }

    pub fn all_zones(&self) -> Vec<Zone> {
        self.zones.read().unwrap().values().cloned().collect()
    }

    pub fn with_zone_mut<R>(&self, vnum: ZoneVnum, f: impl FnOnce(&mut Zone) -> R) -> Option<R> {
        let mut zones = self.zones.write().unwrap();
        zones.get_mut(&vnum).map(f)
    }

    pub fn with_room_mut<R>(&self, vnum: RoomVnum, f: impl FnOnce(&mut RoomTemplate) -> R) -> Option<R> {
        let mut rooms = self.rooms.write().unwrap();
        rooms.get_mut(&vnum).map(f)
    }
}
