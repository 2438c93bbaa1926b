//! The instance manager (§4.C): the set of live mobile and object
//! instances, keyed by instance id. Grounded on the teacher's
//! `repository.rs` tracking pattern, backed by `dashmap` (already used
//! elsewhere in the retrieval pack, e.g. `WrldBld-Game`, for exactly this
//! "many readers/writers, no single owning task" shape) instead of a
//! `Mutex`-around-`Vec` global.

use dashmap::DashMap;

use crate::ids::{MobileInstanceId, ObjectInstanceId};
use crate::world::mobile::MobileInstance;
use crate::world::object::{ObjectInstance, ObjectLocation};
use crate::world::vnum::{MobileVnum, ObjectVnum, RoomVnum};

#[derive(Default)]
pub struct InstanceManager {
    mobiles: DashMap<MobileInstanceId, MobileInstance>,
    objects: DashMap<ObjectInstanceId, ObjectInstance>,
}

impl InstanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: inserting the same instance id twice just overwrites.
    pub fn track_mobile(&self, instance: MobileInstance) {
        self.mobiles.insert(instance.instance_id, instance);
    }

    pub fn track_object(&self, instance: ObjectInstance) {
        self.objects.insert(instance.instance_id, instance);
    }

    pub fn remove_mobile(&self, id: MobileInstanceId) -> bool {
        self.mobiles.remove(&id).is_some()
    }

    pub fn remove_object(&self, id: ObjectInstanceId) -> bool {
        self.objects.remove(&id).is_some()
    }

    pub fn get_mobile(&self, id: MobileInstanceId) -> Option<MobileInstance> {
        self.mobiles.get(&id).map(|e| e.value().clone())
    }

    pub fn get_object(&self, id: ObjectInstanceId) -> Option<ObjectInstance> {
        self.objects.get(&id).map(|e| e.value().clone())
    }

    pub fn update_object(&self, id: ObjectInstanceId, f: impl FnOnce(&mut ObjectInstance)) {
        if let Some(mut entry) = self.objects.get_mut(&id) {
            f(entry.value_mut());
        }
    }

    pub fn update_mobile(&self, id: MobileInstanceId, f: impl FnOnce(&mut MobileInstance)) {
        if let Some(mut entry) = self.mobiles.get_mut(&id) {
            f(entry.value_mut());
        }
    }

    /// Mobile instances currently in `room` (snapshot at call time).
    pub fn mobiles_in_room(&self, room: RoomVnum) -> Vec<MobileInstance> {
        self.mobiles
            .iter()
            .filter(|e| e.value().room == room)
            .map(|e| e.value().clone())
            .collect()
    }

    /// Mobile instances whose room falls in `zone` (`room.vnum / 100`,
    /// the DikuMUD convention per §4.C).
    pub fn mobiles_in_zone(&self, zone: i32) -> Vec<MobileInstance> {
        self.mobiles
            .iter()
            .filter(|e| e.value().room.zone_number() == zone)
            .map(|e| e.value().clone())
            .collect()
    }

    pub fn objects_in_room(&self, room: RoomVnum) -> Vec<ObjectInstance> {
        self.objects
            .iter()
            .filter(|e| matches!(e.value().location, ObjectLocation::InRoom(r) if r == room))
            .map(|e| e.value().clone())
            .collect()
    }

    /// Number of live mobile instances spawned from `template` — supports
    /// the zone reset engine's existence caps (§4.D).
    pub fn count_of_mobile_template(&self, template: MobileVnum) -> usize {
        self.mobiles
            .iter()
            .filter(|e| e.value().template == template && e.value().active)
            .count()
    }

    pub fn count_of_object_template(&self, template: ObjectVnum) -> usize {
        self.objects
            .iter()
            .filter(|e| e.value().template == template && e.value().active)
            .count()
    }

    /// Removes instances whose `active` flag is false; returns the count
    /// swept (§4.C).
    pub fn sweep(&self) -> usize {
        let dead_mobiles: Vec<_> = self
            .mobiles
            .iter()
            .filter(|e| !e.value().active)
            .map(|e| *e.key())
            .collect();
        let dead_objects: Vec<_> = self
            .objects
            .iter()
            .filter(|e| !e.value().active)
            .map(|e| *e.key())
            .collect();

        let count = dead_mobiles.len() + dead_objects.len();
        for id in dead_mobiles {
            self.mobiles.remove(&id);
        }
        for id in dead_objects {
            self.objects.remove(&id);
        }
        count
    }

    pub fn all_objects(&self) -> Vec<ObjectInstance> {
        self.objects.iter().map(|e| e.value().clone()).collect()
    }
}
