//! The zone reset engine (§4.D). Grounded on the teacher's `population.rs`
//! (which replays a fixed spawn list into map cells each cycle) but driven
//! by the `MOEGDRP` command stream instead of a hardcoded table.

use core::constants::ResetOp;
use core::dice::DiceRoller;

use crate::ids::{CharacterId, MobileInstanceId, ObjectInstanceId};
use crate::world::mobile::MobileInstance;
use crate::world::object::{ObjectInstance, ObjectLocation};
use crate::world::vnum::{MobileVnum, ObjectVnum, RoomVnum, ZoneVnum};
use crate::world::zone::{ResetCommand, ResetMode, Zone};
use crate::world::World;

/// Considers every zone in `world.db` and resets the eligible ones.
/// Called once per game tick (§4.K).
pub fn run_zone_resets(world: &World, roller: &mut dyn DiceRoller) {
    for zone in world.db.all_zones() {
        if !is_eligible(world, &zone) {
            continue;
        }
        if roller.roll(1, 100) <= zone.reset_chance as i32 {
            reset_zone(world, &zone, roller);
            world.db.with_zone_mut(zone.vnum, |z| {
                z.age_minutes = 0;
                z.last_reset_secs = now_secs();
            });
        }
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn is_eligible(world: &World, zone: &Zone) -> bool {
    if zone.age_minutes < zone.lifespan_minutes {
        return false;
    }
    match zone.reset_mode {
        ResetMode::Never => false,
        ResetMode::Always => true,
        ResetMode::WhenEmpty => !zone_has_player(world, zone),
    }
}

fn zone_has_player(world: &World, zone: &Zone) -> bool {
    for room_vnum in zone.room_range() {
        let room = RoomVnum(room_vnum);
        if !world.room_exists(room) {
            continue;
        }
        for id in world.occupants_of(room) {
            if let Some(handle) = world.characters.get(id) {
                if let Ok(character) = handle.try_lock() {
                    if character.is_player() {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Tracks the "current mobile"/"current container" that nested `E`/`G`/`P`
/// commands refer back to (§4.D: "nesting is inferred from the stream").
struct ResetCursor {
    current_mobile: Option<(CharacterId, MobileInstanceId)>,
    current_mobile_succeeded: bool,
    current_container: Option<ObjectInstanceId>,
    current_container_succeeded: bool,
}

fn reset_zone(world: &World, zone: &Zone, roller: &mut dyn DiceRoller) {
    let mut cursor = ResetCursor {
        current_mobile: None,
        current_mobile_succeeded: false,
        current_container: None,
        current_container_succeeded: false,
    };

    for cmd in &zone.reset_commands {
        apply_reset_command(world, cmd, &mut cursor, roller);
    }

    for room_vnum in zone.room_range() {
        world.resync_room(RoomVnum(room_vnum));
    }
}

fn apply_reset_command(world: &World, cmd: &ResetCommand, cursor: &mut ResetCursor, roller: &mut dyn DiceRoller) {
    match cmd.op {
        ResetOp::LoadMobile => {
            let template_vnum = cmd.mobile_vnum();
            let room = RoomVnum(cmd.a4);
            let limit = cmd.a3;
            if (world.instances.count_of_mobile_template(template_vnum) as i32) < limit {
                if let Some(spawned) = spawn_mobile(world, template_vnum, room, roller) {
                    cursor.current_mobile = Some(spawned);
                    cursor.current_mobile_succeeded = true;
                    return;
                }
            }
            cursor.current_mobile_succeeded = false;
        }
        ResetOp::LoadObject => {
            let template_vnum = cmd.object_vnum();
            let room = RoomVnum(cmd.a4);
            let limit = cmd.a3;
            if (world.instances.count_of_object_template(template_vnum) as i32) < limit {
                let instance_id = ObjectInstanceId::next();
                let instance = ObjectInstance::new(instance_id, template_vnum, ObjectLocation::InRoom(room));
                world.instances.track_object(instance);
                cursor.current_container = Some(instance_id);
                cursor.current_container_succeeded = true;
                return;
            }
            cursor.current_container_succeeded = false;
        }
        ResetOp::Equip => {
            if !gate_passes(cmd.if_flag, cursor.current_mobile_succeeded) {
                return;
            }
            let Some((character_id, _)) = cursor.current_mobile else { return };
            let Some(slot) = core::constants::WearSlot::from_code(cmd.a3) else { return };
            let template_vnum = ObjectVnum(cmd.a2);
            let instance_id = ObjectInstanceId::next();
            let instance = ObjectInstance::new(instance_id, template_vnum, ObjectLocation::EquippedOnMobile(character_id));
            world.instances.track_object(instance);
            if let Some(handle) = world.characters.get(character_id) {
                if let Ok(mut character) = handle.lock() {
                    character.equipment_mut().insert(slot, instance_id);
                }
            }
        }
        ResetOp::Give => {
            if !gate_passes(cmd.if_flag, cursor.current_mobile_succeeded) {
                return;
            }
            let Some((character_id, _)) = cursor.current_mobile else { return };
            let template_vnum = ObjectVnum(cmd.a2);
            let instance_id = ObjectInstanceId::next();
            let instance = ObjectInstance::new(instance_id, template_vnum, ObjectLocation::InMobileInventory(character_id));
            world.instances.track_object(instance);
        }
        ResetOp::Door => {
            let room = RoomVnum(cmd.a2);
            let Some(direction) = core::constants::Direction::from_index(cmd.a3 as u8) else { return };
            let state = cmd.a4;
            world.db.with_room_mut(room, |template| {
                if let Some(exit) = template.exits.get_mut(&direction) {
                    use core::constants::DoorFlags;
                    exit.door_flags.remove(DoorFlags::CLOSED | DoorFlags::LOCKED);
                    match state {
                        1 => exit.door_flags.insert(DoorFlags::CLOSED),
                        2 => exit.door_flags.insert(DoorFlags::CLOSED | DoorFlags::LOCKED),
                        _ => {}
                    }
                }
            });
        }
        ResetOp::PutInContainer => {
            if !gate_passes(cmd.if_flag, cursor.current_container_succeeded) {
                return;
            }
            let Some(container_id) = cursor.current_container else { return };
            let template_vnum = ObjectVnum(cmd.a2);
            let instance_id = ObjectInstanceId::next();
            let instance = ObjectInstance::new(instance_id, template_vnum, ObjectLocation::InContainer(container_id));
            world.instances.track_object(instance);
            world.instances.update_object(container_id, |c| c.contents.push(instance_id));
        }
        ResetOp::RemoveFromRoom => {
            let room = RoomVnum(cmd.a2);
            let template_vnum = ObjectVnum(cmd.a3);
            for instance in world.instances.objects_in_room(room) {
                if instance.template == template_vnum {
                    world.instances.remove_object(instance.instance_id);
                    break;
                }
            }
        }
    }
}

fn gate_passes(if_flag: bool, previous_succeeded: bool) -> bool {
    !if_flag || previous_succeeded
}

fn spawn_mobile(
    world: &World,
    template_vnum: MobileVnum,
    room: RoomVnum,
    roller: &mut dyn DiceRoller,
) -> Option<(CharacterId, MobileInstanceId)> {
    let template = world.db.get_mobile_template(template_vnum)?;
    let instance_id = MobileInstanceId::next();
    let character_id = CharacterId::next();

    let instance = MobileInstance {
        instance_id,
        character_id,
        template: template_vnum,
        room,
        hit_points: template.max_hit_points,
        mana: 0,
        position: template.default_position,
        spawned_at_secs: now_secs(),
        active: true,
    };
    world.instances.track_mobile(instance);

    let mobile_character = crate::character::MobileCharacter {
        id: character_id,
        instance_id,
        template: template_vnum,
        name: template.short_description.clone(),
        room,
        position: template.default_position,
        hit_points: template.max_hit_points,
        max_hit_points: template.max_hit_points,
        armor_class: template.armor_class,
        abilities: template.abilities,
        level: template.level,
        fight_target: None,
        damage_dice: template.damage_dice,
        experience_award: template.experience,
        gold: roller.roll(0, template.gold.max(0) as i32) as i64,
        inventory: Vec::new(),
        equipment: std::collections::HashMap::new(),
    };
    world.spawn_character(crate::character::Character::Mobile(mobile_character));

    Some((character_id, instance_id))
}
