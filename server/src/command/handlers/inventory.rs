//! Carrying, dropping and wearing objects (§3, §4.I).

use core::constants::WearSlot;

use crate::command::dispatcher::CommandContext;
use crate::command::handlers::look::object_short_description;
use crate::ids::ObjectInstanceId;
use crate::world::object::{ObjectInstance, ObjectLocation, WearFlags};
use crate::world::vnum::RoomVnum;

fn keyword_matches(template_keywords: &str, query: &str) -> bool {
    template_keywords
        .split_whitespace()
        .any(|k| k.to_ascii_lowercase().starts_with(&query.to_ascii_lowercase()))
}

fn object_keywords(ctx: &CommandContext, object: &ObjectInstance) -> String {
    if object.display_name.is_some() {
        "corpse".to_string()
    } else {
        ctx.world
            .db
            .get_object_template(object.template)
            .map(|t| t.keywords)
            .unwrap_or_default()
    }
}

pub fn inventory(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let Some(handle) = ctx.character() else { return Ok(()) };
    let items: Vec<ObjectInstanceId> = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        character.inventory().to_vec()
    };

    if items.is_empty() {
        ctx.say("You are carrying nothing.");
        return Ok(());
    }

    ctx.say("You are carrying:");
    for id in items {
        if let Some(object) = ctx.world.instances.get_object(id) {
            ctx.say(format!("  {}", object_short_description(ctx, &object)));
        }
    }
    Ok(())
}

/// Finds the first object at `room` whose keywords match `query`.
fn find_in_room(ctx: &CommandContext, room: RoomVnum, query: &str) -> Option<ObjectInstance> {
    ctx.world.instances.objects_in_room(room).into_iter().find(|o| {
        matches!(o.location, ObjectLocation::InRoom(r) if r == room) && keyword_matches(&object_keywords(ctx, o), query)
    })
}

fn find_in_inventory(ctx: &CommandContext, inventory: &[ObjectInstanceId], query: &str) -> Option<ObjectInstance> {
    inventory
        .iter()
        .filter_map(|id| ctx.world.instances.get_object(*id))
        .find(|o| keyword_matches(&object_keywords(ctx, o), query))
}

pub fn get(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let query = ctx.args.trim().to_string();
    if query.is_empty() {
        ctx.say("Get what?");
        return Ok(());
    }

    let Some(handle) = ctx.character() else { return Ok(()) };
    let room = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        character.room()
    };

    let Some(object) = find_in_room(ctx, room, &query) else {
        ctx.say("You don't see that here.");
        return Ok(());
    };

    ctx.world
        .instances
        .update_object(object.instance_id, |o| o.location = ObjectLocation::InMobileInventory(ctx.character_id));
    if let Ok(mut character) = handle.lock() {
        character.inventory_mut().push(object.instance_id);
    }
    ctx.say(format!("You get {}.", object_short_description(ctx, &object)));
    Ok(())
}

pub fn drop(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let query = ctx.args.trim().to_string();
    if query.is_empty() {
        ctx.say("Drop what?");
        return Ok(());
    }

    let Some(handle) = ctx.character() else { return Ok(()) };
    let (room, inventory) = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        (character.room(), character.inventory().to_vec())
    };

    let Some(object) = find_in_inventory(ctx, &inventory, &query) else {
        ctx.say("You aren't carrying that.");
        return Ok(());
    };

    if let Ok(mut character) = handle.lock() {
        character.inventory_mut().retain(|id| *id != object.instance_id);
    }
    ctx.world
        .instances
        .update_object(object.instance_id, |o| o.location = ObjectLocation::InRoom(room));
    ctx.say(format!("You drop {}.", object_short_description(ctx, &object)));
    Ok(())
}

/// Candidate wear slots for each `WearFlags` bit, in preference order; the
/// first unoccupied candidate wins (§3 mirrors the legacy "first free
/// finger" convention for paired slots).
fn candidate_slots(wear_flags: WearFlags) -> Vec<WearSlot> {
    let mut slots = Vec::new();
    if wear_flags.contains(WearFlags::FINGER) {
        slots.extend([WearSlot::FingerRight, WearSlot::FingerLeft]);
    }
    if wear_flags.contains(WearFlags::NECK) {
        slots.extend([WearSlot::Neck1, WearSlot::Neck2]);
    }
    if wear_flags.contains(WearFlags::BODY) {
        slots.push(WearSlot::Body);
    }
    if wear_flags.contains(WearFlags::HEAD) {
        slots.push(WearSlot::Head);
    }
    if wear_flags.contains(WearFlags::LEGS) {
        slots.push(WearSlot::Legs);
    }
    if wear_flags.contains(WearFlags::FEET) {
        slots.push(WearSlot::Feet);
    }
    if wear_flags.contains(WearFlags::HANDS) {
        slots.push(WearSlot::Hands);
    }
    if wear_flags.contains(WearFlags::ARMS) {
        slots.push(WearSlot::Arms);
    }
    if wear_flags.contains(WearFlags::SHIELD) {
        slots.push(WearSlot::Shield);
    }
    if wear_flags.contains(WearFlags::ABOUT) {
        slots.push(WearSlot::About);
    }
    if wear_flags.contains(WearFlags::WAIST) {
        slots.push(WearSlot::Waist);
    }
    if wear_flags.contains(WearFlags::WRIST) {
        slots.extend([WearSlot::WristRight, WearSlot::WristLeft]);
    }
    if wear_flags.contains(WearFlags::WIELD) {
        slots.push(WearSlot::Wield);
    }
    if wear_flags.contains(WearFlags::HOLD) {
        slots.push(WearSlot::Hold);
    }
    slots
}

fn wear_or_wield(ctx: &mut CommandContext, only_wield: bool) -> anyhow::Result<()> {
    let query = ctx.args.trim().to_string();
    if query.is_empty() {
        ctx.say(if only_wield { "Wield what?" } else { "Wear what?" });
        return Ok(());
    }

    let Some(handle) = ctx.character() else { return Ok(()) };
    let inventory = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        character.inventory().to_vec()
    };

    let Some(object) = find_in_inventory(ctx, &inventory, &query) else {
        ctx.say("You aren't carrying that.");
        return Ok(());
    };

    let Some(template) = ctx.world.db.get_object_template(object.template) else {
        ctx.say("You can't wear that.");
        return Ok(());
    };

    let candidates = if only_wield {
        vec![WearSlot::Wield]
    } else {
        candidate_slots(template.wear_flags)
    };
    if candidates.is_empty() {
        ctx.say("You can't wear that.");
        return Ok(());
    }

    let Ok(mut character) = handle.lock() else { return Ok(()) };
    let slot = candidates.iter().find(|s| !character.equipment().contains_key(*s)).copied();
    let Some(slot) = slot else {
        ctx.say("You have nowhere left to put that.");
        return Ok(());
    };

    character.inventory_mut().retain(|id| *id != object.instance_id);
    character.equipment_mut().insert(slot, object.instance_id);
    drop(character);
    ctx.world
        .instances
        .update_object(object.instance_id, |o| o.location = ObjectLocation::EquippedOnMobile(ctx.character_id));
    ctx.say(format!("You wear {}.", object_short_description(ctx, &object)));
    Ok(())
}

pub fn wear(ctx: &mut CommandContext) -> anyhow::Result<()> {
    wear_or_wield(ctx, false)
}

pub fn wield(ctx: &mut CommandContext) -> anyhow::Result<()> {
    wear_or_wield(ctx, true)
}

pub fn remove(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let query = ctx.args.trim().to_string();
    if query.is_empty() {
        ctx.say("Remove what?");
        return Ok(());
    }

    let Some(handle) = ctx.character() else { return Ok(()) };
    let Ok(mut character) = handle.lock() else { return Ok(()) };

    let found = character
        .equipment()
        .iter()
        .find(|(_, id)| {
            ctx.world
                .instances
                .get_object(**id)
                .map(|o| keyword_matches(&object_keywords(ctx, &o), &query))
                .unwrap_or(false)
        })
        .map(|(slot, id)| (*slot, *id));

    let Some((slot, object_id)) = found else {
        ctx.say("You aren't wearing that.");
        return Ok(());
    };

    character.equipment_mut().remove(&slot);
    character.inventory_mut().push(object_id);
    drop(character);
    ctx.world
        .instances
        .update_object(object_id, |o| o.location = ObjectLocation::InMobileInventory(ctx.character_id));
    if let Some(object) = ctx.world.instances.get_object(object_id) {
        ctx.say(format!("You remove {}.", object_short_description(ctx, &object)));
    }
    Ok(())
}
