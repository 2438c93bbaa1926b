//! Looking and examining (§4.I): `look` re-describes the current room or
//! a named target inside it; `examine` adds item detail.

use crate::command::dispatcher::CommandContext;
use crate::command::handlers::movement::describe_room;
use crate::world::object::{ObjectInstance, ObjectLocation};
use crate::world::vnum::RoomVnum;

pub(crate) fn object_short_description(ctx: &CommandContext, object: &ObjectInstance) -> String {
    if let Some((_, long)) = &object.display_name {
        return long.clone();
    }
    ctx.world
        .db
        .get_object_template(object.template)
        .map(|t| t.long_description)
        .unwrap_or_else(|| "something".to_string())
}

fn objects_here(ctx: &CommandContext, room: RoomVnum) -> Vec<ObjectInstance> {
    ctx.world
        .instances
        .objects_in_room(room)
        .into_iter()
        .filter(|o| matches!(o.location, ObjectLocation::InRoom(r) if r == room))
        .collect()
}

pub fn look(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let Some(handle) = ctx.character() else { return Ok(()) };
    let room = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        character.room()
    };

    let target = ctx.args.trim();
    if target.is_empty() {
        if let Some(text) = ctx.world.with_room(room, describe_room) {
            ctx.say(text);
        }
        for object in objects_here(ctx, room) {
            ctx.say(object_short_description(ctx, &object));
        }
        for other_id in ctx.world.occupants_of(room) {
            if other_id == ctx.character_id {
                continue;
            }
            if let Some(other) = ctx.world.characters.get(other_id) {
                if let Ok(other) = other.lock() {
                    ctx.say(format!("{} is here.", other.name()));
                }
            }
        }
        return Ok(());
    }

    for other_id in ctx.world.occupants_of(room) {
        if other_id == ctx.character_id {
            continue;
        }
        if let Some(other) = ctx.world.characters.get(other_id) {
            if let Ok(other) = other.lock() {
                if other.name().to_ascii_lowercase().starts_with(&target.to_ascii_lowercase()) {
                    ctx.say(format!("You look at {}.", other.name()));
                    return Ok(());
                }
            }
        }
    }

    for object in objects_here(ctx, room) {
        if let Some(template) = ctx.world.db.get_object_template(object.template) {
            if template.keywords.to_ascii_lowercase().contains(&target.to_ascii_lowercase()) {
                ctx.say(object_short_description(ctx, &object));
                return Ok(());
            }
        } else if object.is_corpse() {
            ctx.say(object_short_description(ctx, &object));
            return Ok(());
        }
    }

    ctx.say("You don't see that here.");
    Ok(())
}

pub fn examine(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let Some(handle) = ctx.character() else { return Ok(()) };
    let room = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        character.room()
    };

    let target = ctx.args.trim().to_ascii_lowercase();
    if target.is_empty() {
        ctx.say("Examine what?");
        return Ok(());
    }

    for object in objects_here(ctx, room) {
        let Some(template) = ctx.world.db.get_object_template(object.template) else { continue };
        if template.keywords.to_ascii_lowercase().contains(&target) {
            ctx.say(template.action_description.clone());
            if !object.contents.is_empty() {
                ctx.say("It contains:".to_string());
                for content_id in &object.contents {
                    if let Some(content) = ctx.world.instances.get_object(*content_id) {
                        ctx.say(format!("  {}", object_short_description(ctx, &content)));
                    }
                }
            }
            return Ok(());
        }
    }

    ctx.say("You don't see that here.");
    Ok(())
}
