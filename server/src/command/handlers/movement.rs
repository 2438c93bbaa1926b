//! Movement handlers (§4.I): one entry per compass direction, all
//! funneling into a shared `move_direction`.

use core::constants::Direction;

use crate::command::dispatcher::CommandContext;
use crate::world::room::Room;

pub(crate) fn describe_room(room: &Room) -> String {
    let mut out = format!("{}\r\n{}", room.template.name, room.template.description);
    let exits: Vec<&str> = Direction::ALL
        .iter()
        .filter(|d| room.exit(**d).map(|e| !e.is_closed()).unwrap_or(false))
        .map(|d| d.as_str())
        .collect();
    if exits.is_empty() {
        out.push_str("\r\nObvious exits: none.");
    } else {
        out.push_str(&format!("\r\nObvious exits: {}.", exits.join(", ")));
    }
    out
}

fn move_direction(ctx: &mut CommandContext, direction: Direction) -> anyhow::Result<()> {
    let Some(handle) = ctx.character() else { return Ok(()) };
    let current_room = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        character.room()
    };

    let destination = ctx.world.with_room(current_room, |room| {
        room.exit(direction).map(|exit| (exit.is_closed(), exit.destination))
    });

    match destination {
        None | Some(None) => ctx.say("Alas, you cannot go that way."),
        Some(Some((true, _))) => ctx.say("The door is closed."),
        Some(Some((false, to))) => {
            {
                let Ok(mut character) = handle.lock() else { return Ok(()) };
                character.set_room(to);
            }
            let name = character_name(ctx);
            ctx.world.move_character(ctx.character_id, current_room, to);
            ctx.world.broadcast_to_room(current_room, &format!("{name} leaves {}.", direction.as_str()));
            ctx.say(format!("You go {}.", direction.as_str()));
            if let Some(text) = ctx.world.with_room(to, describe_room) {
                ctx.say(text);
            }
            ctx.world.broadcast_to_room_except(to, ctx.character_id, &format!("{name} arrives."));
        }
    }
    Ok(())
}

fn character_name(ctx: &CommandContext) -> String {
    ctx.character()
        .and_then(|h| h.lock().ok().map(|c| c.name().to_string()))
        .unwrap_or_else(|| "Someone".to_string())
}

pub fn north(ctx: &mut CommandContext) -> anyhow::Result<()> {
    move_direction(ctx, Direction::North)
}
pub fn south(ctx: &mut CommandContext) -> anyhow::Result<()> {
    move_direction(ctx, Direction::South)
}
pub fn east(ctx: &mut CommandContext) -> anyhow::Result<()> {
    move_direction(ctx, Direction::East)
}
pub fn west(ctx: &mut CommandContext) -> anyhow::Result<()> {
    move_direction(ctx, Direction::West)
}
pub fn up(ctx: &mut CommandContext) -> anyhow::Result<()> {
    move_direction(ctx, Direction::Up)
}
pub fn down(ctx: &mut CommandContext) -> anyhow::Result<()> {
    move_direction(ctx, Direction::Down)
}
