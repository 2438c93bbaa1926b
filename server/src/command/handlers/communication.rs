//! Speech (§4.I): `say` and its `'` shortcut broadcast to the speaker's
//! room, in the first person to the speaker and the third person to
//! everyone else.

use crate::command::dispatcher::CommandContext;

pub fn say(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let message = ctx.args.trim();
    if message.is_empty() {
        ctx.say("Say what?");
        return Ok(());
    }

    let Some(handle) = ctx.character() else { return Ok(()) };
    let (room, name) = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        (character.room(), character.name().to_string())
    };

    ctx.say(format!("You say, '{message}'"));
    ctx.world
        .broadcast_to_room_except(room, ctx.character_id, &format!("{name} says, '{message}'"));
    Ok(())
}

pub fn emote(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let action = ctx.args.trim();
    if action.is_empty() {
        ctx.say("Emote what?");
        return Ok(());
    }

    let Some(handle) = ctx.character() else { return Ok(()) };
    let (room, name) = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        (character.room(), character.name().to_string())
    };

    ctx.say(format!("{name} {action}"));
    ctx.world.broadcast_to_room_except(room, ctx.character_id, &format!("{name} {action}"));
    Ok(())
}
