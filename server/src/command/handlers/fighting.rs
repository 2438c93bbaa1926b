//! Initiating and escaping combat (§4.I, §4.J). The exchange itself runs
//! on the game tick (`crate::tick`); these handlers only set or clear
//! `fight_target` and report immediate feedback.

use core::dice::ThreadRng;

use crate::character::Position;
use crate::combat;
use crate::command::dispatcher::CommandContext;

pub fn kill(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let query = ctx.args.trim().to_string();
    if query.is_empty() {
        ctx.say("Kill whom?");
        return Ok(());
    }

    let Some(handle) = ctx.character() else { return Ok(()) };
    let room = {
        let Ok(character) = handle.lock() else { return Ok(()) };
        character.room()
    };

    let target_id = ctx.world.occupants_of(room).into_iter().find(|&id| {
        id != ctx.character_id
            && ctx
                .world
                .characters
                .get(id)
                .and_then(|h| h.lock().ok().map(|c| c.name().to_ascii_lowercase().starts_with(&query.to_ascii_lowercase())))
                .unwrap_or(false)
    });

    let Some(target_id) = target_id else {
        ctx.say("They aren't here.");
        return Ok(());
    };

    let Ok(mut character) = handle.lock() else { return Ok(()) };
    if character.fight_target().is_some() {
        ctx.say("You are already fighting!");
        return Ok(());
    }
    character.set_fight_target(Some(target_id));
    character.set_position(Position::Fighting);
    drop(character);

    if let Some(target_handle) = ctx.world.characters.get(target_id) {
        if let Ok(mut target) = target_handle.lock() {
            if target.fight_target().is_none() {
                target.set_fight_target(Some(ctx.character_id));
                target.set_position(Position::Fighting);
            }
        }
    }

    ctx.say("You attack!");
    Ok(())
}

pub fn flee(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let mut roller = ThreadRng;
    let fled = combat::attempt_flee(ctx.world, ctx.character_id, &mut roller);
    if fled {
        ctx.say("You flee from combat!");
    }
    Ok(())
}
