//! Informational commands (§4.I): score, who, help, time, quit.

use crate::command::dispatcher::CommandContext;

pub fn score(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let Some(handle) = ctx.character() else { return Ok(()) };
    let Ok(character) = handle.lock() else { return Ok(()) };

    ctx.say(format!("You are {}, level {}.", character.name(), character.level()));
    ctx.say(format!("Hit points: {}/{}", character.hit_points(), character.max_hit_points()));
    ctx.say(format!("Armor class: {}", character.armor_class()));
    ctx.say(format!("Experience: {}", character.experience()));
    ctx.say(format!("Gold: {}", character.gold()));
    ctx.say(format!("Position: {}", character.position().name()));
    Ok(())
}

pub fn who(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let mut names: Vec<String> = ctx
        .world
        .characters
        .all_ids()
        .into_iter()
        .filter_map(|id| ctx.world.characters.get(id))
        .filter_map(|h| h.lock().ok().map(|c| (c.is_player(), c.level(), c.name().to_string())))
        .filter(|(is_player, ..)| *is_player)
        .map(|(_, level, name)| format!("[{level:3}] {name}"))
        .collect();

    if names.is_empty() {
        ctx.say("No one is currently connected.");
        return Ok(());
    }

    names.sort();
    ctx.say("Players online:");
    for line in names {
        ctx.say(line);
    }
    Ok(())
}

const HELP_TEXT: &str = "\
Available commands: north, south, east, west, up, down, look, examine, \
say, emote, inventory, get, drop, wear, wield, remove, kill, flee, score, \
who, time, quit, help.";

pub fn help(ctx: &mut CommandContext) -> anyhow::Result<()> {
    ctx.say(HELP_TEXT);
    Ok(())
}

pub fn time(ctx: &mut CommandContext) -> anyhow::Result<()> {
    let now = chrono::Utc::now();
    ctx.say(format!("The current time is {}.", now.format("%H:%M:%S on %Y-%m-%d")));
    Ok(())
}

pub fn quit(ctx: &mut CommandContext) -> anyhow::Result<()> {
    ctx.say("Goodbye.");
    ctx.disconnect = true;
    Ok(())
}
