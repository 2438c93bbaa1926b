//! The command dispatcher (§4.I): one call processes one input line.

use core::constants::legacy_command_id;

use crate::character::Character;
use crate::command::registry::{CommandRegistry, LookupResult};
use crate::connection::ConnectionManager;
use crate::ids::{CharacterId, ConnectionId};
use crate::world::World;

pub type HandlerFn = fn(&mut CommandContext) -> anyhow::Result<()>;

/// Everything a handler needs: which character issued the command, the
/// raw argument string, the legacy numeric id, and shared world access.
pub struct CommandContext<'a> {
    pub world: &'a World,
    pub character_id: CharacterId,
    pub args: String,
    pub legacy_id: i32,
    pub reply: Vec<String>,
    /// Set by `quit` to tell the caller the session should be torn down
    /// after this line's replies are flushed.
    pub disconnect: bool,
}

impl<'a> CommandContext<'a> {
    pub fn say(&mut self, line: impl Into<String>) {
        self.reply.push(line.into());
    }

    pub fn character(&self) -> Option<std::sync::Arc<std::sync::Mutex<Character>>> {
        self.world.characters.get(self.character_id)
    }
}

/// Parses one line of input and invokes the resolved handler, writing
/// every reply line directly to the character's own outbound channel.
/// Mirrors §4.I steps 1-8; never panics on malformed input.
pub fn dispatch(
    registry: &CommandRegistry,
    world: &World,
    connections: &ConnectionManager,
    connection_id: ConnectionId,
    character_id: CharacterId,
    raw_line: &str,
) -> bool {
    let trimmed = raw_line.trim();
    if trimmed.is_empty() {
        return false;
    }

    let (query, args) = split_command(trimmed);

    let resolved_name = match registry.resolve(&query) {
        LookupResult::Found(name) => name,
        LookupResult::Ambiguous => {
            send_to_character(world, character_id, "Which one? Be more specific.");
            return false;
        }
        LookupResult::NotFound => {
            send_to_character(world, character_id, &format!("Huh? '{query}' is not a command."));
            return false;
        }
    };
    let command = registry.get(resolved_name).expect("resolved name must exist in registry");

    if !command.enabled {
        send_to_character(world, character_id, "That command isn't available right now.");
        return false;
    }

    let Some(handle) = world.characters.get(character_id) else { return false };
    let (position, level, is_player) = {
        let Ok(character) = handle.lock() else { return false };
        (character.position(), character.level(), character.is_player())
    };

    if !is_player && !command.allow_mobile {
        return false;
    }

    if position < command.min_position {
        send_to_character(
            world,
            character_id,
            &format!("You can't do that while you're {}.", position.name()),
        );
        return false;
    }

    if level < command.min_level {
        send_to_character(world, character_id, "You are not experienced enough to do that.");
        return false;
    }

    connections.record_activity(connection_id);
    if connections.is_rate_limited(connection_id) {
        send_to_character(world, character_id, "Please slow down.");
        return false;
    }

    let legacy_id = legacy_command_id(resolved_name);
    let mut ctx = CommandContext {
        world,
        character_id,
        args: args.to_string(),
        legacy_id,
        reply: Vec::new(),
        disconnect: false,
    };

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (command.handler)(&mut ctx)));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            log::warn!("handler fault in '{resolved_name}' for character {character_id}: {e}");
            ctx.reply.push("An error occurred.".to_string());
        }
        Err(_) => {
            log::warn!("handler panic in '{resolved_name}' for character {character_id}");
            ctx.reply.push("An error occurred.".to_string());
        }
    }

    let disconnect = ctx.disconnect;
    for line in ctx.reply {
        send_to_character(world, character_id, &line);
    }
    disconnect
}

fn send_to_character(world: &World, character_id: CharacterId, line: &str) {
    if let Some(handle) = world.characters.get(character_id) {
        if let Ok(character) = handle.lock() {
            character.send_line(line);
        }
    }
}

/// Splits the trimmed line into a command query and the remainder. A
/// leading `'` is the speech shortcut (§4.I step 2).
fn split_command(trimmed: &str) -> (String, &str) {
    if let Some(rest) = trimmed.strip_prefix('\'') {
        return ("'".to_string(), rest);
    }
    match trimmed.find(char::is_whitespace) {
        Some(idx) => (trimmed[..idx].to_string(), trimmed[idx..].trim_start()),
        None => (trimmed.to_string(), ""),
    }
}

/// Fill words ignored by targeting commands (§4.I).
pub const FILL_WORDS: &[&str] = &["a", "an", "the", "at", "in", "on", "with", "by", "for", "of", "to", "from"];

/// Pops the next whitespace-delimited token, respecting double-quoted
/// spans. Returns `(token, rest)`.
pub fn one_argument(input: &str) -> (String, &str) {
    let input = input.trim_start();
    if let Some(rest) = input.strip_prefix('"') {
        if let Some(end) = rest.find('"') {
            return (rest[..end].to_string(), rest[end + 1..].trim_start());
        }
        return (rest.to_string(), "");
    }
    match input.find(char::is_whitespace) {
        Some(idx) => (input[..idx].to_string(), input[idx..].trim_start()),
        None => (input.to_string(), ""),
    }
}

/// Splits on the first whitespace without token recognition.
pub fn half_chop(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], input[idx..].trim_start()),
        None => (input, ""),
    }
}

/// Case-insensitive prefix match.
pub fn is_abbreviation(query: &str, full: &str) -> bool {
    !query.is_empty() && full.to_ascii_lowercase().starts_with(&query.to_ascii_lowercase())
}

/// Accepts an optional leading sign followed by digits.
pub fn is_number(token: &str) -> bool {
    let token = token.strip_prefix(['+', '-']).unwrap_or(token);
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

pub fn strip_fill_words(input: &str) -> String {
    input
        .split_whitespace()
        .filter(|tok| !FILL_WORDS.contains(&tok.to_ascii_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_shortcut_splits_on_leading_quote() {
        assert_eq!(split_command("'hello there"), ("'".to_string(), "hello there"));
    }

    #[test]
    fn one_argument_respects_quotes() {
        assert_eq!(one_argument("\"the rusty sword\" on table"), ("the rusty sword".to_string(), "on table"));
    }

    #[test]
    fn is_number_accepts_sign() {
        assert!(is_number("-5"));
        assert!(is_number("42"));
        assert!(!is_number("4a"));
        assert!(!is_number(""));
    }

    #[test]
    fn fill_words_are_stripped() {
        assert_eq!(strip_fill_words("get the sword from the chest"), "get sword chest");
    }
}
