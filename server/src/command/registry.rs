//! The command registry (§4.H): name/alias maps with case-folded keys and
//! abbreviation resolution.

use std::collections::HashMap;

use crate::character::Position;
use crate::command::dispatcher::HandlerFn;

#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub min_position: Position,
    pub min_level: i32,
    pub allow_mobile: bool,
    pub enabled: bool,
    pub handler: HandlerFn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    Found(&'static str),
    Ambiguous,
    NotFound,
}

#[derive(Default)]
pub struct CommandRegistry {
    by_name: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration is additive; a duplicate primary name is a programmer
    /// error (§4.H), surfaced as a panic at startup rather than silently
    /// overwriting.
    pub fn register(&mut self, command: Command) {
        let key = command.name.to_ascii_lowercase();
        assert!(
            !self.by_name.contains_key(&key),
            "duplicate command name: {}",
            command.name
        );
        self.by_name.insert(key, command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.by_name.get(&name.to_ascii_lowercase())
    }

    /// Resolves a normalized query token per §4.H's four-step lookup.
    pub fn resolve(&self, query: &str) -> LookupResult {
        if query.is_empty() {
            return LookupResult::NotFound;
        }
        let q = query.to_ascii_lowercase();

        if let Some(cmd) = self.by_name.get(&q) {
            return LookupResult::Found(cmd.name);
        }
        if let Some(cmd) = self.by_name.values().find(|c| c.aliases.iter().any(|a| a.eq_ignore_ascii_case(&q))) {
            return LookupResult::Found(cmd.name);
        }

        let primary_hits: Vec<&'static str> = self
            .by_name
            .values()
            .filter(|c| c.name.to_ascii_lowercase().starts_with(&q))
            .map(|c| c.name)
            .collect();
        if primary_hits.len() == 1 {
            return LookupResult::Found(primary_hits[0]);
        }
        if primary_hits.len() > 1 {
            return LookupResult::Ambiguous;
        }

        let alias_hits: Vec<&'static str> = self
            .by_name
            .values()
            .filter(|c| c.aliases.iter().any(|a| a.to_ascii_lowercase().starts_with(&q)))
            .map(|c| c.name)
            .collect();
        match alias_hits.len() {
            0 => LookupResult::NotFound,
            1 => LookupResult::Found(alias_hits[0]),
            _ => LookupResult::Ambiguous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::dispatcher::CommandContext;

    fn noop(_ctx: &mut CommandContext) -> anyhow::Result<()> {
        Ok(())
    }

    fn registry_with(names: &[&'static str]) -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        for name in names {
            registry.register(Command {
                name,
                aliases: &[],
                min_position: Position::Dead,
                min_level: 0,
                allow_mobile: true,
                enabled: true,
                handler: noop,
            });
        }
        registry
    }

    #[test]
    fn exact_hit_wins_over_prefix() {
        let registry = registry_with(&["north", "no", "south"]);
        assert_eq!(registry.resolve("no"), LookupResult::Found("no"));
    }

    #[test]
    fn unambiguous_prefix_resolves() {
        let registry = registry_with(&["north", "no", "south"]);
        assert_eq!(registry.resolve("nor"), LookupResult::Found("north"));
    }

    #[test]
    fn ambiguous_prefix_resolves_to_nothing() {
        let registry = registry_with(&["north", "no", "south"]);
        assert_eq!(registry.resolve("n"), LookupResult::Ambiguous);
    }

    #[test]
    fn empty_query_is_not_found() {
        let registry = registry_with(&["north"]);
        assert_eq!(registry.resolve(""), LookupResult::NotFound);
    }
}
