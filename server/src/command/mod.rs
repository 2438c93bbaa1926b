//! The command subsystem: registry, dispatcher, and handler
//! implementations, wired together by `build_default_registry`.

pub mod dispatcher;
pub mod handlers;
pub mod registry;

use crate::character::Position;
use registry::{Command, CommandRegistry};

/// Registers every command this build supports (§4.H). Compile-time
/// enumeration, not reflection (§9): the command set is closed.
pub fn build_default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register(Command {
        name: "north",
        aliases: &["n"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::movement::north,
    });
    registry.register(Command {
        name: "south",
        aliases: &["s"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::movement::south,
    });
    registry.register(Command {
        name: "east",
        aliases: &["e"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::movement::east,
    });
    registry.register(Command {
        name: "west",
        aliases: &["w"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::movement::west,
    });
    registry.register(Command {
        name: "up",
        aliases: &["u"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::movement::up,
    });
    registry.register(Command {
        name: "down",
        aliases: &["d"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::movement::down,
    });

    registry.register(Command {
        name: "look",
        aliases: &["l"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::look::look,
    });
    registry.register(Command {
        name: "examine",
        aliases: &["ex"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::look::examine,
    });

    registry.register(Command {
        name: "say",
        aliases: &[],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::communication::say,
    });
    registry.register(Command {
        name: "'",
        aliases: &[],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::communication::say,
    });
    registry.register(Command {
        name: "emote",
        aliases: &["em"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::communication::emote,
    });

    registry.register(Command {
        name: "inventory",
        aliases: &["i", "inv"],
        min_position: Position::Sleeping,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::inventory::inventory,
    });
    registry.register(Command {
        name: "get",
        aliases: &["take"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::inventory::get,
    });
    registry.register(Command {
        name: "drop",
        aliases: &[],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::inventory::drop,
    });
    registry.register(Command {
        name: "wear",
        aliases: &[],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::inventory::wear,
    });
    registry.register(Command {
        name: "wield",
        aliases: &[],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::inventory::wield,
    });
    registry.register(Command {
        name: "remove",
        aliases: &["unwield"],
        min_position: Position::Resting,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::inventory::remove,
    });

    registry.register(Command {
        name: "kill",
        aliases: &["attack"],
        min_position: Position::Standing,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::fighting::kill,
    });
    registry.register(Command {
        name: "flee",
        aliases: &[],
        min_position: Position::Fighting,
        min_level: 1,
        allow_mobile: true,
        enabled: true,
        handler: handlers::fighting::flee,
    });

    registry.register(Command {
        name: "score",
        aliases: &["sc"],
        min_position: Position::Sleeping,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::info::score,
    });
    registry.register(Command {
        name: "who",
        aliases: &[],
        min_position: Position::Sleeping,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::info::who,
    });
    registry.register(Command {
        name: "help",
        aliases: &["?"],
        min_position: Position::Dead,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::info::help,
    });
    registry.register(Command {
        name: "time",
        aliases: &[],
        min_position: Position::Sleeping,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::info::time,
    });
    registry.register(Command {
        name: "quit",
        aliases: &[],
        min_position: Position::Dead,
        min_level: 1,
        allow_mobile: false,
        enabled: true,
        handler: handlers::info::quit,
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_resolves_every_registered_primary_name() {
        let registry = build_default_registry();
        for name in [
            "north", "south", "east", "west", "up", "down", "look", "examine", "say", "emote", "inventory", "get",
            "drop", "wear", "wield", "remove", "kill", "flee", "score", "who", "help", "time", "quit",
        ] {
            assert!(registry.get(name).is_some(), "missing command: {name}");
        }
    }
}
