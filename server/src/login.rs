//! The login flow (§6): drives a connection's [`Session`] through
//! `GetName` → `GetPassword`/`NewPlayerCreation` → `Playing`, one input
//! line at a time. Kept separate from [`crate::command::dispatcher`]
//! since login-phase lines aren't commands — there is no character to
//! dispatch against yet.

use crate::character::{AbilityScores, Character, OutboundSink, PlayerCharacter, Position};
use crate::players::{PlayerRecord, PlayerStore};
use crate::session::{normalize_name, valid_new_password, NewPlayerStage, Session, SessionState};
use crate::world::vnum::RoomVnum;
use crate::world::World;

/// What the connection's reader task must do in response to one
/// processed login line.
pub enum LoginOutcome {
    /// Keep reading; no change to telnet echo state.
    Continue,
    /// Toggle client-side echo (on for normal prompts, off for passwords).
    SetEcho(bool),
    /// Three bad password attempts, or another unrecoverable condition —
    /// close the connection after flushing replies.
    Disconnect,
}

const MAX_PASSWORD_ATTEMPTS: u8 = 3;

const BANNER: &str = "&CWelcome to the realm.&N\r\nBy what name do you wish to be known?";

pub fn send_banner(session: &Session) {
    session.send_line(BANNER);
}

/// Processes one raw input line against the session's current login
/// state. `starting_room` is where a freshly created or returning
/// character is placed.
pub fn process_line(
    session: &mut Session,
    line: &str,
    world: &World,
    players: &dyn PlayerStore,
    starting_room: RoomVnum,
) -> LoginOutcome {
    match session.state.clone() {
        SessionState::GetName => handle_get_name(session, line, players),
        SessionState::GetPassword { name, attempts_remaining } => {
            handle_get_password(session, line, players, world, &name, attempts_remaining, starting_room)
        }
        SessionState::NewPlayerCreation { name, stage } => {
            handle_new_player_creation(session, line, players, world, &name, stage, starting_room)
        }
        SessionState::Playing { .. } => LoginOutcome::Continue,
    }
}

fn handle_get_name(session: &mut Session, line: &str, players: &dyn PlayerStore) -> LoginOutcome {
    let Some(name) = normalize_name(line) else {
        session.send_line("Names must be 2-19 letters. By what name do you wish to be known?");
        return LoginOutcome::Continue;
    };

    if players.exists(&name) {
        session.state = SessionState::GetPassword {
            name,
            attempts_remaining: MAX_PASSWORD_ATTEMPTS,
        };
        session.send_line("Password:");
        LoginOutcome::SetEcho(false)
    } else {
        session.state = SessionState::NewPlayerCreation {
            name,
            stage: NewPlayerStage::ChoosePassword,
        };
        session.send_line("New character. Give me a password:");
        LoginOutcome::SetEcho(false)
    }
}

fn handle_get_password(
    session: &mut Session,
    line: &str,
    players: &dyn PlayerStore,
    world: &World,
    name: &str,
    attempts_remaining: u8,
    starting_room: RoomVnum,
) -> LoginOutcome {
    if players.check_password(name, line) {
        enter_world(session, world, players, name, starting_room);
        return LoginOutcome::SetEcho(true);
    }

    let remaining = attempts_remaining.saturating_sub(1);
    if remaining == 0 {
        session.send_line("Wrong password.");
        return LoginOutcome::Disconnect;
    }
    session.state = SessionState::GetPassword {
        name: name.to_string(),
        attempts_remaining: remaining,
    };
    session.send_line("Wrong password. Password:");
    LoginOutcome::Continue
}

fn handle_new_player_creation(
    session: &mut Session,
    line: &str,
    players: &dyn PlayerStore,
    world: &World,
    name: &str,
    stage: NewPlayerStage,
    starting_room: RoomVnum,
) -> LoginOutcome {
    match stage {
        NewPlayerStage::ChoosePassword => {
            if !valid_new_password(line) {
                session.send_line("Passwords must be 2-10 characters. Give me a password:");
                return LoginOutcome::Continue;
            }
            session.state = SessionState::NewPlayerCreation {
                name: name.to_string(),
                stage: NewPlayerStage::ConfirmPassword { password: line.to_string() },
            };
            session.send_line("Please retype the password:");
            LoginOutcome::Continue
        }
        NewPlayerStage::ConfirmPassword { password } => {
            if line != password {
                session.state = SessionState::NewPlayerCreation {
                    name: name.to_string(),
                    stage: NewPlayerStage::ChoosePassword,
                };
                session.send_line("Passwords didn't match. Give me a password:");
                return LoginOutcome::Continue;
            }
            players.save(PlayerRecord::new(name.to_string(), password, starting_room));
            enter_world(session, world, players, name, starting_room);
            LoginOutcome::SetEcho(true)
        }
    }
}

/// Loads or defaults the player's durable record, spawns their
/// `PlayerCharacter` into the world, and promotes the session.
fn enter_world(session: &mut Session, world: &World, players: &dyn PlayerStore, name: &str, starting_room: RoomVnum) {
    let record = players.load(name).unwrap_or_else(|| PlayerRecord::new(name.to_string(), String::new(), starting_room));

    let character_id = crate::ids::CharacterId::next();
    let outbound: OutboundSink = session.outbound.clone();
    let character = Character::Player(PlayerCharacter {
        id: character_id,
        name: record.name,
        room: record.last_room,
        position: Position::Standing,
        hit_points: record.hit_points,
        max_hit_points: record.max_hit_points,
        armor_class: record.armor_class,
        abilities: AbilityScores { ..record.abilities },
        level: record.level,
        fight_target: None,
        experience: record.experience,
        gold: record.gold,
        inventory: Vec::new(),
        equipment: std::collections::HashMap::new(),
        recent_deaths: record.recent_deaths,
        input_queue: std::collections::VecDeque::new(),
        outbound: Some(outbound),
    });

    world.spawn_character(character);
    session.promote(character_id);

    if let Some(text) = world.with_room(record.last_room, crate::command::handlers::movement::describe_room) {
        session.send_line(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::database::WorldDb;
    use tokio::sync::mpsc::unbounded_channel;

    fn test_world() -> World {
        World::new(WorldDb::new())
    }

    fn test_session() -> (Session, tokio::sync::mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        (Session::new(crate::ids::ConnectionId::next(), tx), rx)
    }

    #[test]
    fn unknown_name_starts_new_player_creation() {
        let (mut session, _rx) = test_session();
        let players = crate::players::InMemoryPlayerStore::new();
        let outcome = handle_get_name(&mut session, "Gandalf", &players);
        assert!(matches!(outcome, LoginOutcome::SetEcho(false)));
        assert!(matches!(session.state, SessionState::NewPlayerCreation { .. }));
    }

    #[test]
    fn three_failed_password_attempts_disconnects() {
        let (mut session, _rx) = test_session();
        let players = crate::players::InMemoryPlayerStore::new();
        players.save(PlayerRecord::new("Gandalf".to_string(), "secret".to_string(), RoomVnum(3001)));
        let world = test_world();

        session.state = SessionState::GetPassword {
            name: "Gandalf".to_string(),
            attempts_remaining: 3,
        };
        assert!(matches!(
            process_line(&mut session, "wrong", &world, &players, RoomVnum(3001)),
            LoginOutcome::Continue
        ));
        assert!(matches!(
            process_line(&mut session, "wrong", &world, &players, RoomVnum(3001)),
            LoginOutcome::Continue
        ));
        assert!(matches!(
            process_line(&mut session, "wrong", &world, &players, RoomVnum(3001)),
            LoginOutcome::Disconnect
        ));
    }

    #[test]
    fn correct_password_promotes_session() {
        let (mut session, _rx) = test_session();
        let players = crate::players::InMemoryPlayerStore::new();
        players.save(PlayerRecord::new("Gandalf".to_string(), "secret".to_string(), RoomVnum(3001)));
        let world = test_world();

        session.state = SessionState::GetPassword {
            name: "Gandalf".to_string(),
            attempts_remaining: 3,
        };
        let _ = process_line(&mut session, "secret", &world, &players, RoomVnum(3001));
        assert!(session.is_playing());
    }
}
