//! Session state machine (§4.G, §6 login flow). Grounded on the teacher's
//! `player.rs`, generalized from a single fixed `Player` record's `state`
//! field to an explicit enum the dispatcher can match on.

use std::collections::VecDeque;

use crate::character::OutboundSink;
use crate::ids::{CharacterId, ConnectionId};

#[derive(Debug, Clone)]
pub enum SessionState {
    GetName,
    GetPassword { name: String, attempts_remaining: u8 },
    NewPlayerCreation { name: String, stage: NewPlayerStage },
    Playing { character_id: CharacterId },
}

#[derive(Debug, Clone)]
pub enum NewPlayerStage {
    ChoosePassword,
    ConfirmPassword { password: String },
}

pub struct Session {
    pub connection_id: ConnectionId,
    pub state: SessionState,
    pub outbound: OutboundSink,
    pub input_queue: VecDeque<String>,
    pub welcomed: bool,
}

impl Session {
    pub fn new(connection_id: ConnectionId, outbound: OutboundSink) -> Self {
        Session {
            connection_id,
            state: SessionState::GetName,
            outbound,
            input_queue: VecDeque::new(),
            welcomed: false,
        }
    }

    pub fn send_line(&self, line: &str) {
        let _ = self.outbound.send(line.to_string());
    }

    pub fn push_input(&mut self, line: String) {
        self.input_queue.push_back(line);
    }

    pub fn drain_input(&mut self) -> Option<String> {
        self.input_queue.pop_front()
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, SessionState::Playing { .. })
    }

    pub fn character_id(&self) -> Option<CharacterId> {
        match self.state {
            SessionState::Playing { character_id } => Some(character_id),
            _ => None,
        }
    }

    /// Promotes this session to `Playing`, sending the welcome banner on
    /// first promotion only (§4.G).
    pub fn promote(&mut self, character_id: CharacterId) {
        self.state = SessionState::Playing { character_id };
        if !self.welcomed {
            self.send_line("Welcome to the realm!");
            self.welcomed = true;
        }
    }
}

/// Validates a candidate player name per §6: 2..19 characters, all
/// alphabetic, first character normalized to uppercase.
pub fn normalize_name(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if !(2..=19).contains(&trimmed.chars().count()) {
        return None;
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut chars = trimmed.chars();
    let first = chars.next()?.to_ascii_uppercase();
    Some(std::iter::once(first).chain(chars.map(|c| c.to_ascii_lowercase())).collect())
}

/// Validates a new-player password per §6: 2..10 characters.
pub fn valid_new_password(input: &str) -> bool {
    (2..=10).contains(&input.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_a_valid_name() {
        assert_eq!(normalize_name("gandalf"), Some("Gandalf".to_string()));
        assert_eq!(normalize_name("AL"), Some("Al".to_string()));
    }

    #[test]
    fn rejects_names_outside_bounds_or_with_digits() {
        assert_eq!(normalize_name("a"), None);
        assert_eq!(normalize_name("a2345678901234567890"), None);
        assert_eq!(normalize_name("gan7dalf"), None);
    }

    #[test]
    fn password_length_bounds() {
        assert!(valid_new_password("ok"));
        assert!(!valid_new_password("o"));
        assert!(!valid_new_password("01234567890"));
    }
}
