//! The MUD server process: world model, parsing, combat, command
//! dispatch, telnet handling and connection wiring, all reachable here
//! so both `main.rs` and the integration tests can address them.

pub mod character;
pub mod combat;
pub mod command;
pub mod config;
pub mod connection;
pub mod ids;
pub mod login;
pub mod parsing;
pub mod players;
pub mod reset;
pub mod server;
pub mod session;
pub mod telnet;
pub mod tick;
pub mod world;
