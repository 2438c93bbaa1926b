//! Runtime configuration (SPEC_FULL.md's Configuration section): a
//! TOML file layered under CLI flags and environment variables, in that
//! increasing order of precedence, mirroring the teacher's
//! `dotenvy` + `clap` + `serde`/`toml` stack.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::world::vnum::RoomVnum;

fn default_bind() -> SocketAddr {
    "0.0.0.0:4000".parse().unwrap()
}
fn default_areas() -> PathBuf {
    PathBuf::from("areas")
}
fn default_starting_room() -> i32 {
    3001
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Everything the server reads at startup. Fields default so a bare
/// `server.toml` (or none at all) still produces a runnable config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(with = "socket_addr_as_string")]
    pub bind: SocketAddr,
    pub areas: PathBuf,
    pub starting_room: i32,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: default_bind(),
            areas: default_areas(),
            starting_room: default_starting_room(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn starting_room_vnum(&self) -> RoomVnum {
        RoomVnum(self.starting_room)
    }

    /// Loads `path` if it exists, falling back to defaults otherwise —
    /// a missing config file is not an error (§ ambient Configuration).
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        Ok(config)
    }
}

mod socket_addr_as_string {
    use std::net::SocketAddr;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SocketAddr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/server.toml")).unwrap();
        assert_eq!(config.bind, default_bind());
        assert_eq!(config.starting_room, 3001);
    }

    #[test]
    fn starting_room_vnum_wraps_configured_value() {
        let config = Config::default();
        assert_eq!(config.starting_room_vnum(), RoomVnum(3001));
    }
}
