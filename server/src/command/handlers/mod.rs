//! Command handler implementations, grouped by concern.

pub mod communication;
pub mod fighting;
pub mod info;
pub mod inventory;
pub mod look;
pub mod movement;
