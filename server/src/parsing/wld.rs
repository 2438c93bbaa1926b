//! The `.wld` room-file parser (§4.A).

use std::path::Path;

use core::constants::{Direction, DoorFlags, RoomFlags, SectorType};
use core::error::ParseError;

use crate::parsing::common::{load_records, LineCursor};
use crate::world::room::{Exit, RoomTemplate};
use crate::world::vnum::{RoomVnum, ZoneVnum};

pub fn parse_wld_file(file: &Path, text: &str) -> Vec<RoomTemplate> {
    load_records(file, text, parse_one_room)
}

fn parse_one_room(cursor: &mut LineCursor) -> Result<Option<RoomTemplate>, ParseError> {
    let vnum = match cursor.next_vnum_header()? {
        Some(v) => v,
        None => return Ok(None),
    };

    let name = cursor.tilde_string()?;
    let description = cursor.tilde_string()?;

    let stats = cursor.ints(6)?;
    let zone = stats[0];
    let flags = RoomFlags::from_bits_truncate(stats[1] as u32);
    let sector = SectorType::from_code(stats[2]).ok_or_else(|| cursor.err(format!("unknown sector type {}", stats[2])))?;
    let light_level = stats[3];
    let mana_regen = stats[4];
    let hp_regen = stats[5];

    let mut exits = std::collections::HashMap::new();
    loop {
        let line = cursor
            .peek_line()
            .ok_or_else(|| cursor.err("unterminated room record (expected 'S')"))?;
        let trimmed = line.trim();
        if trimmed == "S" {
            cursor.next_line()?;
            break;
        }
        if let Some(rest) = trimmed.strip_prefix('D') {
            cursor.next_line()?;
            let index: u8 = rest
                .trim()
                .parse()
                .map_err(|_| cursor.err(format!("bad exit index {rest:?}")))?;
            let direction = Direction::from_index(index).ok_or_else(|| cursor.err(format!("exit index {index} out of range")))?;
            let exit_name = cursor.tilde_string()?;
            let exit_description = cursor.tilde_string()?;
            let door_stats = cursor.ints(3)?;
            let door_flags = DoorFlags::from_bits_truncate(door_stats[0] as u16);
            let key_vnum = door_stats[1];
            let destination = RoomVnum(door_stats[2]);
            exits.insert(
                direction,
                Exit {
                    direction,
                    destination,
                    name: if exit_name.is_empty() { None } else { Some(exit_name) },
                    description: if exit_description.is_empty() { None } else { Some(exit_description) },
                    door_flags,
                    key_vnum,
                },
            );
            continue;
        }
        return Err(cursor.err(format!("expected 'D<n>' or 'S', got {trimmed:?}")));
    }

    Ok(Some(RoomTemplate {
        vnum: RoomVnum(vnum),
        name,
        description,
        zone: ZoneVnum(zone),
        flags,
        sector,
        light_level,
        mana_regen,
        hp_regen,
        min_level: 0,
        exits,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_a_room_with_one_exit() {
        let text = "#3001\n\
The Temple of Midgaard~\n\
You are standing in the south side of the Temple Square.\n\
With the fountain to your north.~\n\
30 0 1 0 0 0\n\
D0\n\
~\n\
~\n\
1 -1 3054\n\
S\n\
#99999\n";
        let rooms = parse_wld_file(&PathBuf::from("test.wld"), text);
        assert_eq!(rooms.len(), 1);
        let room = &rooms[0];
        assert_eq!(room.vnum, RoomVnum(3001));
        assert_eq!(room.name, "The Temple of Midgaard");
        assert!(room.description.contains("fountain"));
        assert_eq!(room.zone, ZoneVnum(30));
        assert_eq!(room.sector, SectorType::City);
        let north = room.exits.get(&Direction::North).unwrap();
        assert_eq!(north.destination, RoomVnum(3054));
        assert!(north.door_flags.contains(DoorFlags::EXISTS));
    }

    #[test]
    fn skips_a_malformed_record_and_keeps_the_next() {
        let text = "#1\nBroken~\nBroken desc~\nnot integers\nS\n#2\nGood Room~\nA fine room.~\n0 0 0 0 0 0\nS\n#99999\n";
        let rooms = parse_wld_file(&PathBuf::from("test.wld"), text);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].vnum, RoomVnum(2));
    }
}
