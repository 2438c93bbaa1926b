//! The `.zon` zone-file parser (§4.A).

use std::path::Path;

use core::constants::ResetOp;
use core::error::ParseError;

use crate::parsing::common::{load_records, LineCursor};
use crate::world::vnum::{RoomVnum, ZoneVnum};
use crate::world::zone::{ResetCommand, ResetMode, Zone};

pub fn parse_zon_file(file: &Path, text: &str) -> Vec<Zone> {
    load_records(file, text, parse_one_zone)
}

fn reset_mode_from_code(code: i32) -> ResetMode {
    match code {
        0 => ResetMode::Never,
        1 => ResetMode::WhenEmpty,
        _ => ResetMode::Always,
    }
}

fn parse_one_zone(cursor: &mut LineCursor) -> Result<Option<Zone>, ParseError> {
    let vnum = match cursor.next_vnum_header()? {
        Some(v) => v,
        None => return Ok(None),
    };

    let name = cursor.tilde_string()?;
    let params = cursor.ints(6)?;
    let top_room = RoomVnum(params[0]);
    let lifespan_minutes = params[1];
    let reset_mode = reset_mode_from_code(params[2]);
    let min_level = params[3];
    let max_players = params[4];
    let reset_chance = 100u8;

    let mut reset_commands = Vec::new();
    loop {
        let Some(line) = cursor.peek_line() else { break };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            cursor.next_line()?;
            continue;
        }
        if trimmed == "S" || trimmed == "$~" || trimmed.starts_with('#') || trimmed.starts_with('$') {
            if trimmed == "S" {
                cursor.next_line()?;
            }
            break;
        }

        cursor.next_line()?;
        let mut parts = trimmed.split_whitespace();
        let op_letter = parts
            .next()
            .and_then(|t| t.chars().next())
            .ok_or_else(|| cursor.err("empty reset command line"))?;
        let op = ResetOp::from_letter(op_letter).ok_or_else(|| cursor.err(format!("unknown reset op {op_letter:?}")))?;
        let rest: Vec<i32> = parts
            .map(|t| t.parse::<i32>().map_err(|_| cursor.err(format!("bad integer field: {t:?}"))))
            .collect::<Result<_, _>>()?;
        if rest.is_empty() {
            return Err(cursor.err("reset command missing at least one argument"));
        }
        let if_flag = rest[0] != 0;
        let mut a = [0i32; 4];
        for (i, v) in rest.iter().skip(1).take(4).enumerate() {
            a[i] = *v;
        }
        reset_commands.push(ResetCommand {
            op,
            if_flag,
            a2: a[0],
            a3: a[1],
            a4: a[2],
            a5: a[3],
        });
    }

    Ok(Some(Zone {
        vnum: ZoneVnum(vnum),
        name,
        top_room,
        lifespan_minutes,
        reset_mode,
        reset_chance,
        max_players,
        min_level,
        reset_commands,
        last_reset_secs: 0,
        age_minutes: lifespan_minutes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use core::constants::ResetOp;

    #[test]
    fn parses_a_zone_with_reset_commands() {
        let text = "#30\n\
Midgaard City~\n\
3099 30 2 1 50 0\n\
* comment line is ignored\n\
M 0 3060 1 3001 0\n\
E 1 3010 16 0 0\n\
S\n\
#99999\n";
        let zones = parse_zon_file(&PathBuf::from("test.zon"), text);
        assert_eq!(zones.len(), 1);
        let z = &zones[0];
        assert_eq!(z.vnum, ZoneVnum(30));
        assert_eq!(z.top_room, RoomVnum(3099));
        assert_eq!(z.reset_mode, ResetMode::Always);
        assert_eq!(z.reset_commands.len(), 2);
        assert_eq!(z.reset_commands[0].op, ResetOp::LoadMobile);
        assert_eq!(z.reset_commands[0].mobile_vnum(), crate::world::vnum::MobileVnum(3060));
        assert_eq!(z.reset_commands[1].op, ResetOp::Equip);
        assert!(z.reset_commands[1].if_flag);
    }
}
