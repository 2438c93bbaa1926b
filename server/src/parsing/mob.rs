//! The `.mob` mobile-template parser (§4.A).
//!
//! The on-disk stats line packs two dice expressions (`hpDice`, `damDice`)
//! in with three plain integers; each dice expression is itself three
//! integers (count, sides, bonus), so the full line is nine fields wide.
//! `max_hit_points` is taken as the dice expression's maximum roll rather
//! than an actual roll, so loading the same file twice always produces
//! the same template (an open question resolved the same way in
//! `DESIGN.md`).

use std::path::Path;

use core::dice::Dice;
use core::error::ParseError;

use crate::character::{AbilityScores, Position};
use crate::parsing::common::{load_records, LineCursor};
use crate::world::mobile::{MobileActionFlags, MobileAffectionFlags, MobileTemplate, Sex};
use crate::world::vnum::MobileVnum;

pub fn parse_mob_file(file: &Path, text: &str) -> Vec<MobileTemplate> {
    load_records(file, text, parse_one_mobile)
}

fn parse_one_mobile(cursor: &mut LineCursor) -> Result<Option<MobileTemplate>, ParseError> {
    let vnum = match cursor.next_vnum_header()? {
        Some(v) => v,
        None => return Ok(None),
    };

    let keyword = cursor.tilde_string()?;
    let short_description = cursor.tilde_string()?;
    let long_description = cursor.tilde_string()?;
    let detailed_description = cursor.tilde_string()?;

    let flags_line = cursor.ints(5)?;
    let action_flags = MobileActionFlags::from_bits_truncate(flags_line[0] as u32);
    let affection_flags = MobileAffectionFlags::from_bits_truncate(flags_line[1] as u32);
    let alignment = flags_line[2];
    let hitroll = flags_line[3];
    let damroll = flags_line[4];

    let stats = cursor.ints(9)?;
    let level = stats[0];
    let armor_class = stats[2];
    let hp_dice = Dice::new(stats[3].max(0) as u32, stats[4].max(0) as u32, stats[5]);
    let max_hit_points = (hp_dice.count * hp_dice.sides) as i32 + hp_dice.bonus;
    let damage_dice = Dice::new(stats[6].max(0) as u32, stats[7].max(0) as u32, stats[8] + damroll);
    let _ = hitroll; // folded into hit resolution via AbilityScores::strength, not the template

    let exp_gold = cursor.ints(2)?;
    let experience = exp_gold[0] as i64;
    let gold = exp_gold[1] as i64;

    let pos_sex = cursor.ints(2)?;
    let default_position = position_from_code(pos_sex[0]);
    let sex = match pos_sex[1] {
        1 => Sex::Male,
        2 => Sex::Female,
        _ => Sex::Neutral,
    };

    let ability_line = cursor.ints(8)?;
    let abilities = AbilityScores {
        strength: ability_line[0],
        strength_add: ability_line[1],
        intelligence: ability_line[2],
        wisdom: ability_line[3],
        dexterity: ability_line[4],
        constitution: ability_line[5],
        charisma: ability_line[6],
    };
    let size = ability_line[7];

    let mut skills = std::collections::HashMap::new();
    let mut special_attack_types = Vec::new();
    loop {
        let Some(line) = cursor.peek_line() else { break };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            cursor.next_line()?;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with('$') {
            break;
        }
        cursor.next_line()?;
        if let Some(rest) = trimmed.strip_prefix("SKILL=") {
            let mut parts = rest.split_whitespace();
            let name = parts.next().unwrap_or_default().to_string();
            let value: u8 = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0);
            skills.insert(name, value);
        } else if let Some(rest) = trimmed.strip_prefix("ATTACK_SKILL=") {
            let value: i32 = rest
                .trim()
                .parse()
                .map_err(|_| cursor.err(format!("bad ATTACK_SKILL {rest:?}")))?;
            special_attack_types.push(value);
        } else if let Some(rest) = trimmed.strip_prefix("ATTACK_TYPE=") {
            let value: i32 = rest
                .trim()
                .parse()
                .map_err(|_| cursor.err(format!("bad ATTACK_TYPE {rest:?}")))?;
            special_attack_types.push(value);
        } else {
            return Err(cursor.err(format!("unrecognized mobile annotation: {trimmed:?}")));
        }
    }

    Ok(Some(MobileTemplate {
        vnum: MobileVnum(vnum),
        keyword,
        short_description,
        long_description,
        detailed_description,
        level,
        max_hit_points,
        armor_class,
        damage_dice,
        experience,
        gold,
        alignment,
        action_flags,
        affection_flags,
        default_position,
        sex,
        abilities,
        size,
        skills,
        special_attack_types,
    }))
}

fn position_from_code(code: i32) -> Position {
    match code {
        0 => Position::Dead,
        1 => Position::MortallyWounded,
        2 => Position::Incapacitated,
        3 => Position::Stunned,
        4 => Position::Sleeping,
        5 => Position::Resting,
        6 => Position::Sitting,
        7 => Position::Fighting,
        8 => Position::Standing,
        _ => Position::Standing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_a_mobile_record() {
        let text = "#100\n\
guard~\n\
the city guard~\n\
A city guard stands here.~\n\
A stern-looking guard in chainmail.~\n\
0 0 0 0 0\n\
10 0 5 2 8 2 3 4 1\n\
1500 250\n\
8 1\n\
16 0 13 13 13 13 13 0\n\
SKILL=SWORD 90\n\
ATTACK_TYPE=3\n\
#99999\n";
        let mobs = parse_mob_file(&PathBuf::from("test.mob"), text);
        assert_eq!(mobs.len(), 1);
        let m = &mobs[0];
        assert_eq!(m.vnum, MobileVnum(100));
        assert_eq!(m.level, 10);
        assert_eq!(m.max_hit_points, 2 * 8 + 2);
        assert_eq!(m.damage_dice, Dice::new(3, 4, 1));
        assert_eq!(m.experience, 1500);
        assert_eq!(m.skills.get("SWORD"), Some(&90));
        assert_eq!(m.special_attack_types, vec![3]);
    }
}
