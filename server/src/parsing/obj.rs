//! The `.obj` object-template parser (§4.A).

use std::path::Path;

use core::error::ParseError;

use crate::parsing::common::{load_records, LineCursor};
use crate::world::object::{ApplyType, ObjectExtraFlags, ObjectTemplate, ObjectType, WearFlags};
use crate::world::vnum::ObjectVnum;

pub fn parse_obj_file(file: &Path, text: &str) -> Vec<ObjectTemplate> {
    load_records(file, text, parse_one_object)
}

fn object_type_from_code(code: i32) -> Option<ObjectType> {
    use ObjectType::*;
    Some(match code {
        1 => Light,
        2 => Scroll,
        3 => Wand,
        4 => Staff,
        5 => Weapon,
        6 => Furniture,
        7 => Trash,
        8 => Container,
        9 => Note,
        10 => DrinkContainer,
        11 => Key,
        12 => Food,
        13 => Money,
        14 => Pen,
        15 => Boat,
        16 => Fountain,
        17 => Armor,
        18 => Potion,
        19 => Worn,
        20 => Other,
        21 => Portal,
        22 => Board,
        23 => Corpse,
        24 => Component,
        25 => Instrument,
        _ => return None,
    })
}

fn apply_type_from_code(code: i32) -> Option<ApplyType> {
    use ApplyType::*;
    Some(match code {
        0 => Strength,
        1 => Dexterity,
        2 => Intelligence,
        3 => Wisdom,
        4 => Constitution,
        5 => Charisma,
        6 => ArmorClass,
        7 => HitPoints,
        8 => Mana,
        9 => Hitroll,
        10 => Damroll,
        _ => return None,
    })
}

fn parse_one_object(cursor: &mut LineCursor) -> Result<Option<ObjectTemplate>, ParseError> {
    let vnum = match cursor.next_vnum_header()? {
        Some(v) => v,
        None => return Ok(None),
    };

    let keywords = cursor.tilde_string()?;
    let short_description = cursor.tilde_string()?;
    let long_description = cursor.tilde_string()?;
    let action_description = cursor.tilde_string()?;

    let type_line = cursor.ints_padded(4)?;
    let object_type = object_type_from_code(type_line[0]).ok_or_else(|| cursor.err(format!("unknown object type {}", type_line[0])))?;
    let extra_flags = ObjectExtraFlags::from_bits_truncate(type_line[1] as u32);
    let wear_flags = WearFlags::from_bits_truncate(type_line[2] as u32);

    let values = cursor.ints(4)?;
    let weight_cost = cursor.ints(3)?;

    let mut applies = std::collections::HashMap::new();
    let mut extra_descriptions = std::collections::HashMap::new();
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
        match trimmed {
            "A" => {
                cursor.next_line()?;
                let apply_line = cursor.ints(2)?;
                let apply_type = apply_type_from_code(apply_line[0]).ok_or_else(|| cursor.err(format!("unknown apply type {}", apply_line[0])))?;
                applies.insert(apply_type, apply_line[1]);
            }
            "E" => {
                cursor.next_line()?;
                let keywords = cursor.tilde_string()?;
                let description = cursor.tilde_string()?;
                extra_descriptions.insert(keywords, description);
            }
            _ => {
                return Err(cursor.err(format!("expected 'A' or 'E' block, got {trimmed:?}")));
            }
        }
    }

    Ok(Some(ObjectTemplate {
        vnum: ObjectVnum(vnum),
        keywords,
        short_description,
        long_description,
        action_description,
        object_type,
        extra_flags,
        wear_flags,
        values: [values[0], values[1], values[2], values[3]],
        weight: weight_cost[0],
        cost: weight_cost[1],
        rent_per_day: weight_cost[2],
        applies,
        extra_descriptions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_a_weapon_with_an_apply_and_extra_description() {
        let text = "#3010\n\
sword long~\n\
a long sword~\n\
A long sword lies here.~\n\
~\n\
5 0 8192\n\
3 8 2 3\n\
15 500 20\n\
A\n\
9 1\n\
E\n\
sword~\n\
It looks sharp.~\n\
#99999\n";
        let objs = parse_obj_file(&PathBuf::from("test.obj"), text);
        assert_eq!(objs.len(), 1);
        let o = &objs[0];
        assert_eq!(o.vnum, ObjectVnum(3010));
        assert_eq!(o.object_type, ObjectType::Weapon);
        assert_eq!(o.values, [3, 8, 2, 3]);
        assert_eq!(o.applies.get(&ApplyType::Hitroll), Some(&1));
        assert_eq!(o.extra_descriptions.get("sword").map(String::as_str), Some("It looks sharp."));
        assert_eq!(o.weapon_dice(), core::dice::Dice::new(8, 3, 2));
    }
}
