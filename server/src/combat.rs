//! Combat engine (§4.J). Grounded on the teacher's `state/combat.rs` and
//! `state/death.rs` (hit-roll-then-damage-roll shape, corpse creation on
//! death) but reworked around THAC0/armor-class resolution and the
//! injectable [`DiceRoller`](core::dice::DiceRoller) instead of bare
//! `rand::random` calls, so outcomes are reproducible in tests (§9).

use core::dice::DiceRoller;

use crate::character::{strength_damage_bonus, strength_hit_bonus, Character, Position};
use crate::ids::{CharacterId, MobileInstanceId, ObjectInstanceId};
use crate::world::object::{ObjectInstance, ObjectLocation};
use crate::world::vnum::RoomVnum;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    CriticalHit,
    Hit,
    Miss,
    CriticalMiss,
}

/// THAC0 for a character of `level` (§4.J): "to hit armor class 0".
pub fn thac0(level: i32) -> i32 {
    (20 - (level - 1)).max(1)
}

/// Resolves one attack roll. `attacker_strength`/`defender_armor_class`
/// are passed explicitly so this stays pure and easy to test.
pub fn resolve_hit(attacker_level: i32, attacker_strength: i32, defender_armor_class: i32, roller: &mut dyn DiceRoller) -> HitOutcome {
    let roll = roller.roll(1, 20);
    if roll == 20 {
        return HitOutcome::CriticalHit;
    }
    if roll == 1 {
        return HitOutcome::CriticalMiss;
    }
    let hit_bonus = strength_hit_bonus(attacker_strength);
    let target_number = thac0(attacker_level) - defender_armor_class - hit_bonus;
    if roll <= target_number {
        HitOutcome::Hit
    } else {
        HitOutcome::Miss
    }
}

/// Computes total damage for a hit (§4.J). `weapon` is the wielded
/// weapon's dice, if any; bare hands deal a flat `1..2`.
pub fn resolve_damage(strength: i32, weapon: Option<core::dice::Dice>, critical: bool, roller: &mut dyn DiceRoller) -> i32 {
    let base = match weapon {
        Some(dice) => dice.roll(roller),
        None => roller.roll(1, 2),
    };
    let str_bonus = strength_damage_bonus(strength);
    let mut total = base + str_bonus;
    if critical {
        total *= 2;
    }
    total.max(1)
}

/// Initiative for round ordering (§4.J): `dexterity + uniform 1..10`,
/// descending; ties keep their original (insertion) order since a stable
/// sort is used by the caller.
pub fn initiative(dexterity: i32, roller: &mut dyn DiceRoller) -> i32 {
    dexterity + roller.roll(1, 10)
}

/// Sorts `combatants` (character ids paired with their dexterity) by
/// initiative, descending, stably.
pub fn order_round(combatants: &mut [(CharacterId, i32)], roller: &mut dyn DiceRoller) {
    let scored: Vec<(CharacterId, i32, i32)> = combatants
        .iter()
        .map(|&(id, dex)| (id, dex, initiative(dex, roller)))
        .collect();
    let mut indexed: Vec<usize> = (0..scored.len()).collect();
    indexed.sort_by_key(|&i| std::cmp::Reverse(scored[i].2));
    for (slot, &i) in indexed.iter().enumerate() {
        combatants[slot] = (scored[i].0, scored[i].1);
    }
}

/// Success chance for fleeing (§4.J): `min(95, 50 + (dex - 13) * 5)`.
pub fn flee_chance_percent(dexterity: i32) -> i32 {
    (50 + (dexterity - 13) * 5).min(95).max(0)
}

/// Attempts to flee the current room. Returns `true` and relocates the
/// character on success; on failure (or no exits) sends "You can't
/// escape!" and returns `false`.
pub fn attempt_flee(world: &World, character_id: CharacterId, roller: &mut dyn DiceRoller) -> bool {
    let Some(handle) = world.characters.get(character_id) else { return false };
    let (room, dexterity) = {
        let Ok(character) = handle.lock() else { return false };
        (character.room(), character.abilities().dexterity)
    };

    // Fleeing may use any exit regardless of door state (DESIGN.md Open
    // Question 3) — no `is_closed()` filter here.
    let exits: Vec<(core::constants::Direction, RoomVnum)> = world
        .with_room(room, |r| r.template.exits.iter().map(|(d, exit)| (*d, exit.destination)).collect())
        .unwrap_or_default();

    if exits.is_empty() || roller.roll(1, 100) > flee_chance_percent(dexterity) {
        world.send_line(character_id, "You can't escape!");
        return false;
    }

    let index = roller.roll(0, exits.len() as i32 - 1) as usize;
    let destination = exits[index].1;

    if let Ok(mut character) = handle.lock() {
        character.set_room(destination);
        character.set_fight_target(None);
    }
    world.move_character(character_id, room, destination);
    true
}

/// Player newbie protection cutoff (§4.J).
const NEWBIE_LEVEL: i32 = 5;

fn corpse_decay_minutes(is_player: bool, level: i32) -> i64 {
    if is_player {
        if level <= NEWBIE_LEVEL {
            60
        } else {
            30
        }
    } else {
        5
    }
}

fn experience_penalty(level: i32, experience: i64) -> i64 {
    if level <= NEWBIE_LEVEL {
        (experience / 20).min(100)
    } else {
        (experience / 10).min(level as i64 * 1000)
    }
    .max(0)
}

/// Transitions a character to death (§4.J): drops a corpse with the
/// victim's inventory and gold, applies the experience penalty for
/// players, and zeroes the victim's gold.
pub fn handle_death(world: &World, victim_id: CharacterId, now_secs: u64) {
    let Some(handle) = world.characters.get(victim_id) else { return };
    let (room, is_player, level, inventory, gold, name, mobile_instance_id) = {
        let Ok(mut character) = handle.lock() else { return };
        character.set_position(Position::Dead);
        let inventory = character.take_inventory();
        let gold = character.gold();
        character.set_gold(0);
        let mobile_instance_id: Option<MobileInstanceId> = match &mut *character {
            Character::Player(p) => {
                let penalty = experience_penalty(p.level, p.experience);
                p.experience = (p.experience - penalty).max(0);
                None
            }
            Character::Mobile(m) => Some(m.instance_id),
        };
        (
            character.room(),
            character.is_player(),
            character.level(),
            inventory,
            gold,
            character.name().to_string(),
            mobile_instance_id,
        )
    };

    let corpse_id = ObjectInstanceId::next();
    let decay_at = now_secs + (corpse_decay_minutes(is_player, level) as u64) * 60;
    let mut corpse = ObjectInstance::new_corpse(corpse_id, ObjectLocation::InRoom(room), &name);
    corpse.contents = inventory;
    corpse.decay_at_secs = Some(decay_at);
    world.instances.track_object(corpse);

    log::info!("{name} has died in room {room} with {gold} gold; corpse {corpse_id} created");

    // Mobiles leave no body to reconnect to: drop the instance immediately so
    // the reset cap and template count recover, and vacate the room.
    if let Some(instance_id) = mobile_instance_id {
        world.instances.remove_mobile(instance_id);
        world.despawn_character(victim_id, room);
    }
}

/// Restores a dead character to life (§4.J). Legal only while
/// `Position::Dead`; scales HP recovery by recent-death count.
pub fn resurrect(world: &World, character_id: CharacterId) -> bool {
    let Some(handle) = world.characters.get(character_id) else { return false };
    let Ok(mut character) = handle.lock() else { return false };
    if character.position() != Position::Dead {
        return false;
    }
    let recent_deaths = match &*character {
        Character::Player(p) => p.recent_deaths,
        Character::Mobile(_) => 0,
    };
    let percent = (50 - recent_deaths as i32 * 10).max(10);
    let max_hp = character.max_hit_points();
    character.set_hit_points((max_hp * percent / 100).max(1));
    character.set_position(Position::Standing);
    if let Character::Player(p) = &mut *character {
        p.recent_deaths += 1;
    }
    drop(character);
    world.send_line(character_id, "You feel less healthy.");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::dice::{Dice, ScriptedRng};

    #[test]
    fn thac0_floors_at_one() {
        assert_eq!(thac0(1), 20);
        assert_eq!(thac0(25), 1);
    }

    #[test]
    fn natural_twenty_always_hits() {
        let mut roller = ScriptedRng::new(vec![20]);
        assert_eq!(resolve_hit(1, 8, 10, &mut roller), HitOutcome::CriticalHit);
    }

    #[test]
    fn natural_one_always_misses() {
        let mut roller = ScriptedRng::new(vec![1]);
        assert_eq!(resolve_hit(1, 18, -10, &mut roller), HitOutcome::CriticalMiss);
    }

    #[test]
    fn damage_is_floored_at_one() {
        let mut roller = ScriptedRng::new(vec![1]);
        let dmg = resolve_damage(3, Some(Dice::new(1, 2, 0)), false, &mut roller);
        assert!(dmg >= 1);
    }

    #[test]
    fn critical_hit_doubles_damage() {
        let mut roller = ScriptedRng::new(vec![4]);
        let dmg = resolve_damage(10, Some(Dice::new(1, 6, 0)), true, &mut roller);
        assert_eq!(dmg, 8);
    }

    #[test]
    fn flee_chance_is_clamped() {
        assert_eq!(flee_chance_percent(13), 50);
        assert_eq!(flee_chance_percent(30), 95);
        assert_eq!(flee_chance_percent(0), 0);
    }

    #[test]
    fn newbie_experience_penalty_is_capped_at_100() {
        assert_eq!(experience_penalty(5, 10_000), 100);
    }

    #[test]
    fn veteran_experience_penalty_uses_level_cap() {
        assert_eq!(experience_penalty(10, 5_000), 500);
        assert_eq!(experience_penalty(50, 1_000_000), 50_000);
    }
}
