//! Dice expressions (§3: "damage dice expression parsed as (count, sides,
//! bonus)") and the injectable roller used for deterministic combat tests
//! (§9: the source's implicit global RNG becomes a seeded, injected
//! dependency).

use rand::Rng;

/// `count`d`sides`+`bonus`, e.g. `2d6+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dice {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
}

impl Dice {
    pub fn new(count: u32, sides: u32, bonus: i32) -> Self {
        Dice {
            count,
            sides,
            bonus,
        }
    }

    /// Rolls `count` dice of `sides` and sums them plus the flat bonus.
    /// `sides == 0` degenerates to just the bonus (guards against
    /// malformed templates rather than panicking on `gen_range`).
    pub fn roll(&self, roller: &mut dyn DiceRoller) -> i32 {
        let mut total = self.bonus;
        for _ in 0..self.count {
            if self.sides > 0 {
                total += roller.roll(1, self.sides as i32);
            }
        }
        total
    }
}

/// A source of dice rolls. Production code uses [`ThreadRng`]; tests use a
/// scripted sequence so hit/damage outcomes (spec §8, properties 7 and 8)
/// are deterministic.
pub trait DiceRoller {
    /// Inclusive roll in `[lo, hi]`.
    fn roll(&mut self, lo: i32, hi: i32) -> i32;
}

/// The real roller used in production.
pub struct ThreadRng;

impl DiceRoller for ThreadRng {
    fn roll(&mut self, lo: i32, hi: i32) -> i32 {
        rand::thread_rng().gen_range(lo..=hi)
    }
}

/// A fixed sequence of rolls, replayed in order; repeats the last value
/// once exhausted so tests don't need to size the script exactly.
pub struct ScriptedRng {
    rolls: Vec<i32>,
    next: usize,
}

impl ScriptedRng {
    pub fn new(rolls: Vec<i32>) -> Self {
        ScriptedRng { rolls, next: 0 }
    }
}

impl DiceRoller for ScriptedRng {
    fn roll(&mut self, _lo: i32, _hi: i32) -> i32 {
        let value = self.rolls[self.next.min(self.rolls.len() - 1)];
        self.next += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_dice_sums_flat_bonus() {
        let dice = Dice::new(2, 6, 3);
        let mut roller = ScriptedRng::new(vec![4, 5]);
        assert_eq!(dice.roll(&mut roller), 4 + 5 + 3);
    }

    #[test]
    fn zero_sided_dice_is_just_the_bonus() {
        let dice = Dice::new(3, 0, 7);
        let mut roller = ScriptedRng::new(vec![1]);
        assert_eq!(dice.roll(&mut roller), 7);
    }
}
