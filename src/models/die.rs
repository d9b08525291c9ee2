// Dice - random integer draws over an inclusive range
//
// Every draw maps a continuous uniform sample in [0, 1) onto the integers
// 1..=sides with `1 + floor(sample * sides)`. All functions take the random
// source as a parameter so tests can use a seeded generator; the
// convenience wrappers use the thread-local RNG.

use rand::Rng;

/// Number of sides used when a caller does not pick one (or picks zero)
pub const DEFAULT_SIDES: i32 = 6;

/// Resolve an optional side count, treating `None` and `0` as the default
pub fn sides_or_default(num_sides: Option<i32>) -> i32 {
    match num_sides {
        None | Some(0) => DEFAULT_SIDES,
        Some(sides) => sides,
    }
}

/// Draw one integer in `1..=sides` from `rng`
pub fn draw<R: Rng + ?Sized>(rng: &mut R, sides: i32) -> i32 {
    let sample: f64 = rng.gen();
    1 + (sample * f64::from(sides)).floor() as i32
}

/// **Random Die** - a side count plus the ability to roll it
///
/// A die is built fresh for each request and has no identity; it only
/// lives long enough to resolve its own fields.
///
/// ## Rust Learning Notes:
///
/// ### Copy Types
/// `RandomDie` is a single `i32`, so deriving `Copy` lets it be passed
/// around by value without `.clone()` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDie {
    pub num_sides: i32,
}

impl RandomDie {
    /// Create a die, defaulting to six sides when `num_sides` is absent or zero
    pub fn new(num_sides: Option<i32>) -> Self {
        Self {
            num_sides: sides_or_default(num_sides),
        }
    }

    pub fn roll_once(&self) -> i32 {
        self.roll_once_with(&mut rand::thread_rng())
    }

    pub fn roll_once_with<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        draw(rng, self.num_sides)
    }

    /// Roll the die `num_rolls` times; zero or negative counts give no rolls
    pub fn roll(&self, num_rolls: i32) -> Vec<i32> {
        self.roll_with(&mut rand::thread_rng(), num_rolls)
    }

    pub fn roll_with<R: Rng + ?Sized>(&self, rng: &mut R, num_rolls: i32) -> Vec<i32> {
        (0..num_rolls).map(|_| self.roll_once_with(rng)).collect()
    }
}

impl Default for RandomDie {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Roll `num_dice` independent dice, each with `num_sides` (default six) sides
pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R, num_dice: i32, num_sides: Option<i32>) -> Vec<i32> {
    RandomDie::new(num_sides).roll_with(rng, num_dice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_sides() {
        assert_eq!(RandomDie::new(None).num_sides, 6);
        assert_eq!(RandomDie::new(Some(0)).num_sides, 6);
        assert_eq!(RandomDie::new(Some(20)).num_sides, 20);
        assert_eq!(RandomDie::default(), RandomDie::new(None));
    }

    #[test]
    fn test_roll_once_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for sides in [1, 2, 6, 20, 100] {
            let die = RandomDie::new(Some(sides));
            for _ in 0..2_000 {
                let value = die.roll_once_with(&mut rng);
                assert!((1..=sides).contains(&value), "{} out of 1..={}", value, sides);
            }
        }
    }

    #[test]
    fn test_roll_hits_every_face() {
        let mut rng = StdRng::seed_from_u64(7);
        let die = RandomDie::new(None);
        let rolls = die.roll_with(&mut rng, 6_000);

        for face in 1..=6 {
            assert!(rolls.contains(&face), "face {} never rolled", face);
        }
    }

    #[test]
    fn test_roll_count() {
        let die = RandomDie::new(Some(4));
        assert_eq!(die.roll(0).len(), 0);
        assert_eq!(die.roll(-3).len(), 0);
        assert_eq!(die.roll(17).len(), 17);
        assert!(die.roll(50).iter().all(|v| (1..=4).contains(v)));
    }

    #[test]
    fn test_roll_dice() {
        let mut rng = StdRng::seed_from_u64(3);
        let rolls = roll_dice(&mut rng, 10, None);
        assert_eq!(rolls.len(), 10);
        assert!(rolls.iter().all(|v| (1..=6).contains(v)));

        let rolls = roll_dice(&mut rng, 25, Some(3));
        assert_eq!(rolls.len(), 25);
        assert!(rolls.iter().all(|v| (1..=3).contains(v)));
    }

    #[test]
    fn test_one_sided_die() {
        let die = RandomDie::new(Some(1));
        assert!(die.roll(100).iter().all(|v| *v == 1));
    }
}
