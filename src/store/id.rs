use crate::core::TodoId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Number of decimal digits in a generated id
pub const ID_LENGTH: u32 = 6;

/// Count of distinct ids a source can produce
pub const ID_SPACE: usize = 10usize.pow(ID_LENGTH);

/// Supplies candidate ids. The [`Store`](super::Store) rejects candidates
/// already in use and asks again.
pub trait IdSource: Send {
    fn next_id(&mut self) -> TodoId;
}

/// Draws [`ID_LENGTH`] digits uniformly from 0-9 and uses the numeric
/// value of the digit string, so leading zeros shrink the number.
pub struct RandomIdSource {
    rng: StdRng,
}

impl RandomIdSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn draw_digits(&mut self) -> String {
        (0..ID_LENGTH)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect()
    }
}

impl Default for RandomIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for RandomIdSource {
    fn next_id(&mut self) -> TodoId {
        self.draw_digits()
            .bytes()
            .fold(0, |id, digit| id * 10 + TodoId::from(digit - b'0'))
    }
}

/// Hands out a fixed sequence of ids, then falls back to random draws.
/// Lets callers force collisions deterministically.
pub struct ScriptedIdSource {
    queued: VecDeque<TodoId>,
    fallback: RandomIdSource,
}

impl ScriptedIdSource {
    pub fn new(ids: impl IntoIterator<Item = TodoId>) -> Self {
        Self {
            queued: ids.into_iter().collect(),
            fallback: RandomIdSource::seeded(0),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queued.len()
    }
}

impl IdSource for ScriptedIdSource {
    fn next_id(&mut self) -> TodoId {
        self.queued
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_are_fixed_length() {
        let mut source = RandomIdSource::seeded(42);
        for _ in 0..100 {
            let digits = source.draw_digits();
            assert_eq!(digits.len(), ID_LENGTH as usize);
            assert!(digits.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_ids_stay_in_range() {
        let mut source = RandomIdSource::seeded(7);
        for _ in 0..1000 {
            assert!(source.next_id() < ID_SPACE as TodoId);
        }
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RandomIdSource::seeded(3);
        let mut b = RandomIdSource::seeded(3);
        assert_eq!(a.next_id(), b.next_id());
    }

    #[test]
    fn test_scripted_then_fallback() {
        let mut source = ScriptedIdSource::new([5, 5, 9]);
        assert_eq!(source.next_id(), 5);
        assert_eq!(source.next_id(), 5);
        assert_eq!(source.next_id(), 9);
        assert_eq!(source.remaining(), 0);
        assert!(source.next_id() < ID_SPACE as TodoId);
    }
}
