//! Chronologically sortable child keys.
//!
//! A key is 8 characters of milliseconds since the epoch followed by 12 random
//! characters. The alphabet is in ASCII order, so keys sort by creation time.
//! Keys generated within the same millisecond reuse the previous random suffix
//! incremented by one, which keeps them strictly increasing per generator.
use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIME_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;
pub const KEY_LEN: usize = TIME_CHARS + RANDOM_CHARS;

struct State {
    last_millis: u64,
    last_random: [u8; RANDOM_CHARS],
}

pub struct PushIdGenerator {
    state: Mutex<State>,
}

impl PushIdGenerator {
    pub fn new() -> Self {
        PushIdGenerator {
            state: Mutex::new(State {
                last_millis: 0,
                last_random: [0; RANDOM_CHARS],
            }),
        }
    }

    pub fn next_id(&self) -> Result<String, getrandom::Error> {
        self.next_id_at(now_millis())
    }

    fn next_id_at(&self, now: u64) -> Result<String, getrandom::Error> {
        let mut state = self.state.lock();

        // Never step backwards if the wall clock does.
        let millis = now.max(state.last_millis);

        if millis == state.last_millis && state.last_millis != 0 {
            increment(&mut state.last_random);
        } else {
            let mut random = [0u8; RANDOM_CHARS];
            getrandom::fill(&mut random)?;
            for b in random.iter_mut() {
                *b %= 64;
            }
            state.last_random = random;
        }
        state.last_millis = millis;

        let mut key = String::with_capacity(KEY_LEN);
        for i in (0..TIME_CHARS).rev() {
            let digit = (millis >> (6 * i)) & 0x3f;
            key.push(PUSH_CHARS[digit as usize] as char);
        }
        for &digit in &state.last_random {
            key.push(PUSH_CHARS[digit as usize] as char);
        }

        Ok(key)
    }
}

impl Default for PushIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Base-64 increment with carry. Wraps to all zeroes after the maximum, which
// would take 64^12 keys in a single millisecond.
fn increment(digits: &mut [u8; RANDOM_CHARS]) {
    for digit in digits.iter_mut().rev() {
        if *digit == 63 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique_and_increasing() {
        let generator = PushIdGenerator::new();
        let keys: Vec<String> = (0..1000).map(|_| generator.next_id().unwrap()).collect();

        assert!(keys.iter().all(|k| k.len() == KEY_LEN));
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys.iter().collect::<HashSet<_>>().len(), keys.len());
    }

    #[test]
    fn test_same_millisecond_increments_suffix() {
        let generator = PushIdGenerator::new();
        let first = generator.next_id_at(1_700_000_000_000).unwrap();
        let second = generator.next_id_at(1_700_000_000_000).unwrap();

        assert_eq!(first[..TIME_CHARS], second[..TIME_CHARS]);
        assert!(first < second);
    }

    #[test]
    fn test_clock_going_backwards() {
        let generator = PushIdGenerator::new();
        let first = generator.next_id_at(1_700_000_000_500).unwrap();
        let second = generator.next_id_at(1_700_000_000_000).unwrap();

        assert!(first < second);
    }

    #[test]
    fn test_time_prefix_encoding() {
        let generator = PushIdGenerator::new();
        let key = generator.next_id_at(64).unwrap();
        assert_eq!(&key[..TIME_CHARS], "------0-");
    }

    #[test]
    fn test_increment_carries() {
        let mut digits = [0u8; RANDOM_CHARS];
        digits[RANDOM_CHARS - 1] = 63;
        digits[RANDOM_CHARS - 2] = 63;
        increment(&mut digits);
        assert_eq!(digits[RANDOM_CHARS - 1], 0);
        assert_eq!(digits[RANDOM_CHARS - 2], 0);
        assert_eq!(digits[RANDOM_CHARS - 3], 1);
    }
}
