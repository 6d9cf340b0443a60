use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub const TICKET_ID_PREFIX: &str = "TCKT";
pub const TICKET_ID_LENGTH: usize = 12;

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of fresh ticket ids.
pub trait TicketIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// `TCKT` followed by digit, letter, digit, letter, ... e.g. `TCKT1A2B3C4D`.
pub struct RandomTicketIdGenerator<R> {
    rng: Mutex<R>,
}

impl<R: Rng> RandomTicketIdGenerator<R> {
    pub fn new(rng: R) -> Self {
        RandomTicketIdGenerator {
            rng: Mutex::new(rng),
        }
    }
}

impl RandomTicketIdGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> TicketIdGenerator for RandomTicketIdGenerator<R> {
    fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut id = String::with_capacity(TICKET_ID_LENGTH);
        id.push_str(TICKET_ID_PREFIX);
        for position in 0..TICKET_ID_LENGTH - TICKET_ID_PREFIX.len() {
            let alphabet = if position % 2 == 0 { DIGITS } else { LETTERS };
            id.push(alphabet[rng.gen_range(0..alphabet.len())] as char);
        }
        id
    }
}

pub fn is_valid_ticket_id(id: &str) -> bool {
    id.len() == TICKET_ID_LENGTH
        && id.starts_with(TICKET_ID_PREFIX)
        && id[TICKET_ID_PREFIX.len()..]
            .chars()
            .enumerate()
            .all(|(i, c)| {
                if i % 2 == 0 {
                    c.is_ascii_digit()
                } else {
                    c.is_ascii_uppercase()
                }
            })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_follow_the_pattern() {
        let generator = RandomTicketIdGenerator::seeded(42);
        for _ in 0..200 {
            let id = generator.generate();
            assert_eq!(id.len(), 12, "{id}");
            assert!(id.starts_with("TCKT"), "{id}");
            assert!(is_valid_ticket_id(&id), "{id}");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let first = RandomTicketIdGenerator::seeded(7);
        let second = RandomTicketIdGenerator::seeded(7);
        for _ in 0..10 {
            assert_eq!(first.generate(), second.generate());
        }
    }

    #[test]
    fn validator_rejects_malformed_ids() {
        assert!(is_valid_ticket_id("TCKT1A2B3C4D"));
        assert!(!is_valid_ticket_id("TCKT1A2B3C4D5"));
        assert!(!is_valid_ticket_id("TCKTA1B2C3D4"));
        assert!(!is_valid_ticket_id("TKT01A2B3C4D"));
        assert!(!is_valid_ticket_id("TCKT1a2b3c4d"));
    }
}
