//! Bobber animation and idle lines for the controls bar while a round runs.

use chrono::Local;

/// The bobber rocking on the current, one frame per quarter second.
const BOBBER_FRAMES: [&str; 4] = ["·o·", "~o~", "≈o≈", "~o~"];

const FRAME_MS: i64 = 250;

const WAITING_MESSAGES: [&str; 8] = [
    "The bear watches the current...",
    "Something splashes upstream...",
    "Paws at the ready...",
    "Ripples on the surface...",
    "The river hums along...",
    "A shadow glides under the water...",
    "Patience, bear...",
    "The bear sniffs the air...",
];

fn bobber_at(millis: i64) -> &'static str {
    let frame = millis.rem_euclid(FRAME_MS * BOBBER_FRAMES.len() as i64) / FRAME_MS;
    BOBBER_FRAMES[frame as usize]
}

/// Bobber frame for the wall clock.
pub fn bobber() -> &'static str {
    bobber_at(Local::now().timestamp_millis())
}

/// Picks a line by how many fish have settled, so it changes as the round moves.
pub fn waiting_message(settled: u64) -> &'static str {
    WAITING_MESSAGES[(settled.wrapping_mul(7) % WAITING_MESSAGES.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bobber_steps_every_quarter_second() {
        assert_eq!(bobber_at(0), "·o·");
        assert_eq!(bobber_at(249), "·o·");
        assert_eq!(bobber_at(250), "~o~");
        assert_eq!(bobber_at(500), "≈o≈");
        assert_eq!(bobber_at(1000), "·o·");
        assert_eq!(bobber_at(-250), "~o~");
    }

    #[test]
    fn test_waiting_message_follows_settled_count() {
        assert_eq!(waiting_message(3), waiting_message(3));
        assert_ne!(waiting_message(0), waiting_message(1));
        assert!(WAITING_MESSAGES.contains(&waiting_message(u64::MAX)));
    }
}
