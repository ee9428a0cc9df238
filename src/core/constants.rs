// Fish timing
pub const FISH_DELAY_MIN_MS: u64 = 1000;
pub const FISH_DELAY_MAX_MS: u64 = 5000; // exclusive
pub const CATCH_CHANCE: f64 = 0.7;

// Round pacing
pub const RECONCILE_PACING_MS: u64 = 200;

// Animations (presentation only)
pub const FISH_FADE_MS: u64 = 500;
pub const BEAR_CATCH_ANIMATION_MS: u64 = 300;

// Difficulty presets
pub const EASY_FISH_COUNT: u32 = 3;
pub const MEDIUM_FISH_COUNT: u32 = 5;
pub const HARD_FISH_COUNT: u32 = 10;

// Summary thresholds (caught count, inclusive upper bounds)
pub const LIGHT_SNACK_MAX_CAUGHT: u32 = 2;
pub const SATISFIED_MAX_CAUGHT: u32 = 5;

// Event log
pub const EVENT_LOG_CAPACITY: usize = 200;

// Terminal front-end frame rate
pub const REALTIME_FRAME_MS: u64 = 16; // ~60 FPS

// Web front-end
pub const DEFAULT_WEB_PORT: u16 = 3000;
pub const WEB_BROADCAST_CAPACITY: usize = 256;
pub const WEB_COMMAND_CAPACITY: usize = 64;
