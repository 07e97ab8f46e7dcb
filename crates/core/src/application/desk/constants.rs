// Desk constants (no magic values)
use std::time::Duration;

/// Idle period before the current holder is asked for status (30 min)
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Keyword every chat command starts with
pub const DEFAULT_COMMAND_PREFIX: &str = "deploy";

/// Celebrations picked at random when a holder finishes one of several turns
pub const REACTIONS: [&str; 4] = [":smart:", ":rocket:", ":hyperclap:", ":confetti_ball:"];
