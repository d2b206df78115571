//! ID and timestamp utilities for Engager
//!
//! Provides capture timestamps for feed items and identifiers for simulated media.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a media ID for a simulated feed item
///
/// Format: `{timestamp_ms}_{random_hex}`
/// Example: `1738300800123_a1b2c3d4`
pub fn generate_media_id() -> String {
    let timestamp = now_ms();
    let random: u32 = rand::rng().random();
    format!("{}_{:08x}", timestamp, random)
}
