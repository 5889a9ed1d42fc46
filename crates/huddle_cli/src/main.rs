//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `huddle_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("huddle_core ping={}", huddle_core::ping());
    println!("huddle_core version={}", huddle_core::core_version());
}
