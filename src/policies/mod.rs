//! Retry timing policies.
//!
//! ## Contents
//! - [`CooldownPolicy`] how long to wait between two log sessions
//! - [`JitterPolicy`]   randomization applied to the cooldown
//!
//! ## Defaults
//! - `CooldownPolicy::default()` → interval=2s, jitter=None.

mod cooldown;
mod jitter;

pub use cooldown::CooldownPolicy;
pub use jitter::JitterPolicy;
