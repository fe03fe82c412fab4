//! Feature modules - client-side logic separated from rendering
//!
//! Each feature module holds the state a page drives: countdown timers,
//! the player queue, preferences. Nothing here schedules itself; the
//! frontend ticks the state machines from its own event loop.

pub mod affirmations;
pub mod focus;
pub mod player;
pub mod settings;

pub use affirmations::AffirmationRotator;
pub use focus::{FocusConfig, FocusPhase, FocusTimer, PhaseChange};
pub use player::PlayerState;
pub use settings::{Preferences, Theme};
