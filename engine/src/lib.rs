//! Desktop runtime for HybridRogue.
//!
//! The [`Host`] owns a single [`RunLoop`] for the life of the process and
//! guarantees it is torn down on every exit path. [`EngineContext`] is the
//! windowed run loop the game binary hands to it.

pub mod config;
pub mod context;
pub mod error;
pub mod game;
pub mod host;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;

pub use config::EngineConfig;
pub use context::EngineContext;
pub use error::{ConfigError, EngineError, GraphicsError, HostError};
pub use game::{Game, GameFlow};
pub use host::{Host, Lifecycle, RunLoop, ThreadAffinity};
pub use input::{Input, KeyCode};
pub use render::Color;
pub use time::{FrameClock, GameTime};
