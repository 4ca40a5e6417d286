//! Fixed-timestep Space Invaders simulation.
//!
//! The library holds the simulation core (entities, bounded pools, the
//! formation state machine and collision resolution) and a render pass that
//! talks to an abstract [`render::Surface`].  Windowing, input polling and
//! presentation live in the binary.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod pool;
pub mod render;

pub use compute::{Game, Outcome};
pub use config::{GameConfig, Level};
pub use error::{ConfigError, GameError};
