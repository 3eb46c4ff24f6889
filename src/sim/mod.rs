//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod player;
pub mod pool;
pub mod resolve;
pub mod spawn;
pub mod starfield;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{ColliderKey, ColliderKind, Shape, SpatialIndex};
pub use entity::{Alien, Exhaust, Laser, LaserOwner, Meteor, MeteorSize, Shield};
pub use player::{LifeState, Player};
pub use pool::{EntityId, Pool};
pub use spawn::BeatNote;
pub use starfield::{Backdrop, Starfield};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, TickOutcome, tick};
pub use timer::Timer;
