pub mod action;
pub mod auth;
pub mod handlers;
pub mod paging;
pub mod router;
pub mod session;
pub mod types;

pub use router::Engine;
pub use types::{Effect, EffectLine, Event, EventKind};
