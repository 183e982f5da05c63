//! Support for callers that display the textures live.

mod composite;
mod schedule;

pub use composite::{composite_frame, CompositeParams};
pub use schedule::RegenSchedule;
