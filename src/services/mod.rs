pub mod emitter;
pub mod strategy;
pub mod tracker;

pub use emitter::DebouncedEmitter;
pub use strategy::StrategyKind;
pub use tracker::{track, VisibilityTracker};
