//! Observation strategies: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for consuming the
//! platform's raw signals (intersection events or throttled scroll polls)
//! and turning them into state-change requests on the debounced emitter.
//! They MUST NOT publish state directly or manage the tracker lifecycle:
//! attach/detach and page-visibility re-arming belong to VisibilityTracker.

mod observer;
mod polling;
mod r#trait;

pub use self::r#trait::StrategyKind;
pub(crate) use self::r#trait::{create_strategy, select_strategy, ObservationStrategy};
