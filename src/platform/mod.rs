//! Platform layer: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for describing the
//! execution environment (intersection primitive availability, page-hidden
//! flag, viewport geometry, scroll/visibility event sources). It MUST NOT
//! contain any tracking logic: strategy selection, debounce and state
//! transitions live exclusively in the services layer.

mod scripted;
mod r#trait;

pub use self::r#trait::Platform;
pub use self::scripted::ScriptedPlatform;
