pub mod intersection;
pub mod page;
pub mod region;

pub use intersection::IntersectionEvent;
pub use page::{PageEvent, PageEventKind};
pub use region::{RegionHandle, RegionId};
