pub mod errors;
pub mod snapshot;
pub mod window;

pub use errors::*;
pub use snapshot::ActivitySnapshot;
pub use window::{Granularity, MonthId, TimeWindow};
