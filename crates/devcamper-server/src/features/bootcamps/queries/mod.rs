pub mod get;
pub mod list;
pub mod within_radius;

pub use get::{GetBootcampError, GetBootcampQuery};
pub use list::{ListBootcampsError, ListBootcampsQuery};
pub use within_radius::{BootcampsInRadiusError, BootcampsInRadiusQuery};
