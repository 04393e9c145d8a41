pub mod create;
pub mod delete;
pub mod update;

use crate::features::shared::Resource;
use crate::models::bootcamp;

pub(crate) const BOOTCAMPS: Resource = Resource {
    collection: bootcamp::COLLECTION,
    name: "bootcamp",
};

pub use create::{CreateBootcampCommand, CreateBootcampError};
pub use delete::{DeleteBootcampCommand, DeleteBootcampError};
pub use update::{UpdateBootcampCommand, UpdateBootcampError};
