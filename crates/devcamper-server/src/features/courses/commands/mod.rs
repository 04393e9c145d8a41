pub mod create;
pub mod delete;
pub mod update;

use crate::features::shared::Resource;
use crate::models::course;

pub(crate) const COURSES: Resource = Resource {
    collection: course::COLLECTION,
    name: "course",
};

pub use create::{AddCourseCommand, AddCourseError};
pub use delete::{DeleteCourseCommand, DeleteCourseError};
pub use update::{UpdateCourseCommand, UpdateCourseError};
