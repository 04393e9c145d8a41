pub mod get;
pub mod list;

pub use get::{GetCourseError, GetCourseQuery};
pub use list::{ListBootcampCoursesQuery, ListCoursesError, ListCoursesQuery};
