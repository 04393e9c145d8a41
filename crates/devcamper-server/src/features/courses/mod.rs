pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    AddCourseCommand, AddCourseError, DeleteCourseCommand, DeleteCourseError,
    UpdateCourseCommand, UpdateCourseError,
};

pub use queries::{
    GetCourseError, GetCourseQuery, ListBootcampCoursesQuery, ListCoursesError, ListCoursesQuery,
};

pub use routes::courses_routes;
