pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateBootcampCommand, CreateBootcampError, DeleteBootcampCommand, DeleteBootcampError,
    UpdateBootcampCommand, UpdateBootcampError,
};

pub use queries::{
    BootcampsInRadiusError, BootcampsInRadiusQuery, GetBootcampError, GetBootcampQuery,
    ListBootcampsError, ListBootcampsQuery,
};

pub use routes::bootcamps_routes;
