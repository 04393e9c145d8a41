//! Admin-only user management

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateUserCommand, CreateUserError, DeleteUserCommand, DeleteUserError, UpdateUserCommand,
    UpdateUserError,
};

pub use queries::{GetUserError, GetUserQuery, ListUsersError, ListUsersQuery};

pub use routes::users_routes;
