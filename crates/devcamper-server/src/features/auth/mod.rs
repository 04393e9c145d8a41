pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    ForgotPasswordCommand, ForgotPasswordError, LoginCommand, LoginError, RegisterCommand,
    RegisterError, ResetPasswordCommand, ResetPasswordError, UpdateDetailsCommand,
    UpdateDetailsError, UpdatePasswordCommand, UpdatePasswordError,
};

pub use queries::{GetMeError, GetMeQuery};

pub use routes::auth_routes;
