pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    AddReviewCommand, AddReviewError, DeleteReviewCommand, DeleteReviewError,
    UpdateReviewCommand, UpdateReviewError,
};

pub use queries::{
    GetReviewError, GetReviewQuery, ListBootcampReviewsQuery, ListReviewsError, ListReviewsQuery,
};

pub use routes::reviews_routes;
