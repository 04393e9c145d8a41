pub mod get;
pub mod list;

pub use get::{GetReviewError, GetReviewQuery};
pub use list::{ListBootcampReviewsQuery, ListReviewsError, ListReviewsQuery};
