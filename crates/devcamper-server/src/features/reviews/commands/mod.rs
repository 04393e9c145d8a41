pub mod create;
pub mod delete;
pub mod update;

use crate::features::shared::Resource;
use crate::models::review;

pub(crate) const REVIEWS: Resource = Resource {
    collection: review::COLLECTION,
    name: "review",
};

pub use create::{AddReviewCommand, AddReviewError};
pub use delete::{DeleteReviewCommand, DeleteReviewError};
pub use update::{UpdateReviewCommand, UpdateReviewError};
