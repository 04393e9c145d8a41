pub mod me;

pub use me::{GetMeError, GetMeQuery};
