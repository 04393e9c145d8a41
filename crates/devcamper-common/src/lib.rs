//! DevCamper Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Pieces shared by every DevCamper workspace member.
//!
//! - **Logging**: one place to configure `tracing` output for binaries
//! - **Errors**: the common error type and result alias
//!
//! # Example
//!
//! ```no_run
//! use devcamper_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

pub use error::{CommonError, Result};
