//! The traits and types most handlers need.
//!
//! ```
//! use waypost::prelude::*;
//! ```

pub use crate::handler::Handler;
pub use crate::{Request, Response, Router};
pub use http::{Method, StatusCode};
