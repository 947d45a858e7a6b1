//! Prelude module for convenient imports.
//!
//! Re-exports the types most calls need:
//!
//! ```ignore
//! use talon::prelude::*;
//! ```

pub use crate::{
    ClientFactory, Config, FailureCode, Json, Method, NoData, RequestProperties, RestClient,
    RestResult, Scheme, ServiceResult,
};
