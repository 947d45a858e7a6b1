//! Convenience re-exports for the common call surface.

pub use crate::{
    FailureCode, Json, Method, NoData, RequestProperties, RestResult, Scheme, ServiceResult,
};
