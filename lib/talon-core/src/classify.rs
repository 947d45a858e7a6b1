//! Response classification.
//!
//! Turns a raw (status code, body) pair into a typed outcome: a decoded
//! success payload, a decoded error payload, or a structured failure code.
//! Decode failures never propagate past this boundary as anything but data.

use crate::payload::DecodeErrorKind;
use crate::{FailureCode, Payload, RestResult, ServiceResult};

const DEFAULT_SUCCESS_MIN: u16 = 200;
const DEFAULT_SUCCESS_MAX: u16 = 299;

fn is_success_status(status: u16, success_codes: Option<&[u16]>) -> bool {
    match success_codes {
        Some(codes) => codes.contains(&status),
        None => (DEFAULT_SUCCESS_MIN..=DEFAULT_SUCCESS_MAX).contains(&status),
    }
}

/// Classify a raw response into a typed [`RestResult`].
///
/// The status classifies as success when it is a member of the explicit
/// `success_codes` set if one was supplied, else when it falls in 200-299.
/// The matching side's payload marker then decides whether and how the body
/// is decoded; the other side stays untouched.
pub fn classify<S, E>(
    status: u16,
    body: &[u8],
    success_codes: Option<&[u16]>,
) -> ServiceResult<RestResult<S::Value, E::Value>>
where
    S: Payload,
    E: Payload,
{
    if is_success_status(status, success_codes) {
        match S::decode(body) {
            Ok(data) => ServiceResult::Completed(RestResult::success(status, data)),
            Err(err) => ServiceResult::Failed(match err.kind() {
                DecodeErrorKind::Mismatch => FailureCode::JsonResponseDataTypeMismatch,
                DecodeErrorKind::NotJson => FailureCode::ResponseIsNotValidJson,
                DecodeErrorKind::Other => FailureCode::CannotCreateObjectFromSuccessResponse,
            }),
        }
    } else {
        match E::decode(body) {
            Ok(data) => ServiceResult::Completed(RestResult::failure(status, data)),
            Err(err) => ServiceResult::Failed(match err.kind() {
                DecodeErrorKind::Mismatch => FailureCode::JsonErrorDataTypeMismatch,
                DecodeErrorKind::NotJson => FailureCode::ResponseIsNotValidJson,
                DecodeErrorKind::Other => FailureCode::CannotCreateObjectFromErrorResponse,
            }),
        }
    }
}
