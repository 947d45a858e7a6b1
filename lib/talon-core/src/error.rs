//! The closed failure taxonomy and the outer result envelope.

use derive_more::{Display, Error};

/// Structured failure code for a call that could not be dispatched or whose
/// outcome could not be decoded.
///
/// Every internal step of the pipeline reports its failure through one of
/// these codes; none of them aborts the calling program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error)]
pub enum FailureCode {
    /// The request URI could not be built from the configured components.
    #[display("cannot create a valid URI from the configured components")]
    CannotCreateUri,

    /// The sub-path template references more parameters than were supplied.
    #[display("sub-path template references more parameters than supplied")]
    MalformedSubPath,

    /// The request body could not be serialized to JSON.
    #[display("cannot create a JSON string from the request body")]
    CannotCreateJsonStringFromObject,

    /// The transport reported a network-level error without a response.
    #[display("the request failed without a response")]
    RequestFailed,

    /// The wait on the transport outcome was interrupted before completion.
    #[display("the request was interrupted")]
    RequestInterrupted,

    /// The wait on the transport outcome exceeded the configured timeout.
    #[display("the request timed out")]
    RequestTimedOut,

    /// The response body is not valid JSON.
    #[display("the response body is not valid JSON")]
    ResponseIsNotValidJson,

    /// The response body is valid JSON but does not match the success type.
    #[display("the response JSON does not match the success type")]
    JsonResponseDataTypeMismatch,

    /// The response body is valid JSON but does not match the error type.
    #[display("the response JSON does not match the error type")]
    JsonErrorDataTypeMismatch,

    /// The success response could not be decoded for another reason.
    #[display("cannot create an object from the success response")]
    CannotCreateObjectFromSuccessResponse,

    /// The error response could not be decoded for another reason.
    #[display("cannot create an object from the error response")]
    CannotCreateObjectFromErrorResponse,
}

/// Outcome envelope for one service call.
///
/// Distinguishes "the call was dispatched and produced an outcome" from
/// "the call could not be dispatched or its outcome could not be decoded".
/// Exactly one of the two is populated by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceResult<T> {
    /// The call completed and produced an outcome.
    Completed(T),
    /// The call failed before producing an outcome.
    Failed(FailureCode),
}

impl<T> ServiceResult<T> {
    /// Returns `true` if the call completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The completed outcome, if any.
    #[must_use]
    pub const fn completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// The failure code, if the call failed.
    #[must_use]
    pub const fn failure_code(&self) -> Option<FailureCode> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(code) => Some(*code),
        }
    }

    /// Consume the envelope into the completed outcome.
    #[must_use]
    pub fn into_completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Convert into a standard [`Result`].
    pub fn into_result(self) -> Result<T, FailureCode> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Failed(code) => Err(code),
        }
    }

    /// Map the completed outcome with a function, keeping a failure as-is.
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Completed(value) => ServiceResult::Completed(f(value)),
            Self::Failed(code) => ServiceResult::Failed(code),
        }
    }
}

impl<T> From<FailureCode> for ServiceResult<T> {
    fn from(code: FailureCode) -> Self {
        Self::Failed(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_code_display() {
        assert_eq!(
            FailureCode::RequestTimedOut.to_string(),
            "the request timed out"
        );
        assert_eq!(
            FailureCode::ResponseIsNotValidJson.to_string(),
            "the response body is not valid JSON"
        );
    }

    #[test]
    fn service_result_completed() {
        let result = ServiceResult::Completed(42);
        assert!(result.is_completed());
        assert_eq!(result.completed(), Some(&42));
        assert_eq!(result.failure_code(), None);
        assert_eq!(result.into_completed(), Some(42));
    }

    #[test]
    fn service_result_failed() {
        let result: ServiceResult<u32> = ServiceResult::Failed(FailureCode::RequestFailed);
        assert!(!result.is_completed());
        assert_eq!(result.completed(), None);
        assert_eq!(result.failure_code(), Some(FailureCode::RequestFailed));
        assert_eq!(result.into_completed(), None);
    }

    #[test]
    fn service_result_from_code() {
        let result: ServiceResult<u32> = FailureCode::CannotCreateUri.into();
        assert_eq!(result.failure_code(), Some(FailureCode::CannotCreateUri));
    }

    #[test]
    fn service_result_map() {
        let result = ServiceResult::Completed(21).map(|n| n * 2);
        assert_eq!(result.into_completed(), Some(42));

        let result: ServiceResult<u32> = ServiceResult::Failed(FailureCode::RequestTimedOut);
        let mapped = result.map(|n| n * 2);
        assert_eq!(mapped.failure_code(), Some(FailureCode::RequestTimedOut));
    }

    #[test]
    fn service_result_into_result() {
        assert_eq!(ServiceResult::Completed(1).into_result(), Ok(1));
        let failed: ServiceResult<u32> = ServiceResult::Failed(FailureCode::RequestInterrupted);
        assert_eq!(
            failed.into_result(),
            Err(FailureCode::RequestInterrupted)
        );
    }
}
