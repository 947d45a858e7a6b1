//! The decoded outcome of one HTTP exchange.

/// Result of a completed HTTP exchange.
///
/// Carries the success flag, the HTTP status code, and at most one decoded
/// payload: the success payload when the call classified as successful, the
/// error payload otherwise. The constructors make it impossible for both
/// payloads to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResult<S, E> {
    is_success: bool,
    status_code: u16,
    success_data: Option<S>,
    error_data: Option<E>,
}

impl<S, E> RestResult<S, E> {
    /// Create a successful result, with or without a decoded payload.
    #[must_use]
    pub const fn success(status_code: u16, success_data: Option<S>) -> Self {
        Self {
            is_success: true,
            status_code,
            success_data,
            error_data: None,
        }
    }

    /// Create an unsuccessful result, with or without a decoded error payload.
    #[must_use]
    pub const fn failure(status_code: u16, error_data: Option<E>) -> Self {
        Self {
            is_success: false,
            status_code,
            success_data: None,
            error_data,
        }
    }

    /// Whether the exchange classified as successful.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.is_success
    }

    /// The HTTP status code of the exchange.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The decoded success payload, when present.
    #[must_use]
    pub const fn success_data(&self) -> Option<&S> {
        self.success_data.as_ref()
    }

    /// The decoded error payload, when present.
    #[must_use]
    pub const fn error_data(&self) -> Option<&E> {
        self.error_data.as_ref()
    }

    /// Consume into the decoded success payload.
    #[must_use]
    pub fn into_success_data(self) -> Option<S> {
        self.success_data
    }

    /// Consume into the decoded error payload.
    #[must_use]
    pub fn into_error_data(self) -> Option<E> {
        self.error_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_with_payload() {
        let result: RestResult<u32, String> = RestResult::success(200, Some(7));
        assert!(result.is_success());
        assert_eq!(result.status_code(), 200);
        assert_eq!(result.success_data(), Some(&7));
        assert_eq!(result.error_data(), None);
    }

    #[test]
    fn success_without_payload() {
        let result: RestResult<u32, String> = RestResult::success(204, None);
        assert!(result.is_success());
        assert_eq!(result.success_data(), None);
        assert_eq!(result.error_data(), None);
    }

    #[test]
    fn failure_with_payload() {
        let result: RestResult<u32, String> =
            RestResult::failure(404, Some("missing".to_string()));
        assert!(!result.is_success());
        assert_eq!(result.status_code(), 404);
        assert_eq!(result.success_data(), None);
        assert_eq!(result.error_data(), Some(&"missing".to_string()));
        assert_eq!(result.into_error_data(), Some("missing".to_string()));
    }
}
