// Invocation response envelope

use serde::Serialize;

/// The platform always receives this literal body on the observable path;
/// pipeline failures are visible only in the function's own logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerResponse {
    pub status: String,
}

impl HandlerResponse {
    pub fn success() -> Self {
        Self {
            status: "Success".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let body = serde_json::to_string(&HandlerResponse::success()).unwrap();
        assert_eq!(body, r#"{"status":"Success"}"#);
    }
}
