use serde::Serialize;

use crate::errors::ErrorCode;

/// Success envelope: `{ "success": true, "data": ..., "message"? }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// The message is shown to the chat user as-is.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Failure envelope: `{ "success": false, "error": { "code", "message", "details"? } }`.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            error: ApiErrorDetail {
                code: code.code(),
                message: message.into(),
                details,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: &'static str,
    pub version: &'static str,
    pub checks: Vec<HealthCheck>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthCheck {
    /// Turns the outcome of a dependency probe into a named check.
    pub fn from_probe<E: std::fmt::Display>(name: impl Into<String>, probe: Result<(), E>) -> Self {
        match probe {
            Ok(()) => Self {
                name: name.into(),
                status: HealthStatus::Healthy,
                message: None,
            },
            Err(e) => Self {
                name: name.into(),
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
            },
        }
    }
}

impl HealthResponse {
    /// Overall status is unhealthy as soon as one check is.
    pub fn from_checks(service: &'static str, version: &'static str, checks: Vec<HealthCheck>) -> Self {
        let status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };
        Self {
            status,
            service,
            version,
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_failed_probe_makes_the_service_unhealthy() {
        let checks = vec![
            HealthCheck::from_probe("memory", Ok::<(), String>(())),
            HealthCheck::from_probe("postgres", Err("connection refused")),
        ];
        let resp = HealthResponse::from_checks("svc", "0.1.0", checks);

        assert!(!resp.is_healthy());
        assert_eq!(resp.checks[1].message.as_deref(), Some("connection refused"));
        assert!(HealthResponse::from_checks("svc", "0.1.0", Vec::new()).is_healthy());
    }

    #[test]
    fn envelope_omits_empty_message() {
        let json = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 3 }));

        let json = serde_json::to_value(ApiResponse::ok_with_message((), "done")).unwrap();
        assert_eq!(json["message"], "done");
    }

    #[test]
    fn error_envelope_uses_the_wire_code() {
        let json = serde_json::to_value(ApiErrorResponse::new(ErrorCode::InvalidDecision, "nope", None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": { "code": "E3001", "message": "nope" } })
        );
    }
}
