use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON envelope wrapping every API response.
///
/// ```json
/// { "success": true, "message": "...", "statusCode": 200, "data": [...] }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub status_code: u16,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: StatusCode::OK.as_u16(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope with `data: null`.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: StatusCode::OK.as_u16(),
            data: None,
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code: status.as_u16(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2], "done")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "message": "done",
                "statusCode": 200,
                "data": [1, 2]
            })
        );
    }

    #[test]
    fn test_failure_envelope_has_null_data() {
        let json = serde_json::to_value(ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            "Malformed request body",
        ))
        .unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["statusCode"], 400);
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_into_response_uses_status_code() {
        let response =
            ApiResponse::failure(StatusCode::SERVICE_UNAVAILABLE, "unavailable").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
