/// Success envelopes
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// `{ "status": "success", ... }` with either `data` or `message`
#[derive(Debug)]
pub struct ApiResponse {
    status: StatusCode,
    body: Value,
}

impl ApiResponse {
    /// 200 with `data`
    pub fn ok(data: Value) -> Self {
        Self::with_data(StatusCode::OK, data)
    }

    /// 201 with `data`
    pub fn created(data: Value) -> Self {
        Self::with_data(StatusCode::CREATED, data)
    }

    /// 200 with `message`
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::OK, message)
    }

    /// 201 with `message`
    pub fn created_message(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::CREATED, message)
    }

    fn with_data(status: StatusCode, data: Value) -> Self {
        Self {
            status,
            body: json!({ "status": "success", "data": data }),
        }
    }

    fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "status": "success", "message": message.into() }),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
