use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Success envelope: `{success: true, results?, count?, message?, data?}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub message: Option<String>,
    pub results: Option<usize>,
    pub count: Option<usize>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            results: None,
            count: None,
            status_code: None,
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            status_code: Some(status_code),
            ..Self::success(data)
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl<U: Serialize> ApiResponse<Vec<U>> {
    /// List page with `results` set to the number of documents returned
    pub fn results(data: Vec<U>) -> Self {
        Self {
            results: Some(data.len()),
            ..Self::success(data)
        }
    }

    /// List with `count` set to the number of documents returned
    pub fn counted(data: Vec<U>) -> Self {
        Self {
            count: Some(data.len()),
            ..Self::success(data)
        }
    }
}

impl ApiResponse<()> {
    /// `{success: true, message}` with no data
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            results: None,
            count: None,
            status_code: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(true));
        if let Some(results) = self.results {
            envelope.insert("results".to_string(), json!(results));
        }
        if let Some(count) = self.count {
            envelope.insert("count".to_string(), json!(count));
        }
        if let Some(message) = self.message {
            envelope.insert("message".to_string(), Value::String(message));
        }
        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => {
                    envelope.insert("data".to_string(), value);
                }
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (status, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of<T: Serialize>(response: ApiResponse<T>) -> (StatusCode, Value) {
        let response = response.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn list_envelope_counts_results() {
        let (status, body) = body_of(ApiResponse::results(vec![json!({"id": 1}), json!({"id": 2})])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "results": 2, "data": [{"id": 1}, {"id": 2}]}));
    }

    #[tokio::test]
    async fn radius_envelope_uses_count() {
        let (_, body) = body_of(ApiResponse::counted(Vec::<Value>::new())).await;
        assert_eq!(body, json!({"success": true, "count": 0, "data": []}));
    }

    #[tokio::test]
    async fn message_only_envelope_has_no_data() {
        let (_, body) = body_of(ApiResponse::message("Job removed")).await;
        assert_eq!(body, json!({"success": true, "message": "Job removed"}));
    }

    #[tokio::test]
    async fn created_carries_status_and_message() {
        let (status, body) = body_of(ApiResponse::created("cv.pdf").with_message("Applied to Job successfully")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], json!("Applied to Job successfully"));
        assert_eq!(body["data"], json!("cv.pdf"));
    }
}
