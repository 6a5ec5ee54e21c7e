use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// JSON body extractor that strips operator-like keys and escapes markup before
/// deserializing into `T`.
#[derive(Debug, Clone)]
pub struct SanitizedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for SanitizedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

        sanitize(&mut value);
        serde_json::from_value(value)
            .map(SanitizedJson)
            .map_err(|e| ApiError::invalid_json(format!("Invalid request body: {}", e)))
    }
}

/// Drops object keys that start with `$` or contain `.`, and HTML-escapes `<`
/// and `>` in every string, recursively.
pub fn sanitize(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !key.starts_with('$') && !key.contains('.'));
            map.values_mut().for_each(sanitize);
        }
        Value::Array(items) => items.iter_mut().for_each(sanitize),
        Value::String(s) if s.contains(['<', '>']) => {
            *s = s.replace('<', "&lt;").replace('>', "&gt;");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn strips_operator_keys_at_any_depth() {
        let mut value = json!({
            "email": { "$gt": "" },
            "$where": "1",
            "profile.name": "x",
            "tags": [{ "$ne": 1, "ok": true }]
        });
        sanitize(&mut value);
        assert_eq!(value, json!({ "email": {}, "tags": [{ "ok": true }] }));
    }

    #[test]
    fn escapes_markup_in_strings() {
        let mut value = json!({ "title": "<script>alert(1)</script>", "n": 3 });
        sanitize(&mut value);
        assert_eq!(value["title"], json!("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert_eq!(value["n"], json!(3));
    }

    #[derive(Debug, Deserialize)]
    struct Login {
        email: Option<String>,
    }

    #[tokio::test]
    async fn injected_operator_never_reaches_the_handler() {
        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":{"$gt":""}}"#))
            .unwrap();
        let result = SanitizedJson::<Login>::from_request(req, &()).await;
        // `{}` is not a string, so deserialization fails instead of matching everything
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let err = SanitizedJson::<Login>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_JSON");
    }

    #[tokio::test]
    async fn clean_body_deserializes() {
        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"ada@example.com"}"#))
            .unwrap();
        let SanitizedJson(login) = SanitizedJson::<Login>::from_request(req, &()).await.unwrap();
        assert_eq!(login.email.as_deref(), Some("ada@example.com"));
    }
}
