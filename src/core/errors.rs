use spin_sdk::http::Response;
use std::fmt;

use crate::templates::render_error_page;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::InternalError(_) => 500,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalError(msg) => msg,
        }
    }

    /// JSON body, for the `/api` routes.
    pub fn into_json_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message() }).to_string();
        Response::builder()
            .status(self.status())
            .header("Content-Type", "application/json")
            .body(body.into_bytes())
            .build()
    }

    /// HTML error page, for everything a browser navigates to.
    pub fn into_page_response(self) -> Response {
        let html = render_error_page(self.status(), self.message());
        Response::builder()
            .status(self.status())
            .header("Content-Type", "text/html; charset=utf-8")
            .body(html.into_bytes())
            .build()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl From<ApiError> for Response {
    fn from(err: ApiError) -> Self {
        err.into_page_response()
    }
}

impl std::error::Error for ApiError {}

// Anything that bubbles up as anyhow is an internal failure unless it
// already carries an ApiError.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api) => api,
            Err(other) => ApiError::InternalError(format!("{:#}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), 400);
        assert_eq!(ApiError::NotFound("x".into()).status(), 404);
        assert_eq!(ApiError::InternalError("x".into()).status(), 500);
    }

    #[test]
    fn anyhow_keeps_wrapped_api_error() {
        let err = anyhow::Error::new(ApiError::NotFound("no post for slug".into()));
        let api: ApiError = err.into();
        assert_eq!(api.status(), 404);
    }

    #[test]
    fn plain_anyhow_becomes_internal() {
        let api: ApiError = anyhow::anyhow!("boom").into();
        assert_eq!(api.status(), 500);
        assert_eq!(api.to_string(), "Internal Error: boom");
    }

    #[test]
    fn json_response_carries_message() {
        let resp = ApiError::NotFound("no such post".into()).into_json_response();
        assert_eq!(*resp.status(), 404);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"], "no such post");
    }
}
