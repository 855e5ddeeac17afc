// Request extractors whose rejections come back as `AppError`, so malformed
// input gets the same JSON error body as every other failure.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("path", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct UserId {
        user_id: i64,
    }

    #[tokio::test]
    async fn bad_query_is_a_validation_error() {
        let req = Request::builder().uri("/api/exams?user_id=abc").body(Body::empty()).unwrap();
        let (mut parts, _) = req.into_parts();
        let err = ApiQuery::<UserId>::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "query", .. }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn good_query_is_passed_through() {
        let req = Request::builder().uri("/api/exams?user_id=7").body(Body::empty()).unwrap();
        let (mut parts, _) = req.into_parts();
        let ApiQuery(q) = ApiQuery::<UserId>::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(q.user_id, 7);
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_validation_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let err = ApiJson::<UserId>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "body", .. }));
    }
}
