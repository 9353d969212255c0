//! Request extraction and response checking against the wire schema.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::schema::ListQuery;
use crate::error::AppError;
use crate::validation::{codes, FieldViolation, FromBody, Validate};

/// JSON body parsed and validated into `T`.
///
/// Rejects with 400 and the list of violated fields.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: FromBody + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| malformed("body", rejection.body_text()))?;

        let body: T::Body =
            serde_json::from_value(value).map_err(|e| malformed("body", e.to_string()))?;

        T::parse(body).map(ValidatedJson).map_err(|violations| {
            tracing::debug!("Rejected request body: {:?}", violations);
            AppError::invalid_body(violations)
        })
    }
}

/// The required `userId` query parameter of the list endpoints.
#[derive(Debug)]
pub struct UserIdQuery(pub String);

impl<S> FromRequestParts<S> for UserIdQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ListQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed("query", rejection.body_text()))?;

        query.user_id().map(UserIdQuery)
    }
}

fn malformed(path: &str, message: String) -> AppError {
    AppError::invalid_body(vec![FieldViolation {
        path: path.to_string(),
        message,
        error_code: codes::TYPE,
    }])
}

/// Serializes `body` after checking it against the response schema.
///
/// A body that fails the check is never sent; the client gets a 500.
pub fn respond<T>(status: StatusCode, body: T) -> Result<Response, AppError>
where
    T: Serialize + Validate,
{
    if let Err(violations) = body.validate() {
        tracing::error!("Response failed schema validation: {:?}", violations);
        return Err(AppError::Internal("response failed schema validation".to_string()));
    }
    Ok((status, Json(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credentials, UserView};
    use axum::body::Body;

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_extracts_valid_body() {
        let req = json_request(r#"{"email": "john@x.com", "password": "secret1"}"#);

        let ValidatedJson(credentials) = ValidatedJson::<Credentials>::from_request(req, &())
            .await
            .unwrap();

        assert_eq!(credentials.email, "john@x.com");
    }

    #[tokio::test]
    async fn test_rejects_missing_fields() {
        let req = json_request(r#"{"email": "john@x.com"}"#);

        let err = ValidatedJson::<Credentials>::from_request(req, &())
            .await
            .unwrap_err();

        match err {
            AppError::Validation { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].path, "body.password");
                assert_eq!(violations[0].error_code, codes::REQUIRED);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        let req = json_request("{not json");

        let err = ValidatedJson::<Credentials>::from_request(req, &())
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_wrong_field_type() {
        let req = json_request(r#"{"email": 42, "password": "secret1"}"#);

        let err = ValidatedJson::<Credentials>::from_request(req, &())
            .await
            .unwrap_err();

        match err {
            AppError::Validation { violations, .. } => {
                assert_eq!(violations[0].error_code, codes::TYPE);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    async fn user_id_from(uri: &str) -> Result<String, AppError> {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (mut parts, _) = req.into_parts();
        UserIdQuery::from_request_parts(&mut parts, &())
            .await
            .map(|UserIdQuery(user_id)| user_id)
    }

    #[tokio::test]
    async fn test_user_id_query() {
        assert_eq!(user_id_from("/?userId=u1").await.unwrap(), "u1");

        match user_id_from("/").await.unwrap_err() {
            AppError::Validation { violations, .. } => {
                assert_eq!(violations[0].path, "query.userId");
                assert_eq!(violations[0].error_code, codes::REQUIRED);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_repeated_user_id_is_structured_error() {
        match user_id_from("/?userId=a&userId=b").await.unwrap_err() {
            AppError::Validation { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].path, "query");
                assert_eq!(violations[0].error_code, codes::TYPE);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_respond_refuses_invalid_body() {
        let bad = UserView {
            id: "u1".to_string(),
            username: "john".to_string(),
            email: "not-an-email".to_string(),
        };

        let err = respond(StatusCode::OK, bad).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let good = UserView {
            id: "u1".to_string(),
            username: "john".to_string(),
            email: "john@x.com".to_string(),
        };
        assert_eq!(respond(StatusCode::OK, good).unwrap().status(), StatusCode::OK);
    }
}
