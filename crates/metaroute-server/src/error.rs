use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while configuring or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("registry error: {0}")]
    Registry(#[from] metaroute_registry::RegistryError),

    #[error("store error: {0}")]
    Store(#[from] metaroute_store::StoreError),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Client-visible failure of one API request.
///
/// Every variant renders as `{ "code", "message", "data": { "status" } }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "Could not determine whether `{base}` is a post or a taxonomy. Is the post or taxonomy \
         enabled in the REST API? Does its registration specify a `rest_base`?"
    )]
    CannotDetermineObjectType { base: String },

    #[error("The body of the request is missing an array of meta keys to delete called `keys`.")]
    InvalidKeysArray,

    #[error("Missing parameter(s): {0}")]
    MissingParam(String),

    #[error("Invalid parameter(s): {param} ({reason})")]
    InvalidParam { param: String, reason: String },

    /// Permission gate denial. 401 for anonymous actors, 403 otherwise.
    #[error("Sorry, you are not allowed to do that.")]
    Forbidden { anonymous: bool },

    #[error("No route was found matching the URL and request method.")]
    NoRoute,

    #[error("Could not access meta storage: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::CannotDetermineObjectType { .. } => "rest_cannot_determine_object_type",
            Self::InvalidKeysArray => "rest_invalid_keys_array",
            Self::MissingParam(_) => "rest_missing_callback_param",
            Self::InvalidParam { .. } => "rest_invalid_param",
            Self::Forbidden { .. } => "rest_forbidden",
            Self::NoRoute => "rest_no_route",
            Self::Storage(_) => "rest_storage_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::CannotDetermineObjectType { .. }
            | Self::InvalidKeysArray
            | Self::MissingParam(_)
            | Self::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden { anonymous: true } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { anonymous: false } => StatusCode::FORBIDDEN,
            Self::NoRoute => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
            data: ErrorData {
                status: self.status().as_u16(),
            },
        }
    }
}

impl From<metaroute_store::StoreError> for ApiError {
    fn from(err: metaroute_store::StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

// Captures that fail to decode did not match the route pattern.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::NoRoute
    }
}

impl From<BytesRejection> for ApiError {
    fn from(err: BytesRejection) -> Self {
        Self::InvalidParam {
            param: "body".into(),
            reason: err.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::InvalidParam {
            param: "query".into(),
            reason: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}

/// Wire shape of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub data: ErrorData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_and_statuses() {
        let cases = [
            (
                ApiError::CannotDetermineObjectType { base: "widgets".into() },
                "rest_cannot_determine_object_type",
                400,
            ),
            (ApiError::InvalidKeysArray, "rest_invalid_keys_array", 400),
            (ApiError::MissingParam("value".into()), "rest_missing_callback_param", 400),
            (
                ApiError::InvalidParam {
                    param: "body".into(),
                    reason: "too large".into(),
                },
                "rest_invalid_param",
                400,
            ),
            (ApiError::Forbidden { anonymous: true }, "rest_forbidden", 401),
            (ApiError::Forbidden { anonymous: false }, "rest_forbidden", 403),
            (ApiError::NoRoute, "rest_no_route", 404),
            (ApiError::Storage("disk full".into()), "rest_storage_error", 500),
        ];
        for (err, code, status) in cases {
            let body = err.to_body();
            assert_eq!(body.code, code);
            assert_eq!(body.data.status, status);
        }
    }

    #[test]
    fn cannot_determine_message_names_the_base() {
        let err = ApiError::CannotDetermineObjectType { base: "widgets".into() };
        assert!(err.to_string().contains("`widgets`"));
    }

    #[test]
    fn body_serializes_to_wire_shape() {
        let json = serde_json::to_value(ApiError::InvalidKeysArray.to_body()).unwrap();
        assert_eq!(json["code"], "rest_invalid_keys_array");
        assert_eq!(json["data"]["status"], 400);
        assert!(json["message"].as_str().unwrap().contains("`keys`"));
    }

    #[test]
    fn store_errors_become_storage_errors() {
        let err: ApiError = metaroute_store::StoreError::ReadOnly.into();
        assert_eq!(err.code(), "rest_storage_error");
    }
}
