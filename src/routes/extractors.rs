use crate::error::AcademicaError;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path},
    http::request::Parts,
};

/// `Json` that rejects with our `{error}` body instead of axum's plain text.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AcademicaError))]
pub struct ApiJson<T>(pub T);

/// The `{id}` path segment of an item endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = AcademicaError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}
