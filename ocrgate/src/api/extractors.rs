use axum::extract::multipart::MultipartRejection;
use axum::extract::{FromRequest, Multipart, Request};

use crate::error::OcrGateError;

/// `Multipart` whose rejection is reported as a 400 `{ error, code }` body.
///
/// Implemented by hand: `Multipart` takes no type parameter, so
/// `#[from_request(via(..))]` cannot wrap it.
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = OcrGateError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Ok(Self(multipart))
    }
}

impl From<MultipartRejection> for OcrGateError {
    fn from(rejection: MultipartRejection) -> Self {
        OcrGateError::Validation(format!("Invalid multipart request: {}", rejection.body_text()))
    }
}
