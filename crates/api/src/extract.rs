//! Request body extractors.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// A JSON body that has been deserialized and validated.
///
/// Rejects with `400 VALIDATION_ERROR` when the body does not parse or any
/// field fails its rules, before the handler runs.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<CreateTrack>) -> AppResult<...> { ... }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
