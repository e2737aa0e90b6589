/// Request extractors
///
/// [`ApiJson`] behaves like `axum::Json` but rejects bad bodies with the
/// standard error envelope instead of axum's plain-text rejection.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor with enveloped rejections
///
/// - Malformed JSON or a wrong content type: 400
/// - Well-formed JSON of the wrong shape (missing or unknown fields): 422
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
