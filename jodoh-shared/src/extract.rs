use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections come back in the service error envelope
/// (`E0002`) instead of axum's plain-text 4xx.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
