use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::Json;

use crate::errors::ApiError;

/// `Json` whose rejections render as the API error envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejections render as the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
