//! Extractors that report malformed requests as JSON [`ApiError`]s instead of
//! axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts};

use crate::api::error::ApiError;

/// `axum::Json` with [`ApiError`] as its rejection.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with [`ApiError`] as its rejection.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
