//! Placeholder images.
//!
//! `/api/placeholder/{width}/{height}` renders a neutral SVG of the requested
//! size. Demo and newly registered profiles use it as their avatar.

use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::{AppError, Result};

/// Largest side accepted, in pixels.
pub const MAX_SIDE: u32 = 2000;

/// Build the SVG markup for a `width` x `height` placeholder.
#[must_use]
pub fn svg(width: u32, height: u32) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\"><rect width=\"100%\" height=\"100%\" fill=\"#e5e7eb\"/></svg>"
    )
}

/// Serve a placeholder image.
pub async fn show(Path((width, height)): Path<(u32, u32)>) -> Result<Response> {
    if !(1..=MAX_SIDE).contains(&width) || !(1..=MAX_SIDE).contains(&height) {
        return Err(AppError::BadRequest(format!(
            "placeholder size must be between 1 and {MAX_SIDE}"
        )));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        svg(width, height),
    )
        .into_response())
}
