pub mod docs;
pub mod middleware;
pub mod router;
pub mod sales;
pub mod users;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::metrics::Snapshot;

pub const DATA_SOURCE_HEADER: &str = "x-data-source";

/// Snapshot body plus the origin header; never cached.
pub(crate) fn snapshot_response<T: Serialize>(snapshot: Snapshot<T>) -> Response {
    (
        [
            (DATA_SOURCE_HEADER, snapshot.origin.as_str()),
            ("cache-control", "no-store"),
        ],
        Json(snapshot.data),
    )
        .into_response()
}
