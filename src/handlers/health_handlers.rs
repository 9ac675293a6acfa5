//! Liveness handler.

/// `GET /healthcheck`
///
/// Always 200 with a plain `ok`; never touches the object store.
pub async fn healthcheck() -> &'static str {
    "ok"
}
