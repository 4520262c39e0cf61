pub mod accounts;
pub mod image;

/// GET / -> liveness probe.
pub async fn root_handler() -> &'static str {
    "success"
}
