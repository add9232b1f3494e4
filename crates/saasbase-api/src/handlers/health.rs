#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn root() -> &'static str {
    "OK"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = String))
)]
pub async fn health_check() -> &'static str {
    "HEALTHY"
}
