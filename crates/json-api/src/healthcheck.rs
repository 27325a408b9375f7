//! Liveness probe

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Liveness report. The database is not consulted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,

    /// Crate version of the running binary
    pub version: String,
}

#[endpoint(tags("health"), summary = "Liveness probe")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn healthcheck_reports_ok_and_version() -> TestResult {
        let service = Service::new(Router::with_path("healthcheck").get(handler));

        let mut response = TestClient::get("http://example.com/healthcheck")
            .send(&service)
            .await;

        assert_eq!(response.status_code, Some(StatusCode::OK));

        let body: HealthResponse = response.take_json().await?;

        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));

        Ok(())
    }
}
