//! Service status endpoint.

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "user directory API running successfully")]
    pub msg: String,
}

/// Report that the service is up.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service status", body = StatusResponse)
    ),
    tags = ["status"],
    operation_id = "serviceStatus"
)]
#[get("/")]
pub async fn service_status() -> web::Json<StatusResponse> {
    web::Json(StatusResponse {
        msg: "user directory API running successfully".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    #[actix_web::test]
    async fn status_endpoint_reports_a_message() {
        let app = actix_test::init_service(App::new().service(service_status)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/").to_request(),
        )
        .await;

        assert!(response.status().is_success());
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("status payload");
        assert_eq!(
            value.get("msg").and_then(Value::as_str),
            Some("user directory API running successfully")
        );
    }
}
