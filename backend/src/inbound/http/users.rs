//! Users API handlers.
//!
//! ```text
//! GET    /users
//! GET    /users/{user_id}
//! POST   /users/           {"name":"Ann","email":"ann@x.com","role":"admin"}
//! PUT    /user/{user_id}   {"name":"Ann","email":"ann@x.com","role":"admin"}
//! DELETE /users/{user_id}
//! ```
//!
//! The update route keeps the singular `/user/` prefix of the reference
//! surface; every other route lives under `/users`.

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{DomainError, User, UserDraft, UserId, UserValidationError};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiError, ApiResult};

/// Request body for create and update.
///
/// Example JSON:
/// `{"name":"Ann","email":"ann@x.com","role":"admin"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserPayload {
    #[schema(example = "Ann")]
    pub name: String,
    #[schema(example = "ann@x.com")]
    pub email: String,
    #[schema(example = "admin")]
    pub role: String,
}

impl TryFrom<UserPayload> for UserDraft {
    type Error = UserValidationError;

    fn try_from(value: UserPayload) -> Result<Self, Self::Error> {
        Self::try_from_strings(value.name, value.email, value.role)
    }
}

fn map_validation_error(err: UserValidationError) -> DomainError {
    let code = match err {
        UserValidationError::EmptyField { .. } => "empty_field",
        UserValidationError::FieldTooLong { .. } => "field_too_long",
    };
    DomainError::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field().as_str(), "code": code }))
}

fn parse_payload(payload: web::Json<UserPayload>) -> Result<UserDraft, ApiError> {
    UserDraft::try_from(payload.into_inner())
        .map_err(|err| ApiError::from(map_validation_error(err)))
}

/// List all users.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users in insertion order", body = [User]),
        (status = 500, description = "Internal server error", body = DomainError),
        (status = 503, description = "Database unavailable", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = i32, Path, description = "Target user identifier")),
    responses(
        (status = 200, description = "The requested user", body = User),
        (status = 404, description = "User not found", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    path: web::Path<i32>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.get_user(UserId::new(path.into_inner())).await?;
    Ok(web::Json(user))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = UserPayload,
    responses(
        (status = 200, description = "The created user, with its generated id", body = User),
        (status = 400, description = "A field failed validation", body = DomainError),
        (status = 409, description = "Email already registered", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users/")]
pub async fn create_user(
    payload: web::Json<UserPayload>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<User>> {
    let draft = parse_payload(payload)?;
    let user = state.users.create_user(draft).await?;
    Ok(web::Json(user))
}

/// Replace the name, email, and role of a user.
#[utoipa::path(
    put,
    path = "/user/{user_id}",
    params(("user_id" = i32, Path, description = "Target user identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "The updated user", body = User),
        (status = 400, description = "A field failed validation", body = DomainError),
        (status = 404, description = "User does not exist", body = DomainError),
        (status = 409, description = "Email already registered", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/user/{user_id}")]
pub async fn update_user(
    path: web::Path<i32>,
    payload: web::Json<UserPayload>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<User>> {
    let draft = parse_payload(payload)?;
    let user = state
        .users
        .update_user(UserId::new(path.into_inner()), draft)
        .await?;
    Ok(web::Json(user))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = i32, Path, description = "Target user identifier")),
    responses(
        (status = 200, description = "The deleted user's last stored state", body = User),
        (status = 404, description = "User does not exist", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    path: web::Path<i32>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<User>> {
    let user = state
        .users
        .delete_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::InMemoryUserRepository;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(Arc::new(InMemoryUserRepository::new()));
        App::new()
            .app_data(web::Data::new(state))
            .service(list_users)
            .service(get_user)
            .service(create_user)
            .service(update_user)
            .service(delete_user)
    }

    fn payload(name: &str, email: &str, role: &str) -> UserPayload {
        UserPayload {
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }

    async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
        let body = actix_test::read_body(response).await;
        serde_json::from_slice(&body).expect("JSON body")
    }

    #[actix_web::test]
    async fn create_returns_the_generated_id_and_wire_field_names() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/users/")
                .set_json(payload("Ann", "ann@x.com", "admin"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let value = read_json(response).await;
        assert_eq!(value["user_id"], 1);
        assert_eq!(value["user_name"], "Ann");
        assert_eq!(value["user_email"], "ann@x.com");
        assert_eq!(value["user_role"], "admin");
    }

    #[actix_web::test]
    async fn duplicate_email_create_returns_conflict() {
        let app = actix_test::init_service(test_app()).await;
        let create = |email: &str| {
            actix_test::TestRequest::post()
                .uri("/users/")
                .set_json(payload("Ann", email, "admin"))
                .to_request()
        };

        let first = actix_test::call_service(&app, create("ann@x.com")).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = actix_test::call_service(&app, create("ann@x.com")).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let value = read_json(second).await;
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("User already exists")
        );
        assert_eq!(value.get("code").and_then(Value::as_str), Some("conflict"));
    }

    #[rstest]
    #[case("", "ann@x.com", "admin", "name")]
    #[case("Ann", "   ", "admin", "email")]
    #[case("Ann", "ann@x.com", "", "role")]
    #[actix_web::test]
    async fn create_rejects_blank_fields_with_details(
        #[case] name: &str,
        #[case] email: &str,
        #[case] role: &str,
        #[case] expected_field: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/users/")
                .set_json(payload(name, email, role))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = read_json(response).await;
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
        let details = value.get("details").expect("details present");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some(expected_field)
        );
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("empty_field")
        );
    }

    #[actix_web::test]
    async fn get_missing_user_returns_not_found_message() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/users/99").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value = read_json(response).await;
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("User not found")
        );
    }

    #[actix_web::test]
    async fn update_uses_the_singular_user_path_and_replaces_all_fields() {
        let app = actix_test::init_service(test_app()).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/users/")
                .set_json(payload("Ann", "ann@x.com", "admin"))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::OK);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/user/1")
                .set_json(payload("Anne", "anne@x.com", "auditor"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let value = read_json(response).await;
        assert_eq!(value["user_id"], 1);
        assert_eq!(value["user_name"], "Anne");
        assert_eq!(value["user_email"], "anne@x.com");
        assert_eq!(value["user_role"], "auditor");
    }

    #[rstest]
    #[case::update_missing(
        actix_test::TestRequest::put()
            .uri("/user/5")
            .set_json(UserPayload {
                name: "Ann".into(),
                email: "ann@x.com".into(),
                role: "admin".into(),
            })
    )]
    #[case::delete_missing(actix_test::TestRequest::delete().uri("/users/5"))]
    #[actix_web::test]
    async fn mutating_a_missing_user_returns_does_not_exist(
        #[case] request: actix_test::TestRequest,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(&app, request.to_request()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value = read_json(response).await;
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("User does not exist")
        );
    }

    #[actix_web::test]
    async fn delete_returns_the_removed_representation() {
        let app = actix_test::init_service(test_app()).await;

        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/users/")
                .set_json(payload("Ann", "ann@x.com", "admin"))
                .to_request(),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri("/users/1").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value = read_json(response).await;
        assert_eq!(value["user_name"], "Ann");

        let listed = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/users").to_request(),
        )
        .await;
        let value = read_json(listed).await;
        assert_eq!(value.as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn list_returns_created_users_in_insertion_order() {
        let app = actix_test::init_service(test_app()).await;
        for (name, email) in [("Ann", "ann@x.com"), ("Ben", "ben@x.com")] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/users/")
                    .set_json(payload(name, email, "user"))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/users").to_request(),
        )
        .await;
        let value = read_json(response).await;
        let names: Vec<&str> = value
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|u| u.get("user_name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["Ann", "Ben"]);
    }
}
