//! Server construction and wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use userdir::ApiDoc;
use userdir::domain::ports::InMemoryUserRepository;
use userdir::inbound::http::HttpState;
use userdir::inbound::http::status::service_status;
use userdir::inbound::http::users::{
    create_user, delete_user, get_user, list_users, update_user,
};
use userdir::outbound::persistence::DieselUserRepository;

/// Pick the repository backing the HTTP state.
///
/// A configured pool gets the Diesel adapter; otherwise requests are served
/// from the in-memory store, which keeps local runs working without a
/// database.
fn build_http_state(config: &ServerConfig) -> HttpState {
    match config.db_pool() {
        Some(pool) => {
            info!("using PostgreSQL-backed user repository");
            HttpState::new(Arc::new(DieselUserRepository::new(pool.clone())))
        }
        None => {
            info!("no database configured; using in-memory user repository");
            HttpState::new(Arc::new(InMemoryUserRepository::new()))
        }
    }
}

fn build_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(state)
        .service(service_status)
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server described by `config`.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(build_http_state(&config));
    let server = HttpServer::new(move || build_app(state.clone()))
        .bind(config.bind_addr())?
        .run();
    Ok(server)
}
