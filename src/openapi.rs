//! OpenAPI (Swagger) document for v1.
//!
//! Operations behind the bearer gate declare the `bearer` security requirement,
//! anonymous ones do not, so generated clients know where to send the
//! `Authorization` header. Served only outside production.

use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api::v1::{dto::users, handlers};

pub const SWAGGER_JSON_PATH: &str = "/swagger/v1/swagger.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bonbonniere Web API V1",
        version = "v1",
        description = "Bonbonniere Web API V1"
    ),
    paths(
        handlers::health::health,
        handlers::users::authenticate,
        handlers::users::register,
        handlers::users::list_users,
        handlers::users::me,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
    ),
    components(schemas(
        users::UserDto,
        users::AuthenticateRequest,
        users::AuthenticateResponse,
        users::RegisterRequest,
        users::UpdateUserRequest,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "users", description = "User accounts"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Standard Authorization header using the Bearer scheme"))
                    .build(),
            ),
        );
    }
}

pub async fn swagger_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
