use chrono::{DateTime, Utc};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub version: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponse { pub user_id: i32, pub email: String, pub token: String, pub expires_at: DateTime<Utc> }

#[derive(ToSchema)]
pub struct MeResponse { pub user_id: String, pub email: String, pub permissions: Vec<String> }

#[derive(ToSchema)]
pub struct UserInput { pub first_name: String, pub last_name: String, pub email: String, pub phone_number: String }

#[derive(ToSchema)]
pub struct UserDoc { pub id: i32, pub first_name: String, pub last_name: String, pub email: String, pub phone_number: String }

#[derive(ToSchema)]
pub struct CreatedResponse { pub id: i32 }

#[derive(ToSchema)]
pub struct PasswordRequest { pub password: String }

#[derive(ToSchema)]
pub struct PermissionsRequest { pub permissions: Vec<String> }

#[derive(ToSchema)]
pub struct PrisonDoc { pub id: i32, pub name: String, pub code: String, pub location: String, pub capacity: i32 }

#[derive(ToSchema)]
pub struct ManagementDoc { pub id: i32, pub name: String, pub description: Option<String> }

#[derive(ToSchema)]
pub struct CourtDoc { pub id: i32, pub name: String, pub location: String }

// The reference handlers are generic, so their paths are declared here.
#[utoipa::path(get, path = "/prisons", tag = "reference", security(("bearer_auth" = [])), responses((status = 200, description = "Prisons", body = [PrisonDoc])))]
#[allow(dead_code)]
fn list_prisons() {}

#[utoipa::path(post, path = "/prisons", tag = "reference", security(("bearer_auth" = [])), request_body = PrisonDoc, responses((status = 201, description = "Created", body = PrisonDoc), (status = 409, description = "Duplicate code")))]
#[allow(dead_code)]
fn create_prison() {}

#[utoipa::path(get, path = "/managements", tag = "reference", security(("bearer_auth" = [])), responses((status = 200, description = "Managements", body = [ManagementDoc])))]
#[allow(dead_code)]
fn list_managements() {}

#[utoipa::path(post, path = "/managements", tag = "reference", security(("bearer_auth" = [])), request_body = ManagementDoc, responses((status = 201, description = "Created", body = ManagementDoc), (status = 409, description = "Duplicate name")))]
#[allow(dead_code)]
fn create_management() {}

#[utoipa::path(get, path = "/courts", tag = "reference", security(("bearer_auth" = [])), responses((status = 200, description = "Courts", body = [CourtDoc])))]
#[allow(dead_code)]
fn list_courts() {}

#[utoipa::path(post, path = "/courts", tag = "reference", security(("bearer_auth" = [])), request_body = CourtDoc, responses((status = 201, description = "Created", body = CourtDoc)))]
#[allow(dead_code)]
fn create_court() {}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::users::list_users,
        crate::routes::users::create_user,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
        crate::routes::users::set_password,
        crate::routes::users::replace_permissions,
        list_prisons,
        create_prison,
        list_managements,
        create_management,
        list_courts,
        create_court,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            MeResponse,
            UserInput,
            UserDoc,
            CreatedResponse,
            PasswordRequest,
            PermissionsRequest,
            PrisonDoc,
            ManagementDoc,
            CourtDoc,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "reference")
    )
)]
pub struct ApiDoc;
