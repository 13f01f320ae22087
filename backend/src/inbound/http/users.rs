//! Registration and login endpoints.
//!
//! ```text
//! POST /api/v1/register {"email":"ada@example.com","password":"pw","city":"Vilnius"}
//! POST /api/v1/login {"email":"ada@example.com","password":"pw"}
//! ```

use std::collections::BTreeSet;

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, PublicUser, Registration, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PublicUserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_credentials_error, parse_date};

/// Registration body for `POST /api/v1/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "correct horse battery staple")]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "1990-04-01")]
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let profile = UserProfile {
            first_name: value.first_name,
            last_name: value.last_name,
            birth_date: parse_date(value.birth_date, FieldName::new("birthDate"))?,
            phone: value.phone,
            city: value.city,
            interests: value
                .interests
                .into_iter()
                .map(|interest| interest.trim().to_owned())
                .filter(|interest| !interest.is_empty())
                .collect::<BTreeSet<_>>(),
        };
        Registration::try_new(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
            profile,
        )
        .map_err(map_credentials_error)
    }
}

/// Login body for `POST /api/v1/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
        .map_err(map_credentials_error)
    }
}

/// Public user payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(value_type = PublicUserSchema)]
    pub user: PublicUser,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorSchema),
        (status = 409, description = "User already exists", body = ErrorSchema),
        (status = 503, description = "User directory unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.registration.register(registration).await?;
    Ok(HttpResponse::Ok().json(UserResponse { ok: true, user }))
}

/// Check credentials.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "User directory unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.registration.login(credentials).await?;
    Ok(HttpResponse::Ok().json(UserResponse { ok: true, user }))
}
