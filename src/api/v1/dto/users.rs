/*
 * Responsibility
 * - Users request/response DTOs (camelCase on the wire)
 * - mapping between entity rows and DTOs
 * - validate() for shape checks before anything reaches the service
 */
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repos::user_repo::{UserPatch, UserRow};
use crate::services::user_service::NewUser;

const MAX_NAME_LEN: usize = 100;

fn check_name(
    value: &str,
    required: &'static str,
    too_long: &'static str,
) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(required);
    }
    if value.len() > MAX_NAME_LEN {
        return Err(too_long);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    pub username: String,
    pub password: String,
}

impl AuthenticateRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("username and password are required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_name(&self.first_name, "firstName is required", "firstName is too long")?;
        check_name(&self.last_name, "lastName is required", "lastName is too long")?;
        check_name(&self.username, "username is required", "username is too long")?;
        if self.password.len() < 6 {
            return Err("password must be at least 6 chars");
        }
        Ok(())
    }
}

impl From<&RegisterRequest> for NewUser {
    fn from(req: &RegisterRequest) -> Self {
        Self {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            username: req.username.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(v) = &self.first_name {
            check_name(v, "firstName cannot be empty", "firstName is too long")?;
        }
        if let Some(v) = &self.last_name {
            check_name(v, "lastName cannot be empty", "lastName is too long")?;
        }
        if let Some(v) = &self.username {
            check_name(v, "username cannot be empty", "username is too long")?;
        }
        if let Some(pw) = &self.password
            && pw.len() < 6
        {
            return Err("password must be at least 6 chars");
        }
        Ok(())
    }
}

impl From<&UpdateUserRequest> for UserPatch {
    fn from(req: &UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name.as_deref().map(|v| v.trim().to_string()),
            last_name: req.last_name.as_deref().map(|v| v.trim().to_string()),
            username: req.username.as_deref().map(|v| v.trim().to_string()),
            password_hash: None,
        }
    }
}
