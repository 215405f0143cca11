/*
 * Responsibility
 * - user operations that need more than a single repo call
 *   (credential checks, password hashing)
 * - handlers stay thin; repos never see plain-text passwords
 */
use crate::error::AppError;
use crate::repos::{
    Db,
    user_repo::{self, NewUserRow, UserPatch, UserRow},
};
use crate::services::password;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// Unknown usernames still pay for one hash check.
pub async fn authenticate(
    db: &Db,
    username: &str,
    plain_password: &str,
) -> Result<UserRow, AppError> {
    let invalid =
        || AppError::bad_request("INVALID_CREDENTIALS", "Username or password is incorrect");

    let Some(user) = user_repo::find_by_username(db, username)? else {
        password::verify_dummy(plain_password).await?;
        return Err(invalid());
    };
    if !password::verify(plain_password, &user.password_hash).await? {
        return Err(invalid());
    }

    Ok(user)
}

pub async fn register(db: &Db, new: NewUser, plain_password: &str) -> Result<UserRow, AppError> {
    let password_hash = password::hash(plain_password).await?;

    let row = user_repo::create(
        db,
        NewUserRow {
            first_name: new.first_name,
            last_name: new.last_name,
            username: new.username,
            password_hash,
        },
    )?;

    tracing::info!(user_id = row.id, "user registered");
    Ok(row)
}

/// `patch.password_hash` is ignored; pass the new plain password instead.
pub async fn update(
    db: &Db,
    user_id: i64,
    mut patch: UserPatch,
    plain_password: Option<&str>,
) -> Result<UserRow, AppError> {
    patch.password_hash = match plain_password {
        Some(plain) => Some(password::hash(plain).await?),
        None => None,
    };

    user_repo::update(db, user_id, patch)?.ok_or(AppError::not_found("user"))
}
