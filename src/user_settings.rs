//! Updating individual fields of a user
//!
//! Each field lives at its own resource below `/iam/users/{username}`. A
//! user may change some of their own fields; changing other users normally
//! requires an administrator role.

use serde::Serialize;

use crate::coap_types::{Method, ResponseCode};
use crate::connection::Connection;
use crate::endpoint::{Endpoint, ErrorTable, USER_WRITE_ERRORS};
use crate::error::{IamError, Result};
use crate::types::Fcm;

/// A 4.04 on the role resource does not say whether the user or the role is missing
const ROLE_ERRORS: ErrorTable = &[
    (ResponseCode::BadRequest, IamError::InvalidInput),
    (ResponseCode::Forbidden, IamError::Forbidden),
    (ResponseCode::NotFound, IamError::RoleDoesNotExist),
];

const USERNAME_ERRORS: ErrorTable = &[
    (ResponseCode::BadRequest, IamError::InvalidInput),
    (ResponseCode::Forbidden, IamError::Forbidden),
    (ResponseCode::NotFound, IamError::UserDoesNotExist),
    (ResponseCode::Conflict, IamError::UsernameExists),
];

async fn put_user_field<C, T>(
    connection: &C,
    username: &str,
    field: &str,
    errors: ErrorTable,
    value: &T,
) -> Result<()>
where
    C: Connection,
    T: Serialize + ?Sized,
{
    Endpoint::user(
        Method::Put,
        username,
        &format!("/{}", field),
        ResponseCode::Changed,
        errors,
    )?
    .execute_with(connection, value)
    .await
}

pub async fn update_user_display_name<C: Connection>(
    connection: &C,
    username: &str,
    display_name: &str,
) -> Result<()> {
    put_user_field(
        connection,
        username,
        "display-name",
        USER_WRITE_ERRORS,
        display_name,
    )
    .await
}

/// Register the user for push notifications through Firebase Cloud Messaging
pub async fn update_user_fcm<C: Connection>(
    connection: &C,
    username: &str,
    project_id: &str,
    token: &str,
) -> Result<()> {
    let fcm = Fcm {
        project_id: project_id.to_string(),
        token: token.to_string(),
    };
    put_user_field(connection, username, "fcm", USER_WRITE_ERRORS, &fcm).await
}

/// Bind the user to the client with the given public key fingerprint
pub async fn update_user_fingerprint<C: Connection>(
    connection: &C,
    username: &str,
    fingerprint: &str,
) -> Result<()> {
    put_user_field(
        connection,
        username,
        "fingerprint",
        USER_WRITE_ERRORS,
        fingerprint,
    )
    .await
}

/// Replace the set of push notification categories the user subscribes to
pub async fn update_user_notification_categories<C: Connection>(
    connection: &C,
    username: &str,
    categories: &[String],
) -> Result<()> {
    put_user_field(
        connection,
        username,
        "notification-categories",
        USER_WRITE_ERRORS,
        categories,
    )
    .await
}

/// Set the password used for Password Invite pairing
pub async fn update_user_password<C: Connection>(
    connection: &C,
    username: &str,
    password: &str,
) -> Result<()> {
    put_user_field(connection, username, "password", USER_WRITE_ERRORS, password).await
}

/// # Errors
/// `RoleDoesNotExist` when the device answers 4.04, which it also does for an
/// unknown user.
pub async fn update_user_role<C: Connection>(
    connection: &C,
    username: &str,
    role: &str,
) -> Result<()> {
    put_user_field(connection, username, "role", ROLE_ERRORS, role).await
}

pub async fn update_user_sct<C: Connection>(
    connection: &C,
    username: &str,
    sct: &str,
) -> Result<()> {
    put_user_field(connection, username, "sct", USER_WRITE_ERRORS, sct).await
}

/// Rename a user
pub async fn update_user_username<C: Connection>(
    connection: &C,
    username: &str,
    new_username: &str,
) -> Result<()> {
    put_user_field(connection, username, "username", USERNAME_ERRORS, new_username).await
}
