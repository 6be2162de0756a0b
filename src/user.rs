//! Reading, creating and deleting users

use log::debug;

use crate::cbor::UsernameBody;
use crate::coap_types::{Method, ResponseCode};
use crate::connection::Connection;
use crate::endpoint::{Endpoint, ErrorTable, READ_ERRORS};
use crate::error::{Error, IamError, Result};
use crate::types::IamUser;
use crate::user_settings;

const USER_READ_ERRORS: ErrorTable = &[
    (ResponseCode::Forbidden, IamError::Forbidden),
    (ResponseCode::NotFound, IamError::UserDoesNotExist),
];

const CREATE_ERRORS: ErrorTable = &[
    (ResponseCode::BadRequest, IamError::InvalidInput),
    (ResponseCode::Forbidden, IamError::Forbidden),
    (ResponseCode::Conflict, IamError::UsernameExists),
];

fn me() -> Endpoint {
    Endpoint::new(
        Method::Get,
        "/iam/me",
        ResponseCode::Content,
        USER_READ_ERRORS,
    )
}

/// The user that opened the connection
///
/// # Errors
/// `UserDoesNotExist` if the client is not paired with the device.
pub async fn get_current_user<C: Connection>(connection: &C) -> Result<IamUser> {
    me().fetch(connection).await
}

/// Whether the client behind `connection` is paired with the device
pub async fn is_current_user_paired<C: Connection>(connection: &C) -> Result<bool> {
    match me().execute(connection).await {
        Ok(()) => Ok(true),
        Err(Error::Iam(IamError::UserDoesNotExist)) => Ok(false),
        Err(e) => Err(e),
    }
}

pub async fn get_user<C: Connection>(connection: &C, username: &str) -> Result<IamUser> {
    Endpoint::user(
        Method::Get,
        username,
        "",
        ResponseCode::Content,
        USER_READ_ERRORS,
    )?
    .fetch(connection)
    .await
}

/// Usernames of all users on the device
pub async fn list_users<C: Connection>(connection: &C) -> Result<Vec<String>> {
    Endpoint::new(Method::Get, "/iam/users", ResponseCode::Content, READ_ERRORS)
        .fetch(connection)
        .await
}

/// Create a user and apply every field set on `user`
///
/// The device only takes a username on creation, the remaining fields are
/// written one by one afterwards. The first failing write aborts and is
/// returned; the user stays created with the fields written so far.
pub async fn create_user<C: Connection>(connection: &C, user: &IamUser) -> Result<()> {
    Endpoint::new(
        Method::Post,
        "/iam/users",
        ResponseCode::Created,
        CREATE_ERRORS,
    )
    .execute_with(
        connection,
        &UsernameBody {
            username: &user.username,
        },
    )
    .await?;
    debug!("created user {}", user.username);

    let username = user.username.as_str();
    if let Some(password) = &user.password {
        user_settings::update_user_password(connection, username, password).await?;
    }
    if let Some(role) = &user.role {
        user_settings::update_user_role(connection, username, role).await?;
    }
    if let Some(display_name) = &user.display_name {
        user_settings::update_user_display_name(connection, username, display_name).await?;
    }
    if let Some(sct) = &user.sct {
        user_settings::update_user_sct(connection, username, sct).await?;
    }
    if let Some(fingerprint) = &user.fingerprint {
        user_settings::update_user_fingerprint(connection, username, fingerprint).await?;
    }
    if let Some(fcm) = &user.fcm {
        user_settings::update_user_fcm(connection, username, &fcm.project_id, &fcm.token).await?;
    }
    if !user.notification_categories.is_empty() {
        user_settings::update_user_notification_categories(
            connection,
            username,
            &user.notification_categories,
        )
        .await?;
    }
    Ok(())
}

pub async fn delete_user<C: Connection>(connection: &C, username: &str) -> Result<()> {
    Endpoint::user(
        Method::Delete,
        username,
        "",
        ResponseCode::Deleted,
        USER_READ_ERRORS,
    )?
    .execute(connection)
    .await
}
