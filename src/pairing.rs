//! Pairing a client with a device
//!
//! Each pairing mode is a single POST to its own resource below
//! `/iam/pairing`. The password modes authenticate the connection first.
//! Whether a mode is usable depends on the device's IAM policy for the
//! unpaired role and on the mode being enabled at runtime, see
//! [`available_pairing_modes`].

use log::debug;

use crate::cbor::UsernameBody;
use crate::coap_types::{Method, ResponseCode};
use crate::connection::{Connection, ConnectionError};
use crate::device_info::get_device_details;
use crate::endpoint::{Endpoint, ErrorTable};
use crate::error::{Error, IamError, Result};
use crate::types::PairingMode;

const LOCAL_INITIAL_ERRORS: ErrorTable = &[
    (ResponseCode::Forbidden, IamError::BlockedByDeviceConfiguration),
    (ResponseCode::NotFound, IamError::PairingModeDisabled),
    (ResponseCode::Conflict, IamError::InitialUserAlreadyPaired),
];

const OPEN_ERRORS: ErrorTable = &[
    (ResponseCode::BadRequest, IamError::InvalidInput),
    (ResponseCode::Forbidden, IamError::BlockedByDeviceConfiguration),
    (ResponseCode::NotFound, IamError::PairingModeDisabled),
    (ResponseCode::Conflict, IamError::UsernameExists),
];

const INVITE_ERRORS: ErrorTable = &[
    (ResponseCode::Forbidden, IamError::BlockedByDeviceConfiguration),
    (ResponseCode::NotFound, IamError::PairingModeDisabled),
];

fn pairing_endpoint(mode: &str, errors: ErrorTable) -> Endpoint {
    Endpoint::new(
        Method::Post,
        format!("/iam/pairing/{}", mode),
        ResponseCode::Created,
        errors,
    )
}

/// Pair as the initial user using Local Initial pairing
///
/// Only the first client on the local network can do this; the device
/// assigns the configured initial username.
pub async fn pair_local_initial<C: Connection>(connection: &C) -> Result<()> {
    pairing_endpoint("local-initial", LOCAL_INITIAL_ERRORS)
        .execute(connection)
        .await
}

/// Pair using Local Open pairing, requesting `desired_username`
///
/// Anybody on the local network may pair in this mode, no password needed.
///
/// # Errors
/// `UsernameExists` if the name is taken, `InvalidInput` if the device rejects
/// it, `BlockedByDeviceConfiguration` or `PairingModeDisabled` if the mode is
/// unavailable.
pub async fn pair_local_open<C: Connection>(connection: &C, desired_username: &str) -> Result<()> {
    pairing_endpoint("local-open", OPEN_ERRORS)
        .execute_with(
            connection,
            &UsernameBody {
                username: desired_username,
            },
        )
        .await
}

/// Pair using Password Open pairing, requesting `desired_username`
///
/// `password` is the device-wide pairing password, not a user password. The
/// client does not have to be on the device's local network.
///
/// # Errors
/// In addition to those of [`pair_local_open`]: `AuthenticationError` for a
/// wrong password and `TooManyWrongPasswordAttempts` while the device is
/// backing off.
pub async fn pair_password_open<C: Connection>(
    connection: &C,
    desired_username: &str,
    password: &str,
) -> Result<()> {
    authenticate(connection, "", password).await?;
    pairing_endpoint("password-open", OPEN_ERRORS)
        .execute_with(
            connection,
            &UsernameBody {
                username: desired_username,
            },
        )
        .await
}

/// Pair using Password Invite pairing with an invited user's credentials
pub async fn pair_password_invite<C: Connection>(
    connection: &C,
    username: &str,
    password: &str,
) -> Result<()> {
    authenticate(connection, username, password).await?;
    pairing_endpoint("password-invite", INVITE_ERRORS)
        .execute(connection)
        .await
}

/// Pairing modes the device currently offers to this client
pub async fn available_pairing_modes<C: Connection>(connection: &C) -> Result<Vec<PairingMode>> {
    Ok(get_device_details(connection).await?.pairing_modes())
}

async fn authenticate<C: Connection>(connection: &C, username: &str, password: &str) -> Result<()> {
    debug!("password authenticating as {:?}", username);
    connection
        .password_authenticate(username, password)
        .await
        .map_err(|e| match e {
            ConnectionError::Unauthorized => Error::Iam(IamError::AuthenticationError),
            ConnectionError::TooManyRequests => {
                Error::Iam(IamError::TooManyWrongPasswordAttempts)
            }
            other => Error::Connection(other),
        })
}
