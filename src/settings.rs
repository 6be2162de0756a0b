//! System-wide IAM settings
//!
//! These are the device's runtime switches for the pairing modes. They are
//! distinct from the modes offered to the current connection, which
//! [`get_device_details`](crate::get_device_details) reports.

use crate::coap_types::{Method, ResponseCode};
use crate::connection::Connection;
use crate::endpoint::{Endpoint, READ_ERRORS, WRITE_ERRORS};
use crate::error::Result;
use crate::types::IamSettings;

/// Read the system IAM settings
pub async fn get_iam_settings<C: Connection>(connection: &C) -> Result<IamSettings> {
    Endpoint::new(
        Method::Get,
        "/iam/settings",
        ResponseCode::Content,
        READ_ERRORS,
    )
    .fetch(connection)
    .await
}

/// Enable or disable Password Open pairing
pub async fn update_iam_settings_password_open_pairing<C: Connection>(
    connection: &C,
    enabled: bool,
) -> Result<()> {
    update_setting(connection, "password-open-pairing", enabled).await
}

/// Enable or disable Password Invite pairing
pub async fn update_iam_settings_password_invite_pairing<C: Connection>(
    connection: &C,
    enabled: bool,
) -> Result<()> {
    update_setting(connection, "password-invite-pairing", enabled).await
}

/// Enable or disable Local Open pairing
pub async fn update_iam_settings_local_open_pairing<C: Connection>(
    connection: &C,
    enabled: bool,
) -> Result<()> {
    update_setting(connection, "local-open-pairing", enabled).await
}

async fn update_setting<C: Connection>(connection: &C, setting: &str, enabled: bool) -> Result<()> {
    Endpoint::new(
        Method::Put,
        format!("/iam/settings/{}", setting),
        ResponseCode::Changed,
        WRITE_ERRORS,
    )
    .execute_with(connection, &enabled)
    .await
}
