//! Device information and device-wide lists

use crate::coap_types::{Method, ResponseCode};
use crate::connection::Connection;
use crate::endpoint::{Endpoint, ErrorTable, READ_ERRORS, WRITE_ERRORS};
use crate::error::{IamError, Result};
use crate::types::DeviceDetails;

/// 4.03 on `GET /iam/pairing` means the policy lacks `IAM:GetPairing`
const DETAILS_ERRORS: ErrorTable = &[
    (ResponseCode::Forbidden, IamError::BlockedByDeviceConfiguration),
    (ResponseCode::NotFound, IamError::IamNotSupported),
];

/// Retrieve device information that does not require a paired user
pub async fn get_device_details<C: Connection>(connection: &C) -> Result<DeviceDetails> {
    Endpoint::new(
        Method::Get,
        "/iam/pairing",
        ResponseCode::Content,
        DETAILS_ERRORS,
    )
    .fetch(connection)
    .await
}

/// Update the device's friendly name
pub async fn update_device_friendly_name<C: Connection>(
    connection: &C,
    friendly_name: &str,
) -> Result<()> {
    Endpoint::new(
        Method::Put,
        "/iam/device-info/friendly-name",
        ResponseCode::Changed,
        WRITE_ERRORS,
    )
    .execute_with(connection, friendly_name)
    .await
}

/// Roles defined on the device
pub async fn list_roles<C: Connection>(connection: &C) -> Result<Vec<String>> {
    Endpoint::new(Method::Get, "/iam/roles", ResponseCode::Content, READ_ERRORS)
        .fetch(connection)
        .await
}

/// Push notification categories defined on the device
pub async fn list_notification_categories<C: Connection>(connection: &C) -> Result<Vec<String>> {
    Endpoint::new(
        Method::Get,
        "/iam/notification-categories",
        ResponseCode::Content,
        READ_ERRORS,
    )
    .fetch(connection)
    .await
}
