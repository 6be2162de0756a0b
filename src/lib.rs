//! edge-iam - high-level client for the IAM endpoints of Nabto Edge devices
//!
//! Devices built on the Nabto Edge Embedded SDK expose their Identity and
//! Access Management through CoAP resources below `/iam` with CBOR payloads.
//! This library wraps those resources in plain async functions: pair with a
//! device, read device details, manage users and the system IAM settings,
//! without dealing with CBOR or CoAP status codes.
//!
//! The transport stays with the device SDK: implement [`Connection`] for the
//! SDK's connection handle and pass it to any of the functions below.
//! Device-side failures come back as [`Error::Iam`] carrying an [`IamError`].
//!
//! Whether a call is allowed depends on the device's IAM policy and, for
//! pairing, on the pairing mode being enabled at runtime.
//!
//! # Example
//!
//! ```no_run
//! use edge_iam::{Connection, IamError, IamUser};
//!
//! async fn onboard<C: Connection>(connection: &C) -> edge_iam::Result<()> {
//!     if !edge_iam::is_current_user_paired(connection).await? {
//!         match edge_iam::pair_local_open(connection, "alice").await {
//!             Err(e) if e.iam_error() == Some(IamError::UsernameExists) => {
//!                 edge_iam::pair_local_open(connection, "alice-2").await?
//!             }
//!             other => other?,
//!         }
//!     }
//!
//!     let me = edge_iam::get_current_user(connection).await?;
//!     println!("paired as {} ({:?})", me.username, me.role);
//!
//!     let guest = IamUser::new("guest").with_role("Guest").with_password("s3cret");
//!     edge_iam::create_user(connection, &guest).await
//! }
//! ```

pub mod cbor;
pub mod coap_types;
mod connection;
mod device_info;
mod endpoint;
mod error;
mod pairing;
mod settings;
mod types;
mod user;
mod user_settings;


pub use connection::{Connection, ConnectionError};
pub use device_info::{
    get_device_details, list_notification_categories, list_roles, update_device_friendly_name,
};
pub use error::{Error, IamError, Result};
pub use pairing::{
    available_pairing_modes, pair_local_initial, pair_local_open, pair_password_invite,
    pair_password_open,
};
pub use settings::{
    get_iam_settings, update_iam_settings_local_open_pairing,
    update_iam_settings_password_invite_pairing, update_iam_settings_password_open_pairing,
};
pub use types::{DeviceDetails, Fcm, IamSettings, IamUser, PairingMode};
pub use user::{
    create_user, delete_user, get_current_user, get_user, is_current_user_paired, list_users,
};
pub use user_settings::{
    update_user_display_name, update_user_fcm, update_user_fingerprint,
    update_user_notification_categories, update_user_password, update_user_role, update_user_sct,
    update_user_username,
};
