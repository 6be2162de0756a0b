//! IAM records exchanged with the device

use serde::{Deserialize, Serialize};

/// Pairing modes a device can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairingMode {
    /// First user on the LAN becomes the initial (admin) user
    LocalInitial,
    /// Anybody on the LAN may pair
    LocalOpen,
    /// Anybody knowing the device-wide pairing password may pair
    PasswordOpen,
    /// Invited users pair with their own username and password
    PasswordInvite,
}

impl PairingMode {
    /// Parse the mode name used in the device details `Modes` list
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "LocalInitial" => Some(Self::LocalInitial),
            "LocalOpen" => Some(Self::LocalOpen),
            "PasswordOpen" => Some(Self::PasswordOpen),
            "PasswordInvite" => Some(Self::PasswordInvite),
            _ => None,
        }
    }

    /// Mode name as the device reports it
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalInitial => "LocalInitial",
            Self::LocalOpen => "LocalOpen",
            Self::PasswordOpen => "PasswordOpen",
            Self::PasswordInvite => "PasswordInvite",
        }
    }
}

impl std::fmt::Display for PairingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device information available before pairing (`GET /iam/pairing`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceDetails {
    /// Raw pairing mode names, see [`DeviceDetails::pairing_modes`]
    #[serde(default)]
    pub modes: Vec<String>,
    #[serde(default)]
    pub nabto_version: String,
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

impl DeviceDetails {
    /// Pairing modes currently enabled, skipping modes this crate does not know
    pub fn pairing_modes(&self) -> Vec<PairingMode> {
        self.modes
            .iter()
            .filter_map(|m| PairingMode::from_wire(m))
            .collect()
    }
}

/// System-wide IAM settings (`GET /iam/settings`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IamSettings {
    #[serde(default)]
    pub password_open_pairing: bool,
    #[serde(default)]
    pub password_invite_pairing: bool,
    #[serde(default)]
    pub local_open_pairing: bool,
    #[serde(default)]
    pub local_initial_pairing: bool,
}

/// Firebase Cloud Messaging registration of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fcm {
    pub project_id: String,
    pub token: String,
}

/// A user in the device's IAM database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IamUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Public key fingerprint of the client the user is bound to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Server connect token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Only ever sent, devices do not return passwords
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcm: Option<Fcm>,
    #[serde(default)]
    pub notification_categories: Vec<String>,
}

impl IamUser {
    /// Create a user with only a username set
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}
