//! In-memory stand-in for a device running the IAM module

use std::collections::BTreeMap;
use std::sync::Mutex;

use edge_iam::cbor;
use edge_iam::coap_types::{Method, Request, Response, ResponseCode};
use edge_iam::{Connection, ConnectionError, DeviceDetails, Fcm, IamSettings, IamUser};

pub const OPEN_PAIRING_PASSWORD: &str = "rHfMdaw4zpne";
pub const CLIENT_FINGERPRINT: &str = "fa11fa11fa11fa11fa11fa11fa11fa11fa11fa11fa11fa11fa11fa11fa11fa11";

#[derive(Debug)]
struct State {
    users: BTreeMap<String, IamUser>,
    settings: IamSettings,
    friendly_name: String,
    roles: Vec<String>,
    categories: Vec<String>,
    /// Username of the paired client, `None` while unpaired
    current: Option<String>,
    /// Username the connection authenticated as, `Some("")` for open pairing
    authenticated: Option<String>,
    wrong_passwords: u32,
}

/// A device with the same pairing setup as the stock TCP tunnel test device
pub struct FakeDevice {
    state: Mutex<State>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                users: BTreeMap::new(),
                settings: IamSettings {
                    password_open_pairing: true,
                    password_invite_pairing: true,
                    local_open_pairing: true,
                    local_initial_pairing: true,
                },
                friendly_name: "ZiCS1UxVBTcEP6Db".to_string(),
                roles: ["Unpaired", "Administrator", "Standard", "Guest"]
                    .map(String::from)
                    .to_vec(),
                categories: Vec::new(),
                current: None,
                authenticated: None,
                wrong_passwords: 0,
            }),
        }
    }

    /// Add a user with a password so it can pair through an invitation
    pub fn invite(&self, username: &str, password: &str) {
        let user = IamUser::new(username)
            .with_password(password)
            .with_role("Guest");
        self.state
            .lock()
            .unwrap()
            .users
            .insert(username.to_string(), user);
    }

    fn handle(&self, request: &Request) -> Response {
        let mut state = self.state.lock().unwrap();
        let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();

        match (request.method, segments.as_slice()) {
            (Method::Get, ["iam", "pairing"]) => {
                let s = state.settings;
                let mut modes = Vec::new();
                if s.local_initial_pairing && state.users.is_empty() {
                    modes.push("LocalInitial".to_string());
                }
                if s.local_open_pairing {
                    modes.push("LocalOpen".to_string());
                }
                if s.password_open_pairing {
                    modes.push("PasswordOpen".to_string());
                }
                if s.password_invite_pairing {
                    modes.push("PasswordInvite".to_string());
                }
                content(&DeviceDetails {
                    modes,
                    nabto_version: "5.12.0".to_string(),
                    app_version: Some("1.0.0".to_string()),
                    app_name: Some("fake".to_string()),
                    product_id: "pr-fake".to_string(),
                    device_id: "de-fake".to_string(),
                    friendly_name: Some(state.friendly_name.clone()),
                })
            }
            (Method::Post, ["iam", "pairing", "local-initial"]) => {
                if !state.settings.local_initial_pairing {
                    return status(ResponseCode::NotFound);
                }
                if state.users.contains_key("admin") {
                    return status(ResponseCode::Conflict);
                }
                state.pair("admin", "Administrator");
                status(ResponseCode::Created)
            }
            (Method::Post, ["iam", "pairing", "local-open"]) => {
                if !state.settings.local_open_pairing {
                    return status(ResponseCode::NotFound);
                }
                state.pair_new(&request.payload)
            }
            (Method::Post, ["iam", "pairing", "password-open"]) => {
                if !state.settings.password_open_pairing {
                    return status(ResponseCode::NotFound);
                }
                if state.authenticated.as_deref() != Some("") {
                    return status(ResponseCode::Unauthorized);
                }
                state.pair_new(&request.payload)
            }
            (Method::Post, ["iam", "pairing", "password-invite"]) => {
                if !state.settings.password_invite_pairing {
                    return status(ResponseCode::NotFound);
                }
                match state.authenticated.clone() {
                    Some(username) if !username.is_empty() => {
                        if let Some(user) = state.users.get_mut(&username) {
                            user.fingerprint = Some(CLIENT_FINGERPRINT.to_string());
                        }
                        state.current = Some(username);
                        status(ResponseCode::Created)
                    }
                    _ => status(ResponseCode::Unauthorized),
                }
            }
            (Method::Get, ["iam", "me"]) => match state.current_user() {
                Some(user) => content(&user),
                None => status(ResponseCode::NotFound),
            },
            (Method::Get, ["iam", "roles"]) => content(&state.roles),
            (Method::Get, ["iam", "notification-categories"]) => content(&state.categories),
            (Method::Get, ["iam", "settings"]) => {
                if !state.is_admin() {
                    return status(ResponseCode::Forbidden);
                }
                content(&state.settings)
            }
            (Method::Put, ["iam", "settings", setting]) => {
                if !state.is_admin() {
                    return status(ResponseCode::Forbidden);
                }
                let Ok(enabled) = cbor::decode::<bool>(&request.payload) else {
                    return status(ResponseCode::BadRequest);
                };
                match *setting {
                    "password-open-pairing" => state.settings.password_open_pairing = enabled,
                    "password-invite-pairing" => state.settings.password_invite_pairing = enabled,
                    "local-open-pairing" => state.settings.local_open_pairing = enabled,
                    _ => return status(ResponseCode::NotFound),
                }
                status(ResponseCode::Changed)
            }
            (Method::Put, ["iam", "device-info", "friendly-name"]) => {
                if !state.is_admin() {
                    return status(ResponseCode::Forbidden);
                }
                match cbor::decode::<String>(&request.payload) {
                    Ok(name) if !name.is_empty() && name.len() <= 64 => {
                        state.friendly_name = name;
                        status(ResponseCode::Changed)
                    }
                    _ => status(ResponseCode::BadRequest),
                }
            }
            (Method::Get, ["iam", "users"]) => {
                if !state.is_admin() {
                    return status(ResponseCode::Forbidden);
                }
                content(&state.users.keys().collect::<Vec<_>>())
            }
            (Method::Post, ["iam", "users"]) => {
                if !state.is_admin() {
                    return status(ResponseCode::Forbidden);
                }
                let Some(username) = username_from(&request.payload) else {
                    return status(ResponseCode::BadRequest);
                };
                if state.users.contains_key(&username) {
                    return status(ResponseCode::Conflict);
                }
                state.users.insert(username.clone(), IamUser::new(username));
                status(ResponseCode::Created)
            }
            (Method::Get, ["iam", "users", username]) => {
                if !state.may_access(username) {
                    return status(ResponseCode::Forbidden);
                }
                match state.users.get(*username) {
                    Some(user) => content(&without_password(user)),
                    None => status(ResponseCode::NotFound),
                }
            }
            (Method::Delete, ["iam", "users", username]) => {
                if !state.may_access(username) {
                    return status(ResponseCode::Forbidden);
                }
                match state.users.remove(*username) {
                    Some(_) => {
                        if state.current.as_deref() == Some(*username) {
                            state.current = None;
                        }
                        status(ResponseCode::Deleted)
                    }
                    None => status(ResponseCode::NotFound),
                }
            }
            (Method::Put, ["iam", "users", username, field]) => {
                if !state.may_access(username) {
                    return status(ResponseCode::Forbidden);
                }
                state.update_field(username, field, &request.payload)
            }
            _ => status(ResponseCode::NotFound),
        }
    }
}

impl State {
    fn pair(&mut self, username: &str, role: &str) {
        let user = IamUser {
            fingerprint: Some(CLIENT_FINGERPRINT.to_string()),
            sct: Some(format!("sct-{}", username)),
            ..IamUser::new(username).with_role(role)
        };
        self.users.insert(username.to_string(), user);
        self.current = Some(username.to_string());
    }

    fn pair_new(&mut self, payload: &[u8]) -> Response {
        let Some(username) = username_from(payload) else {
            return status(ResponseCode::BadRequest);
        };
        if !valid_username(&username) {
            return status(ResponseCode::BadRequest);
        }
        if self.users.contains_key(&username) {
            return status(ResponseCode::Conflict);
        }
        self.pair(&username, "Administrator");
        status(ResponseCode::Created)
    }

    fn current_user(&self) -> Option<IamUser> {
        let username = self.current.as_ref()?;
        self.users.get(username).map(without_password)
    }

    fn is_admin(&self) -> bool {
        self.current_user()
            .and_then(|u| u.role)
            .is_some_and(|role| role == "Administrator")
    }

    fn may_access(&self, username: &str) -> bool {
        self.is_admin() || self.current.as_deref() == Some(username)
    }

    fn update_field(&mut self, username: &str, field: &str, payload: &[u8]) -> Response {
        if field == "role" {
            let Ok(role) = cbor::decode::<String>(payload) else {
                return status(ResponseCode::BadRequest);
            };
            if !self.roles.contains(&role) {
                return status(ResponseCode::NotFound);
            }
            return match self.users.get_mut(username) {
                Some(user) => {
                    user.role = Some(role);
                    status(ResponseCode::Changed)
                }
                None => status(ResponseCode::NotFound),
            };
        }

        if field == "username" {
            let Ok(new_username) = cbor::decode::<String>(payload) else {
                return status(ResponseCode::BadRequest);
            };
            if !valid_username(&new_username) {
                return status(ResponseCode::BadRequest);
            }
            if self.users.contains_key(&new_username) {
                return status(ResponseCode::Conflict);
            }
            let Some(mut user) = self.users.remove(username) else {
                return status(ResponseCode::NotFound);
            };
            user.username = new_username.clone();
            self.users.insert(new_username.clone(), user);
            if self.current.as_deref() == Some(username) {
                self.current = Some(new_username);
            }
            return status(ResponseCode::Changed);
        }

        let Some(user) = self.users.get_mut(username) else {
            return status(ResponseCode::NotFound);
        };
        let applied = match field {
            "display-name" => cbor::decode(payload).map(|v| user.display_name = Some(v)),
            "fingerprint" => cbor::decode(payload).map(|v| user.fingerprint = Some(v)),
            "sct" => cbor::decode(payload).map(|v| user.sct = Some(v)),
            "password" => cbor::decode(payload).map(|v| user.password = Some(v)),
            "fcm" => cbor::decode::<Fcm>(payload).map(|v| user.fcm = Some(v)),
            "notification-categories" => {
                cbor::decode(payload).map(|v| user.notification_categories = v)
            }
            _ => return status(ResponseCode::NotFound),
        };
        match applied {
            Ok(()) => status(ResponseCode::Changed),
            Err(_) => status(ResponseCode::BadRequest),
        }
    }
}

impl Connection for FakeDevice {
    async fn coap(&self, request: Request) -> Result<Response, ConnectionError> {
        Ok(self.handle(&request))
    }

    async fn password_authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(), ConnectionError> {
        let mut state = self.state.lock().unwrap();
        if state.wrong_passwords >= 3 {
            return Err(ConnectionError::TooManyRequests);
        }
        let expected = if username.is_empty() {
            Some(OPEN_PAIRING_PASSWORD.to_string())
        } else {
            state.users.get(username).and_then(|u| u.password.clone())
        };
        if expected.as_deref() == Some(password) {
            state.wrong_passwords = 0;
            state.authenticated = Some(username.to_string());
            Ok(())
        } else {
            state.wrong_passwords += 1;
            Err(ConnectionError::Unauthorized)
        }
    }
}

fn status(code: ResponseCode) -> Response {
    Response::new(code)
}

fn content<T: serde::Serialize + ?Sized>(value: &T) -> Response {
    match cbor::encode(value) {
        Ok(payload) => Response::content(payload),
        Err(_) => status(ResponseCode::InternalServerError),
    }
}

fn username_from(payload: &[u8]) -> Option<String> {
    let mut body: BTreeMap<String, String> = cbor::decode(payload).ok()?;
    body.remove("Username")
}

fn valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 64
        && username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "-_.".contains(c))
}

fn without_password(user: &IamUser) -> IamUser {
    IamUser {
        password: None,
        ..user.clone()
    }
}
