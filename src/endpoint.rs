//! Request/response plumbing shared by all IAM operations
//!
//! Every IAM operation is one [`Endpoint`]: a method, a path, the single
//! status that means success and a table translating the documented error
//! statuses into [`IamError`]s.

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cbor;
use crate::coap_types::{ContentFormat, Method, Request, Response, ResponseCode};
use crate::connection::Connection;
use crate::error::{Error, IamError, Result};

/// Status-to-error table of an endpoint
pub(crate) type ErrorTable = &'static [(ResponseCode, IamError)];

/// Reads of device-wide resources (roles, settings, ...)
pub(crate) const READ_ERRORS: ErrorTable = &[
    (ResponseCode::Forbidden, IamError::Forbidden),
    (ResponseCode::NotFound, IamError::IamNotSupported),
];

/// Writes of device-wide resources (friendly name, settings, ...)
pub(crate) const WRITE_ERRORS: ErrorTable = &[
    (ResponseCode::BadRequest, IamError::InvalidInput),
    (ResponseCode::Forbidden, IamError::Forbidden),
    (ResponseCode::NotFound, IamError::IamNotSupported),
];

/// Writes below `/iam/users/{username}`
pub(crate) const USER_WRITE_ERRORS: ErrorTable = &[
    (ResponseCode::BadRequest, IamError::InvalidInput),
    (ResponseCode::Forbidden, IamError::Forbidden),
    (ResponseCode::NotFound, IamError::UserDoesNotExist),
];

#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    method: Method,
    path: String,
    ok: ResponseCode,
    errors: ErrorTable,
}

impl Endpoint {
    pub(crate) fn new(
        method: Method,
        path: impl Into<String>,
        ok: ResponseCode,
        errors: ErrorTable,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            ok,
            errors,
        }
    }

    /// Endpoint below `/iam/users/{username}`, `suffix` is appended verbatim
    pub(crate) fn user(
        method: Method,
        username: &str,
        suffix: &str,
        ok: ResponseCode,
        errors: ErrorTable,
    ) -> Result<Self> {
        Ok(Self::new(method, user_path(username, suffix)?, ok, errors))
    }

    /// Issue the request and check the response status
    pub(crate) async fn send<C: Connection>(
        &self,
        connection: &C,
        payload: Option<Vec<u8>>,
    ) -> Result<Response> {
        let mut request = Request::new(self.method, self.path.clone());
        if let Some(payload) = payload {
            request = request.with_payload(payload, ContentFormat::Cbor);
        }

        debug!(
            "{} {} ({} byte payload)",
            self.method,
            self.path,
            request.payload.len()
        );
        let response = connection.coap(request).await?;
        debug!("{} {} -> {}", self.method, self.path, response.status);

        self.check(response.status)?;
        Ok(response)
    }

    /// Send without payload, expecting no meaningful response body
    pub(crate) async fn execute<C: Connection>(&self, connection: &C) -> Result<()> {
        self.send(connection, None).await.map(|_| ())
    }

    /// Send `value` as the CBOR payload
    pub(crate) async fn execute_with<C, T>(&self, connection: &C, value: &T) -> Result<()>
    where
        C: Connection,
        T: Serialize + ?Sized,
    {
        let payload = cbor::encode(value)?;
        self.send(connection, Some(payload)).await.map(|_| ())
    }

    /// Send without payload and decode the CBOR response body
    pub(crate) async fn fetch<C, T>(&self, connection: &C) -> Result<T>
    where
        C: Connection,
        T: DeserializeOwned,
    {
        let response = self.send(connection, None).await?;
        cbor::decode(&response.payload)
    }

    fn check(&self, status: u16) -> Result<()> {
        if status == self.ok.as_status() {
            return Ok(());
        }

        if let Some((_, error)) = self
            .errors
            .iter()
            .find(|(code, _)| code.as_status() == status)
        {
            debug!("{} {} failed: {}", self.method, self.path, error);
            return Err(Error::Iam(*error));
        }

        warn!(
            "{} {} returned undocumented status {}",
            self.method, self.path, status
        );
        Err(Error::UnexpectedStatus {
            path: self.path.clone(),
            status,
        })
    }
}

/// Build `/iam/users/{username}{suffix}`
///
/// Usernames end up as a path segment, so anything that would change the
/// shape of the URI is rejected before a request goes out.
pub(crate) fn user_path(username: &str, suffix: &str) -> Result<String> {
    if username.is_empty() || username.contains(['/', '?', '#']) {
        return Err(Error::Iam(IamError::InvalidInput));
    }
    Ok(format!("/iam/users/{}{}", username, suffix))
}
