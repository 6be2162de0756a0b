//! The seam to the device SDK
//!
//! A [`Connection`] is one authenticated session to one device. Opening it,
//! keeping it alive and securing the transport is the SDK's business; this
//! crate only issues requests on it.

use thiserror::Error;

use crate::coap_types::{Request, Response};

/// Errors reported by the underlying connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The connection is not connected
    #[error("the connection is not connected")]
    NotConnected,

    /// Password authentication was rejected
    #[error("unauthorized")]
    Unauthorized,

    /// Password authentication was rejected too many times in a row
    #[error("too many requests")]
    TooManyRequests,

    /// Any other SDK error, with the SDK's own code and message
    #[error("SDK error {code}: {message}")]
    Sdk { code: i32, message: String },
}

/// An open session to a device
///
/// # Example
/// ```ignore
/// impl Connection for SdkConnection {
///     async fn coap(&self, request: Request) -> Result<Response, ConnectionError> {
///         let mut coap = self.inner.create_coap(request.method, &request.path)?;
///         if let Some(format) = request.content_format {
///             coap.set_request_payload(format.as_u16(), &request.payload);
///         }
///         coap.execute().await?;
///         Ok(Response { status: coap.status(), payload: coap.payload(), content_format: None })
///     }
///     // ...
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait Connection {
    /// Execute a single CoAP request and return the device's response
    ///
    /// Non-2xx statuses are responses, not errors: only transport failures
    /// are reported through `Err`.
    async fn coap(&self, request: Request) -> Result<Response, ConnectionError>;

    /// Authenticate the session with a username and password
    ///
    /// Open password pairing authenticates with an empty username.
    async fn password_authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(), ConnectionError>;
}
