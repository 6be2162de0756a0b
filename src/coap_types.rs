//! CoAP types for the IAM endpoints
//!
//! Transport-agnostic request and response values. A [`Connection`](crate::Connection)
//! implementation maps these onto whatever CoAP stack the device SDK provides.

/// CoAP Content-Format identifiers used by the IAM endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ContentFormat {
    /// text/plain; charset=utf-8
    TextPlain = 0,
    /// application/cbor
    Cbor = 60,
}

impl ContentFormat {
    /// Convert from raw content-format ID
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::TextPlain),
            60 => Some(Self::Cbor),
            _ => None,
        }
    }

    /// Get the raw content-format ID
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Request methods used against the IAM resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Put => f.write_str("PUT"),
            Method::Delete => f.write_str("DELETE"),
        }
    }
}

/// CoAP response codes returned by the IAM resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    // Success codes
    /// 2.01 Created
    Created,
    /// 2.02 Deleted
    Deleted,
    /// 2.04 Changed
    Changed,
    /// 2.05 Content
    Content,

    // Client error codes
    /// 4.00 Bad Request
    BadRequest,
    /// 4.01 Unauthorized
    Unauthorized,
    /// 4.03 Forbidden
    Forbidden,
    /// 4.04 Not Found
    NotFound,
    /// 4.05 Method Not Allowed
    MethodNotAllowed,
    /// 4.09 Conflict
    Conflict,
    /// 4.15 Unsupported Content-Format
    UnsupportedContentFormat,
    /// 4.29 Too Many Requests
    TooManyRequests,

    // Server error codes
    /// 5.00 Internal Server Error
    InternalServerError,
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (class, detail) = self.to_code_pair();
        write!(f, "{}.{:02}", class, detail)
    }
}

impl ResponseCode {
    /// Convert to CoAP response code format (class.detail)
    pub fn to_code_pair(self) -> (u8, u8) {
        match self {
            Self::Created => (2, 1),
            Self::Deleted => (2, 2),
            Self::Changed => (2, 4),
            Self::Content => (2, 5),
            Self::BadRequest => (4, 0),
            Self::Unauthorized => (4, 1),
            Self::Forbidden => (4, 3),
            Self::NotFound => (4, 4),
            Self::MethodNotAllowed => (4, 5),
            Self::Conflict => (4, 9),
            Self::UnsupportedContentFormat => (4, 15),
            Self::TooManyRequests => (4, 29),
            Self::InternalServerError => (5, 0),
        }
    }

    /// Numeric status as reported by the device SDK (`class * 100 + detail`, e.g. 205)
    pub fn as_status(self) -> u16 {
        let (class, detail) = self.to_code_pair();
        u16::from(class) * 100 + u16::from(detail)
    }

    /// Parse a numeric status, `None` for codes the IAM endpoints never use
    pub fn from_status(status: u16) -> Option<Self> {
        [
            Self::Created,
            Self::Deleted,
            Self::Changed,
            Self::Content,
            Self::BadRequest,
            Self::Unauthorized,
            Self::Forbidden,
            Self::NotFound,
            Self::MethodNotAllowed,
            Self::Conflict,
            Self::UnsupportedContentFormat,
            Self::TooManyRequests,
            Self::InternalServerError,
        ]
        .into_iter()
        .find(|code| code.as_status() == status)
    }

    /// Check if this is a success code
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::Created | Self::Deleted | Self::Changed | Self::Content
        )
    }
}

/// An IAM request (transport-agnostic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The request method
    pub method: Method,
    /// Absolute resource path, e.g. `/iam/users/admin`
    pub path: String,
    /// CBOR-encoded payload, empty when the request carries none
    pub payload: Vec<u8>,
    /// Content format of the payload
    pub content_format: Option<ContentFormat>,
}

impl Request {
    /// Create a new request without payload
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: Vec::new(),
            content_format: None,
        }
    }

    /// Set the payload
    pub fn with_payload(mut self, payload: Vec<u8>, format: ContentFormat) -> Self {
        self.payload = payload;
        self.content_format = Some(format);
        self
    }
}

/// An IAM response (transport-agnostic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Numeric response status (`class * 100 + detail`)
    pub status: u16,
    /// Response payload
    pub payload: Vec<u8>,
    /// Content format of the payload
    pub content_format: Option<ContentFormat>,
}

impl Response {
    /// Create a response with the given code and no payload
    pub fn new(code: ResponseCode) -> Self {
        Self {
            status: code.as_status(),
            payload: Vec::new(),
            content_format: None,
        }
    }

    /// Create a 2.05 response carrying CBOR content
    pub fn content(payload: Vec<u8>) -> Self {
        Self {
            status: ResponseCode::Content.as_status(),
            payload,
            content_format: Some(ContentFormat::Cbor),
        }
    }

    /// Typed view of the status, if it is one the IAM endpoints use
    pub fn code(&self) -> Option<ResponseCode> {
        ResponseCode::from_status(self.status)
    }
}
