//! Body representations carried across the relay.
//!
//! The representation is chosen once from the declared `content-type`
//! and threaded through unchanged: multipart requests become
//! [`Payload::Form`], JSON becomes [`Payload::Text`], and anything else
//! travels as opaque [`Payload::Bytes`]. Upstream responses use the same
//! type with the two-way JSON/bytes split.

use std::fmt::Write;

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use bytes::{BufMut, Bytes, BytesMut};

use super::headers::content_type_contains;
use crate::error::RelayError;

const MULTIPART: &str = "multipart/form-data";
const JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Form(Vec<FormPart>),
    Text(String),
    Bytes(Bytes),
}

/// Outbound body plus the `content-type` it must be sent with, when that
/// differs from the inbound one.
#[derive(Debug)]
pub struct EncodedBody {
    pub bytes: Bytes,
    pub content_type: Option<HeaderValue>,
}

impl Payload {
    /// Read the body of an inbound request. `GET` and `HEAD` never carry one.
    pub async fn from_request(req: Request) -> Result<Option<Self>, RelayError> {
        if req.method() == Method::GET || req.method() == Method::HEAD {
            return Ok(None);
        }

        if content_type_contains(req.headers(), MULTIPART) {
            let multipart = Multipart::from_request(req, &())
                .await
                .map_err(RelayError::upstream)?;
            return read_form(multipart).await.map(|parts| Some(Self::Form(parts)));
        }

        let is_json = content_type_contains(req.headers(), JSON);
        let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .map_err(RelayError::body)?;

        Ok(Some(if is_json {
            Self::text_or_bytes(bytes)
        } else {
            Self::Bytes(bytes)
        }))
    }

    /// Classify a collected upstream response body.
    #[must_use]
    pub fn from_response(headers: &HeaderMap, body: Bytes) -> Self {
        if content_type_contains(headers, JSON) {
            Self::text_or_bytes(body)
        } else {
            Self::Bytes(body)
        }
    }

    /// JSON that is not valid UTF-8 stays opaque so no byte is rewritten.
    fn text_or_bytes(body: Bytes) -> Self {
        match String::from_utf8(Vec::from(body)) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Bytes(Bytes::from(e.into_bytes())),
        }
    }

    /// Serialize for the wire. Forms get a fresh boundary.
    #[must_use]
    pub fn encode(self) -> EncodedBody {
        match self {
            Self::Text(text) => EncodedBody {
                bytes: Bytes::from(text),
                content_type: None,
            },
            Self::Bytes(bytes) => EncodedBody {
                bytes,
                content_type: None,
            },
            Self::Form(parts) => {
                let boundary = format!("relay-{}", uuid::Uuid::new_v4().simple());
                let content_type = format!("{MULTIPART}; boundary={boundary}");
                EncodedBody {
                    bytes: encode_form(&parts, &boundary),
                    content_type: HeaderValue::from_str(&content_type).ok(),
                }
            }
        }
    }
}

async fn read_form(mut multipart: Multipart) -> Result<Vec<FormPart>, RelayError> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field.bytes().await.map_err(multipart_error)?;
        parts.push(FormPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(parts)
}

fn multipart_error(err: MultipartError) -> RelayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::PayloadTooLarge
    } else {
        RelayError::body(err)
    }
}

/// Encode parts as a `multipart/form-data` body delimited by `boundary`.
#[must_use]
pub fn encode_form(parts: &[FormPart], boundary: &str) -> Bytes {
    let mut buf = BytesMut::new();
    for part in parts {
        let mut head = String::new();
        // write! to String is infallible
        let _ = write!(
            head,
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"",
            escape_quoted(&part.name)
        );
        if let Some(ref file_name) = part.file_name {
            let _ = write!(head, "; filename=\"{}\"", escape_quoted(file_name));
        }
        head.push_str("\r\n");
        if let Some(ref content_type) = part.content_type {
            let _ = write!(head, "Content-Type: {content_type}\r\n");
        }
        head.push_str("\r\n");

        buf.put_slice(head.as_bytes());
        buf.put_slice(&part.data);
        buf.put_slice(b"\r\n");
    }
    buf.put_slice(format!("--{boundary}--\r\n").as_bytes());
    buf.freeze()
}

/// Percent-escape the characters that would break a quoted header parameter,
/// the way browsers do for form field and file names.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
