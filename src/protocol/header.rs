//! Header Request/Response
//!
//! Layout request header (v1):
//! ┌─────────────────────────────────────────────────────┐
//! │ api_key: int16 | api_version: int16                 │
//! │ correlation_id: int32                               │
//! │ client_id: nullable string (int16 len + UTF-8)      │
//! └─────────────────────────────────────────────────────┘
//!
//! Response header hanya berisi `correlation_id: int32`.
//! Body message (hasil generator) menyusul langsung setelah header.

use std::io::Write;

use super::{sizeof, Decoder, Encoder};
use crate::error::Result;

/// Header yang mengawali setiap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub api_key: i16,
    pub api_version: i16,
    pub correlation_id: i32,
    pub client_id: Option<String>,
}

impl RequestHeader {
    pub fn new(api_key: i16, api_version: i16, correlation_id: i32) -> Self {
        Self {
            api_key,
            api_version,
            correlation_id,
            client_id: None,
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn encode<W: Write>(&self, e: &mut Encoder<W>) {
        e.put_int16(self.api_key);
        e.put_int16(self.api_version);
        e.put_int32(self.correlation_id);
        e.put_nullable_string(self.client_id.as_deref());
    }

    pub fn decode(d: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            api_key: d.get_int16()?,
            api_version: d.get_int16()?,
            correlation_id: d.get_int32()?,
            client_id: d.get_nullable_string()?.map(str::to_owned),
        })
    }

    /// Ukuran header dalam byte.
    pub fn size(&self) -> i32 {
        sizeof::INT16 * 2 + sizeof::INT32 + sizeof::nullable_string(self.client_id.as_deref())
    }
}

/// Header yang mengawali setiap response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub correlation_id: i32,
}

impl ResponseHeader {
    pub const SIZE: i32 = sizeof::INT32;

    pub fn encode<W: Write>(&self, e: &mut Encoder<W>) {
        e.put_int32(self.correlation_id);
    }

    pub fn decode(d: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            correlation_id: d.get_int32()?,
        })
    }
}
