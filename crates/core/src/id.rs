//! Strongly-typed document identifiers.
//!
//! Identifiers are assigned by the document store (12-byte `ObjectId`s) and
//! travel through URLs and JSON as 24-character lowercase hex strings.

use core::str::FromStr;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a movie document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(ObjectId);

/// Identifier of a comment document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(ObjectId);

macro_rules! impl_object_id_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a fresh identifier (normally the store does this).
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            pub fn as_object_id(&self) -> &ObjectId {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                self.0.to_hex()
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<ObjectId> for $t {
            fn from(value: ObjectId) -> Self {
                Self(value)
            }
        }

        impl From<$t> for ObjectId {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let oid = ObjectId::parse_str(s.trim())
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(oid))
            }
        }
    };
}

impl_object_id_newtype!(MovieId, "MovieId");
impl_object_id_newtype!(CommentId, "CommentId");
