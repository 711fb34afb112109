//! Record domain types
//!
//! The stored record, its store-assigned identifier, and the provenance tag
//! attached to every read.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BridgeError;

// == Record Id ==
/// Store-assigned record identifier.
///
/// Rendered on the wire as the 24 hex digit form of a MongoDB ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parses a client-supplied identifier.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| BridgeError::Validation(format!("Invalid user id: {}", raw)))
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for RecordId {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectId::parse_str(&raw)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

// == Record ==
/// A stored user record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub email: String,
}

/// Fields of a record that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: String,
    pub email: String,
}

impl NewRecord {
    /// Attaches the identifier assigned by the store.
    pub fn with_id(self, id: RecordId) -> Record {
        Record {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

// == Provenance ==
/// Where the data of a read came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "cache")]
    Cache,
    #[serde(rename = "mongo")]
    Store,
}

/// Read result tagged with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub data: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn cache(data: T) -> Self {
        Self {
            data,
            source: Source::Cache,
        }
    }

    pub fn store(data: T) -> Self {
        Self {
            data,
            source: Source::Store,
        }
    }
}
