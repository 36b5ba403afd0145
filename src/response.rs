// Copyright 2025, Horizen Labs, Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use core::fmt;
use std::collections::BTreeMap;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{RESPONSE_DATA_KEY, RESPONSE_ERROR_KEY};

/// Errors that can occur while reading a backend response.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// The body is not a JSON response object.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single value in a response data map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// An absent value (`null`).
    Null,
    /// A boolean.
    Bool(bool),
    /// A JSON number, keeping its integer or float representation.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// Raw bytes. Serialized as standard base64.
    Bytes(Vec<u8>),
    /// A list of values.
    List(Vec<Value>),
    /// A nested map.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an unsigned integer, if it is one.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Bytes(bytes) => {
                serde_json::Value::String(general_purpose::STANDARD.encode(bytes))
            }
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(map) => {
                serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", serde_json::Value::from(other.clone())),
        }
    }
}

/// A logical response returned by the backend under test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response payload, keyed by field name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: BTreeMap<String, Value>,
    /// Non-fatal warnings attached to the response.
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Response {
    /// Builds a response from `(field, value)` pairs.
    pub fn from_data<K, V>(data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            data: data
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            warnings: Vec::new(),
        }
    }

    /// Builds an error response carrying `message`.
    pub fn error_response(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::from_data([(RESPONSE_ERROR_KEY, message)])
    }

    /// Returns the value of `field`, treating `null` as absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field).filter(|v| !v.is_null())
    }

    /// Returns the string value of `field`.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// True when the data holds an `error` entry and nothing else apart from
    /// an optional `data` entry.
    pub fn is_error(&self) -> bool {
        if !self.data.contains_key(RESPONSE_ERROR_KEY) {
            return false;
        }
        match self.data.len() {
            1 => true,
            2 => self.data.contains_key(RESPONSE_DATA_KEY),
            _ => false,
        }
    }

    /// The error message of an error response.
    pub fn error(&self) -> Option<String> {
        if !self.is_error() {
            return None;
        }
        self.data.get(RESPONSE_ERROR_KEY).map(ToString::to_string)
    }

    /// True when there is neither data nor a warning.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.warnings.is_empty()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&body)
    }
}

/// Parses a backend response from a JSON body.
pub fn parse_response(input: &[u8]) -> Result<Response, ResponseError> {
    Ok(serde_json::from_slice(input)?)
}
