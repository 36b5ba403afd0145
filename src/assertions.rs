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

//! Checks over backend responses and decoded artifacts.
//!
//! Every `check_*` function returns an [`AssertionError`] carrying all of the
//! offending evidence. Its `require_*` twin panics with the same message,
//! reporting the caller's location.

use core::fmt;

use crate::cert::{Certificate, SerialNumber};
use crate::crl::RevocationList;
use crate::key::SigningKey;
use crate::response::Response;

/// A failed assertion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssertionError {
    /// Required response fields are absent or `null`.
    #[error("the following fields were required but missing from response: {missing:?}\n{data}")]
    MissingFields {
        /// Every missing field, in the order requested.
        missing: Vec<String>,
        /// The response data that was checked.
        data: String,
    },
    /// The request itself failed.
    #[error("expected successful response but the request failed: {0}")]
    Transport(String),
    /// The backend answered with an error response.
    #[error("expected successful response but got error: {0}")]
    ErrorResponse(String),
    /// The backend returned no response where one was expected.
    #[error("expected a response but got none")]
    MissingResponse,
    /// The backend returned a response where none was expected.
    #[error("expected nil response but got: {0}")]
    UnexpectedResponse(String),
    /// The certificate serial is absent from the CRL.
    #[error("the serial number for cert {certificate}, was not found in the CRL list containing: {revoked}")]
    SerialNotRevoked {
        /// The certificate that was looked up.
        certificate: String,
        /// The CRL with every revoked entry.
        revoked: String,
    },
    /// The certificate serial is present in the CRL.
    #[error("the serial number for cert {certificate}, was found in the CRL list containing: {revoked}")]
    SerialRevoked {
        /// The certificate that was looked up.
        certificate: String,
        /// The CRL with every revoked entry.
        revoked: String,
    },
    /// The private key is not the one certified.
    #[error("{key_type} private key does not match the public key of cert {certificate}")]
    KeyMismatch {
        /// Family of the private key.
        key_type: String,
        /// The certificate the key was compared with.
        certificate: String,
    },
    /// A reported serial differs from the certificate serial.
    #[error("reported serial {reported} does not match serial {actual} of cert {certificate}")]
    SerialMismatch {
        /// The serial as reported.
        reported: String,
        /// The serial in the certificate.
        actual: String,
        /// The certificate that was compared.
        certificate: String,
    },
    /// A reported serial is not hexadecimal.
    #[error("reported serial {0:?} is not a hexadecimal serial number")]
    InvalidSerial(String),
}

#[track_caller]
fn or_fail<T>(result: Result<T, AssertionError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("{e}"),
    }
}

// =============================================================================
// Response shape
// =============================================================================

/// Fails unless every field in `fields` is present and not `null`.
pub fn check_fields_set(response: &Response, fields: &[&str]) -> Result<(), AssertionError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|field| response.get(field).is_none())
        .map(|field| field.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    tracing::debug!(?missing, "required response fields missing");
    let data = serde_json::to_string_pretty(&response.data)
        .unwrap_or_else(|_| format!("{:?}", response.data));
    Err(AssertionError::MissingFields { missing, data })
}

/// Panicking form of [`check_fields_set`].
#[track_caller]
pub fn require_fields_set(response: &Response, fields: &[&str]) {
    or_fail(check_fields_set(response, fields))
}

fn check_not_failed<E: fmt::Display>(
    result: &Result<Option<Response>, E>,
) -> Result<Option<&Response>, AssertionError> {
    let response = result
        .as_ref()
        .map_err(|e| AssertionError::Transport(e.to_string()))?
        .as_ref();
    if let Some(error) = response.and_then(Response::error) {
        tracing::debug!(%error, "backend returned an error response");
        return Err(AssertionError::ErrorResponse(error));
    }
    Ok(response)
}

/// Fails on a request error, an error response, or no response at all.
/// Returns the response on success.
pub fn check_success_response<E: fmt::Display>(
    result: &Result<Option<Response>, E>,
) -> Result<&Response, AssertionError> {
    check_not_failed(result)?.ok_or(AssertionError::MissingResponse)
}

/// Panicking form of [`check_success_response`].
#[track_caller]
pub fn require_success_response<E: fmt::Display>(result: &Result<Option<Response>, E>) -> &Response {
    or_fail(check_success_response(result))
}

/// Fails on a request error, an error response, or a non-empty response.
pub fn check_success_nil_response<E: fmt::Display>(
    result: &Result<Option<Response>, E>,
) -> Result<(), AssertionError> {
    match check_not_failed(result)? {
        Some(response) if !response.is_empty() => {
            Err(AssertionError::UnexpectedResponse(response.to_string()))
        }
        _ => Ok(()),
    }
}

/// Panicking form of [`check_success_nil_response`].
#[track_caller]
pub fn require_success_nil_response<E: fmt::Display>(result: &Result<Option<Response>, E>) {
    or_fail(check_success_nil_response(result))
}

// =============================================================================
// Revocation
// =============================================================================

/// Fails unless the serial of `cert` is listed in `crl`.
pub fn check_serial_in_crl(crl: &RevocationList, cert: &Certificate) -> Result<(), AssertionError> {
    if crl.contains(cert) {
        return Ok(());
    }
    Err(AssertionError::SerialNotRevoked {
        certificate: cert.to_string(),
        revoked: crl.to_string(),
    })
}

/// Panicking form of [`check_serial_in_crl`].
#[track_caller]
pub fn require_serial_in_crl(crl: &RevocationList, cert: &Certificate) {
    or_fail(check_serial_in_crl(crl, cert))
}

/// Fails if the serial of `cert` is listed in `crl`.
pub fn check_serial_not_in_crl(
    crl: &RevocationList,
    cert: &Certificate,
) -> Result<(), AssertionError> {
    if !crl.contains(cert) {
        return Ok(());
    }
    Err(AssertionError::SerialRevoked {
        certificate: cert.to_string(),
        revoked: crl.to_string(),
    })
}

/// Panicking form of [`check_serial_not_in_crl`].
#[track_caller]
pub fn require_serial_not_in_crl(crl: &RevocationList, cert: &Certificate) {
    or_fail(check_serial_not_in_crl(crl, cert))
}

// =============================================================================
// Key and serial pairing
// =============================================================================

/// Fails unless `key` is the private half of the key certified by `cert`.
pub fn check_key_matches_certificate(
    key: &SigningKey,
    cert: &Certificate,
) -> Result<(), AssertionError> {
    let mismatch = || AssertionError::KeyMismatch {
        key_type: key.key_type().to_string(),
        certificate: cert.to_string(),
    };
    let public = key.public_key_der().map_err(|_| mismatch())?;
    if public != cert.public_key_der() {
        return Err(mismatch());
    }
    Ok(())
}

/// Panicking form of [`check_key_matches_certificate`].
#[track_caller]
pub fn require_key_matches_certificate(key: &SigningKey, cert: &Certificate) {
    or_fail(check_key_matches_certificate(key, cert))
}

/// Fails unless the hex serial `reported` by the backend equals the serial of
/// `cert`.
pub fn check_serial_matches(cert: &Certificate, reported: &str) -> Result<(), AssertionError> {
    let serial: SerialNumber = reported
        .parse()
        .map_err(|_| AssertionError::InvalidSerial(reported.into()))?;
    if &serial != cert.serial_number() {
        return Err(AssertionError::SerialMismatch {
            reported: reported.into(),
            actual: cert.serial_number().to_string(),
            certificate: cert.to_string(),
        });
    }
    Ok(())
}

/// Panicking form of [`check_serial_matches`].
#[track_caller]
pub fn require_serial_matches(cert: &Certificate, reported: &str) {
    or_fail(check_serial_matches(cert, reported))
}
