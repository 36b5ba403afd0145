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

//! Test-support library for PKI backends.
//!
//! Decodes the PEM artifacts a PKI backend hands out (certificates, private
//! keys and CRLs), checks revocation status, and asserts on the shape of the
//! backend's responses.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(missing_docs)]

mod artifact;
mod assertions;
mod cert;
mod constants;
mod crl;
mod key;
mod response;
mod useragent;

pub use crate::{
    artifact::{Artifact, DecodeError},
    assertions::{
        check_fields_set, check_key_matches_certificate, check_serial_in_crl,
        check_serial_matches, check_serial_not_in_crl, check_success_nil_response,
        check_success_response, require_fields_set, require_key_matches_certificate,
        require_serial_in_crl, require_serial_matches, require_serial_not_in_crl,
        require_success_nil_response, require_success_response, AssertionError,
    },
    cert::{Certificate, InvalidSerial, SerialNumber},
    crl::{RevocationList, RevokedEntry, VerifyError},
    key::{KeyError, KeyType, SigningKey},
    response::{Response, ResponseError, Value},
    useragent::{PluginEnvironment, UserAgentConfig},
};

// =============================================================================
// PEM decoding
// =============================================================================

/// Decodes the first PEM block of `buffer`, choosing the parser from its
/// label.
///
/// `CERTIFICATE` and `X509 CERTIFICATE` blocks yield a certificate,
/// `X509 CRL` a revocation list, and `PRIVATE KEY`, `RSA PRIVATE KEY` or
/// `EC PRIVATE KEY` a signing key. Any other label is rejected with
/// [`DecodeError::UnsupportedLabel`].
pub fn decode(buffer: impl AsRef<[u8]>) -> Result<Artifact, DecodeError> {
    artifact::decode(buffer.as_ref())
}

/// Decodes the first PEM block of `buffer` as an X.509 certificate.
///
/// The block label is not checked. Blocks after the first are ignored, so a
/// chain yields its leaf.
pub fn decode_certificate(buffer: impl AsRef<[u8]>) -> Result<Certificate, DecodeError> {
    cert::decode_certificate(buffer.as_ref())
}

/// Decodes the first PEM block of `buffer` as a private key.
///
/// PKCS#1 RSA keys are tried first, then PKCS#8 (RSA, P-256, P-384,
/// Ed25519), then SEC1 EC keys. The block label is not checked.
pub fn decode_signing_key(buffer: impl AsRef<[u8]>) -> Result<SigningKey, DecodeError> {
    key::decode_signing_key(buffer.as_ref())
}

/// Decodes the first PEM block of `buffer` as a certificate revocation list.
pub fn decode_revocation_list(buffer: impl AsRef<[u8]>) -> Result<RevocationList, DecodeError> {
    crl::decode_revocation_list(buffer.as_ref())
}

/// Decodes a DER encoded certificate revocation list.
pub fn decode_revocation_list_der(der: impl AsRef<[u8]>) -> Result<RevocationList, DecodeError> {
    RevocationList::from_der(der.as_ref())
}

// =============================================================================
// Revocation
// =============================================================================

/// Returns true if the serial number of `cert` is listed in `crl`.
///
/// Issuer names are not compared.
pub fn is_revoked(crl: &RevocationList, cert: &Certificate) -> bool {
    crl.contains(cert)
}

// =============================================================================
// Backend responses
// =============================================================================

/// Parses a backend response from its JSON body.
pub fn parse_response(input: impl AsRef<[u8]>) -> Result<Response, ResponseError> {
    response::parse_response(input.as_ref())
}
