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

use pem::Pem;

use crate::cert::Certificate;
use crate::constants::*;
use crate::crl::RevocationList;
use crate::key::SigningKey;

/// Errors that can occur while decoding a PEM artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// No decodable PEM block was found in the input.
    #[error("failed to decode PEM block")]
    MalformedInput,
    /// The PEM payload is not a valid DER certificate.
    #[error("PEM payload is not a valid certificate")]
    InvalidCertificate,
    /// The PEM payload is not a supported DER private key.
    #[error("PEM payload is not a supported private key")]
    InvalidKey,
    /// The PEM payload is not a valid DER certificate revocation list.
    #[error("PEM payload is not a valid CRL")]
    InvalidCrl,
    /// The PEM label does not name a supported artifact kind.
    #[error("unsupported PEM label {0:?}")]
    UnsupportedLabel(String),
}

/// A decoded PEM artifact, selected by the block label.
#[derive(Debug, Clone)]
pub enum Artifact {
    /// An X.509 certificate.
    Certificate(Certificate),
    /// A private key usable for signing.
    SigningKey(SigningKey),
    /// A certificate revocation list.
    RevocationList(RevocationList),
}

impl Artifact {
    /// Returns the certificate, if this artifact is one.
    pub fn into_certificate(self) -> Option<Certificate> {
        match self {
            Artifact::Certificate(cert) => Some(cert),
            _ => None,
        }
    }

    /// Returns the signing key, if this artifact is one.
    pub fn into_signing_key(self) -> Option<SigningKey> {
        match self {
            Artifact::SigningKey(key) => Some(key),
            _ => None,
        }
    }

    /// Returns the revocation list, if this artifact is one.
    pub fn into_revocation_list(self) -> Option<RevocationList> {
        match self {
            Artifact::RevocationList(crl) => Some(crl),
            _ => None,
        }
    }
}

/// Extracts the first PEM block of `buffer`. Any following blocks are ignored.
pub fn first_block(buffer: &[u8]) -> Result<Pem, DecodeError> {
    let block = pem::parse(buffer).map_err(|e| {
        tracing::debug!(error = %e, "no PEM block in input");
        DecodeError::MalformedInput
    })?;
    tracing::trace!(
        label = block.tag(),
        len = block.contents().len(),
        "extracted PEM block"
    );
    Ok(block)
}

pub fn decode(buffer: &[u8]) -> Result<Artifact, DecodeError> {
    let block = first_block(buffer)?;
    let der = block.contents();
    match block.tag() {
        LABEL_CERTIFICATE | LABEL_X509_CERTIFICATE => {
            Certificate::from_der(der).map(Artifact::Certificate)
        }
        LABEL_CRL => RevocationList::from_der(der).map(Artifact::RevocationList),
        LABEL_PRIVATE_KEY | LABEL_RSA_PRIVATE_KEY | LABEL_EC_PRIVATE_KEY => {
            SigningKey::from_der(der).map(Artifact::SigningKey)
        }
        other => Err(DecodeError::UnsupportedLabel(other.into())),
    }
}
