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

use x509_verify::{
    x509_cert::{
        crl::CertificateList,
        der::{Decode, Encode},
    },
    Signature, VerifyInfo, VerifyingKey,
};

use crate::artifact::{first_block, DecodeError};
use crate::cert::{Certificate, SerialNumber};

/// Errors that can occur while checking a CRL signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The CRL could not be re-encoded for verification.
    #[error("failed to encode CRL")]
    Encoding,
    /// The signature field is malformed.
    #[error("malformed CRL signature")]
    BadSignature,
    /// The issuer key is unsupported or does not verify the signature.
    #[error("CRL signature does not verify under the issuer key")]
    KeyVerification,
}

/// One revoked certificate listed in a CRL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokedEntry {
    /// Serial number of the revoked certificate.
    pub serial_number: SerialNumber,
    /// Revocation time, in seconds since the unix epoch.
    pub revoked_at: u64,
}

impl fmt::Display for RevokedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.serial_number, format_time(self.revoked_at))
    }
}

/// A decoded certificate revocation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationList {
    inner: CertificateList,
    entries: Vec<RevokedEntry>,
}

impl RevocationList {
    /// Parses a DER encoded CRL.
    pub fn from_der(der: &[u8]) -> Result<Self, DecodeError> {
        let inner = CertificateList::from_der(der).map_err(|e| {
            tracing::debug!(error = %e, "CRL DER rejected");
            DecodeError::InvalidCrl
        })?;

        let entries: Vec<RevokedEntry> = inner
            .tbs_cert_list
            .revoked_certificates
            .iter()
            .flatten()
            .map(|entry| RevokedEntry {
                serial_number: SerialNumber::from_der_bytes(entry.serial_number.as_bytes()),
                revoked_at: entry.revocation_date.to_unix_duration().as_secs(),
            })
            .collect();

        tracing::debug!(revoked = entries.len(), "decoded CRL");
        Ok(Self { inner, entries })
    }

    /// Revoked entries, in the order the CRL lists them.
    pub fn entries(&self) -> &[RevokedEntry] {
        &self.entries
    }

    /// Issuer distinguished name in RFC 4514 form.
    pub fn issuer(&self) -> String {
        self.inner.tbs_cert_list.issuer.to_string()
    }

    /// Issue time of this CRL, in seconds since the unix epoch.
    pub fn this_update(&self) -> u64 {
        self.inner
            .tbs_cert_list
            .this_update
            .to_unix_duration()
            .as_secs()
    }

    /// Time by which the next CRL will be issued, if the CRL announces one.
    pub fn next_update(&self) -> Option<u64> {
        self.inner
            .tbs_cert_list
            .next_update
            .as_ref()
            .map(|t| t.to_unix_duration().as_secs())
    }

    /// Returns true if `serial` is listed as revoked.
    pub fn contains_serial(&self, serial: &SerialNumber) -> bool {
        self.entries
            .iter()
            .any(|entry| &entry.serial_number == serial)
    }

    /// Returns true if the serial number of `cert` is listed as revoked.
    pub fn contains(&self, cert: &Certificate) -> bool {
        let revoked = self.contains_serial(cert.serial_number());
        tracing::trace!(serial = %cert.serial_number(), revoked, "CRL lookup");
        revoked
    }

    /// Verifies the CRL signature against the public key of `issuer`.
    pub fn verify_issued_by(&self, issuer: &Certificate) -> Result<(), VerifyError> {
        let key: VerifyingKey = issuer
            .inner()
            .tbs_certificate
            .subject_public_key_info
            .clone()
            .try_into()
            .map_err(|_| VerifyError::KeyVerification)?;

        let verify_info = VerifyInfo::new(
            self.inner
                .tbs_cert_list
                .to_der()
                .map_err(|_| VerifyError::Encoding)?
                .into(),
            Signature::new(
                &self.inner.signature_algorithm,
                self.inner
                    .signature
                    .as_bytes()
                    .ok_or(VerifyError::BadSignature)?,
            ),
        );
        key.verify(&verify_info)
            .map_err(|_| VerifyError::KeyVerification)
    }

    /// The underlying parsed structure.
    pub fn inner(&self) -> &CertificateList {
        &self.inner
    }
}

/// Formats the issuer followed by every revoked entry.
impl fmt::Display for RevocationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CRL issued by {} [", self.issuer())?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        f.write_str("]")
    }
}

fn format_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

pub fn decode_revocation_list(buffer: &[u8]) -> Result<RevocationList, DecodeError> {
    let block = first_block(buffer)?;
    RevocationList::from_der(block.contents())
}

#[cfg(test)]
mod should {
    use super::{decode_revocation_list, RevocationList, VerifyError};
    use crate::artifact::DecodeError;
    use crate::cert::{decode_certificate, SerialNumber};
    use assert_ok::assert_ok;
    use chrono::DateTime;
    use rstest::rstest;
    use std::{fs::File, io::Read};

    fn load_file(path: &str) -> Vec<u8> {
        let mut f = File::open(path).unwrap();
        let mut buf = Vec::new();
        f.read_to_end(&mut buf).unwrap();
        buf
    }

    fn load_crl() -> RevocationList {
        decode_revocation_list(&load_file("assets/tests/crl.pem")).unwrap()
    }

    #[test]
    fn list_every_revoked_entry() {
        let crl = load_crl();
        let serials: Vec<String> = crl
            .entries()
            .iter()
            .map(|e| e.serial_number.to_string())
            .collect();
        assert_eq!(
            serials,
            [
                "05",
                "13",
                "01:2c",
                "ab:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:13"
            ]
        );

        let revoked_at = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .timestamp() as u64;
        assert!(crl.entries().iter().all(|e| e.revoked_at == revoked_at));
    }

    #[test]
    fn expose_list_metadata() {
        let crl = load_crl();
        assert_eq!(crl.issuer(), "CN=Test Root CA");
        let next_update = crl.next_update().unwrap();
        assert!(crl.this_update() < next_update);
    }

    #[rstest]
    #[case("assets/tests/leaf_5.pem", true)]
    #[case("assets/tests/leaf_19.pem", true)]
    #[case("assets/tests/leaf_20.pem", false)]
    #[case("assets/tests/leaf_300.pem", true)]
    #[case("assets/tests/leaf_big_revoked.pem", true)]
    #[case("assets/tests/leaf_big_valid.pem", false)]
    fn find_certificate_by_serial(#[case] cert_path: &str, #[case] revoked: bool) {
        let crl = load_crl();
        let cert = decode_certificate(&load_file(cert_path)).unwrap();
        assert_eq!(crl.contains(&cert), revoked);
    }

    #[test]
    fn not_confuse_serials_sharing_low_bits() {
        let crl = load_crl();
        // Both serials end in 0x13, the same as the revoked serial 19.
        let valid: SerialNumber = "cd:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:13"
            .parse()
            .unwrap();
        assert!(!crl.contains_serial(&valid));
        assert!(crl.contains_serial(&SerialNumber::from(19)));
    }

    #[test]
    fn find_nothing_in_an_empty_list() {
        let crl = decode_revocation_list(&load_file("assets/tests/crl_empty.pem")).unwrap();
        assert!(crl.entries().is_empty());
        for path in ["assets/tests/leaf_5.pem", "assets/tests/leaf_19.pem"] {
            let cert = decode_certificate(&load_file(path)).unwrap();
            assert!(!crl.contains(&cert));
        }
    }

    #[test]
    fn verify_issuer_signature() {
        let crl = load_crl();
        let ca = decode_certificate(&load_file("assets/tests/ca.pem")).unwrap();
        assert_ok!(crl.verify_issued_by(&ca));
    }

    #[test]
    fn reject_foreign_issuer() {
        let crl = decode_revocation_list(&load_file("assets/tests/crl_other_ca.pem")).unwrap();
        let ca = decode_certificate(&load_file("assets/tests/ca.pem")).unwrap();
        assert_eq!(
            crl.verify_issued_by(&ca),
            Err(VerifyError::KeyVerification)
        );
    }

    #[test]
    fn decode_der_input() {
        let crl = RevocationList::from_der(&load_file("assets/tests/crl.der")).unwrap();
        assert_eq!(crl, load_crl());
    }

    #[test]
    fn reject_corrupted_payload() {
        let input = "-----BEGIN X509 CRL-----\nAAAA\n-----END X509 CRL-----\n";
        assert_eq!(
            decode_revocation_list(input.as_bytes()).unwrap_err(),
            DecodeError::InvalidCrl
        );
    }

    #[test]
    fn reject_missing_delimiters() {
        assert_eq!(
            decode_revocation_list(&load_file("assets/tests/crl.der")).unwrap_err(),
            DecodeError::MalformedInput
        );
    }

    #[test]
    fn describe_every_entry() {
        let rendered = load_crl().to_string();
        assert!(rendered.starts_with("CRL issued by CN=Test Root CA ["));
        assert!(rendered.contains("01:2c @ 2024-01-15T10:30:00+00:00"));
    }
}
