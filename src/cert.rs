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

use core::{fmt, str::FromStr};

use num_bigint::BigInt;
use x509_verify::x509_cert::{
    self,
    der::{Decode, Encode},
};

use crate::artifact::{first_block, DecodeError};
use crate::constants::LABEL_CERTIFICATE;

/// A certificate serial number.
///
/// Serial numbers are arbitrary-precision integers: issuers routinely hand out
/// 128 to 160 bit values, so they are compared numerically and never
/// truncated to a machine word.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerialNumber(BigInt);

impl SerialNumber {
    /// Builds a serial number from the content octets of a DER INTEGER.
    pub fn from_der_bytes(bytes: &[u8]) -> Self {
        Self(BigInt::from_signed_bytes_be(bytes))
    }

    /// The numeric value.
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }
}

impl From<u64> for SerialNumber {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<BigInt> for SerialNumber {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

/// Formats as colon-separated hex octets, e.g. `01:2c`.
impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, magnitude) = self.0.to_bytes_be();
        if sign == num_bigint::Sign::Minus {
            f.write_str("-")?;
        }
        let octets: Vec<String> = magnitude.iter().map(|b| hex::encode([*b])).collect();
        f.write_str(&octets.join(":"))
    }
}

/// Parses colon-separated (`01:2c`), bare (`12c`) or `0x`-prefixed hex.
impl FromStr for SerialNumber {
    type Err = InvalidSerial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed)
            .replace(':', "");
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidSerial(s.into()));
        }
        BigInt::parse_bytes(digits.as_bytes(), 16)
            .map(Self)
            .ok_or_else(|| InvalidSerial(s.into()))
    }
}

/// A string that is not a hexadecimal serial number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not a hexadecimal serial number")]
pub struct InvalidSerial(pub String);

/// A decoded X.509 certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    inner: x509_cert::Certificate,
    der: Vec<u8>,
    spki: Vec<u8>,
    serial_number: SerialNumber,
}

impl Certificate {
    /// Parses a DER encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, DecodeError> {
        let inner = x509_cert::Certificate::from_der(der).map_err(|e| {
            tracing::debug!(error = %e, "certificate DER rejected");
            DecodeError::InvalidCertificate
        })?;
        let spki = inner
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|_| DecodeError::InvalidCertificate)?;
        let serial_number =
            SerialNumber::from_der_bytes(inner.tbs_certificate.serial_number.as_bytes());
        tracing::debug!(serial = %serial_number, "decoded certificate");
        Ok(Self {
            inner,
            der: der.to_vec(),
            spki,
            serial_number,
        })
    }

    /// The certificate serial number.
    pub fn serial_number(&self) -> &SerialNumber {
        &self.serial_number
    }

    /// Subject distinguished name in RFC 4514 form.
    pub fn subject(&self) -> String {
        self.inner.tbs_certificate.subject.to_string()
    }

    /// Issuer distinguished name in RFC 4514 form.
    pub fn issuer(&self) -> String {
        self.inner.tbs_certificate.issuer.to_string()
    }

    /// Start of the validity period, in seconds since the unix epoch.
    pub fn not_before(&self) -> u64 {
        self.inner
            .tbs_certificate
            .validity
            .not_before
            .to_unix_duration()
            .as_secs()
    }

    /// End of the validity period, in seconds since the unix epoch.
    pub fn not_after(&self) -> u64 {
        self.inner
            .tbs_certificate
            .validity
            .not_after
            .to_unix_duration()
            .as_secs()
    }

    /// DER encoded SubjectPublicKeyInfo.
    pub fn public_key_der(&self) -> &[u8] {
        &self.spki
    }

    /// The DER encoding the certificate was decoded from.
    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    /// Re-encodes the certificate as a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> String {
        pem::encode(&pem::Pem::new(LABEL_CERTIFICATE, self.der.clone()))
    }

    /// The underlying parsed structure.
    pub fn inner(&self) -> &x509_cert::Certificate {
        &self.inner
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (serial {})", self.subject(), self.serial_number)
    }
}

pub fn decode_certificate(buffer: &[u8]) -> Result<Certificate, DecodeError> {
    let block = first_block(buffer)?;
    Certificate::from_der(block.contents())
}

#[cfg(test)]
mod should {
    use super::{decode_certificate, SerialNumber};
    use crate::artifact::DecodeError;
    use num_bigint::BigInt;
    use rstest::rstest;
    use std::{fs::File, io::Read};

    fn load_file(path: &str) -> Vec<u8> {
        let mut f = File::open(path).unwrap();
        let mut buf = Vec::new();
        f.read_to_end(&mut buf).unwrap();
        buf
    }

    #[rstest]
    #[case("assets/tests/leaf_5.pem", 5)]
    #[case("assets/tests/leaf_19.pem", 19)]
    #[case("assets/tests/leaf_20.pem", 20)]
    #[case("assets/tests/leaf_300.pem", 300)]
    fn decode_serial_number(#[case] path: &str, #[case] serial: u64) {
        let cert = decode_certificate(&load_file(path)).unwrap();
        assert_eq!(cert.serial_number(), &SerialNumber::from(serial));
    }

    #[test]
    fn decode_serial_wider_than_a_machine_word() {
        let cert = decode_certificate(&load_file("assets/tests/leaf_big_revoked.pem")).unwrap();
        let expected = BigInt::parse_bytes(b"AB0000000000000000000000000000000013", 16).unwrap();
        assert_eq!(cert.serial_number().as_bigint(), &expected);
        assert_eq!(
            cert.serial_number().to_string(),
            "ab:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:13"
        );
    }

    #[test]
    fn expose_names_and_validity() {
        let cert = decode_certificate(&load_file("assets/tests/leaf_19.pem")).unwrap();
        assert_eq!(cert.subject(), "CN=leaf_19.example.com");
        assert_eq!(cert.issuer(), "CN=Test Root CA");
        assert!(cert.not_before() < cert.not_after());
    }

    #[test]
    fn round_trip_through_pem() {
        let cert = decode_certificate(&load_file("assets/tests/leaf_big_valid.pem")).unwrap();
        let again = decode_certificate(cert.to_pem().as_bytes()).unwrap();
        assert_eq!(again.serial_number(), cert.serial_number());
        assert_eq!(again, cert);
    }

    #[rstest]
    #[case::garbage("-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n")]
    #[case::truncated("-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIBEzAK\n-----END CERTIFICATE-----\n")]
    fn reject_corrupted_payload(#[case] input: &str) {
        assert_eq!(
            decode_certificate(input.as_bytes()).unwrap_err(),
            DecodeError::InvalidCertificate
        );
    }

    #[test]
    fn reject_key_payload() {
        let result = decode_certificate(&load_file("assets/tests/rsa_pkcs8.pem"));
        assert_eq!(result.unwrap_err(), DecodeError::InvalidCertificate);
    }

    #[test]
    fn reject_missing_delimiters() {
        let result = decode_certificate(b"MIIBszCCAVmgAwIBAgIBEzAK");
        assert_eq!(result.unwrap_err(), DecodeError::MalformedInput);
    }

    #[rstest]
    #[case("13", 19)]
    #[case("01:2c", 300)]
    #[case("0x12C", 300)]
    #[case(" 00:05 ", 5)]
    fn parse_reported_serials(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(input.parse::<SerialNumber>().unwrap(), SerialNumber::from(expected));
    }

    #[rstest]
    #[case("")]
    #[case("0x")]
    #[case("zz:01")]
    #[case("-")]
    fn reject_malformed_serials(#[case] input: &str) {
        assert!(input.parse::<SerialNumber>().is_err());
    }
}
