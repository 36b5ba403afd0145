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

//! Constants for PEM artifact decoding.

use spki::ObjectIdentifier;

// =============================================================================
// PEM labels (RFC 7468)
// =============================================================================

pub const LABEL_CERTIFICATE: &str = "CERTIFICATE";
pub const LABEL_X509_CERTIFICATE: &str = "X509 CERTIFICATE";
pub const LABEL_CRL: &str = "X509 CRL";
pub const LABEL_PRIVATE_KEY: &str = "PRIVATE KEY";
pub const LABEL_RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";
pub const LABEL_EC_PRIVATE_KEY: &str = "EC PRIVATE KEY";

// =============================================================================
// Private key algorithm OIDs
// =============================================================================

pub const OID_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
pub const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
pub const OID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

// Named curves carried in the EC algorithm parameters
pub const OID_SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
pub const OID_SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

// =============================================================================
// Response shape
// =============================================================================

pub const RESPONSE_ERROR_KEY: &str = "error";
pub const RESPONSE_DATA_KEY: &str = "data";
