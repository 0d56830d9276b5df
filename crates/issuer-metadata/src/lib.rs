// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! [OpenID for Verifiable Credential Issuance] Credential Issuer metadata
//! types.
//!
//! This crate contains the identifier of a Credential Issuer, the
//! [Credential Issuer Metadata] document it publishes and the logic to
//! validate that document according to a [`MetadataPolicy`].
//!
//! [OpenID for Verifiable Credential Issuance]: https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html
//! [Credential Issuer Metadata]: https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html#name-credential-issuer-metadata

#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod issuer_id;
pub mod metadata;
pub mod policy;

use thiserror::Error;

pub use self::{
    issuer_id::{CredentialIssuerId, InvalidCredentialIssuerId},
    metadata::{
        CredentialIssuerMetadata, MetadataVerificationError, VerifiedCredentialIssuerMetadata,
    },
    policy::MetadataPolicy,
};

/// All possible errors when parsing a Credential Issuer metadata document.
#[derive(Debug, Error)]
pub enum MetadataParseError {
    /// The document is not a valid metadata JSON object.
    #[error("invalid credential issuer metadata document")]
    Json(#[from] serde_json::Error),

    /// The document was decoded but failed validation.
    #[error(transparent)]
    Verification(#[from] MetadataVerificationError),
}

/// Decode a Credential Issuer metadata document and validate it.
///
/// # Errors
///
/// Returns an error if the document can't be deserialized, or if it doesn't
/// pass the checks required by the given `policy`.
pub fn parse(
    json: &str,
    issuer: &CredentialIssuerId,
    policy: MetadataPolicy,
) -> Result<VerifiedCredentialIssuerMetadata, MetadataParseError> {
    let metadata: CredentialIssuerMetadata = serde_json::from_str(json)?;
    Ok(metadata.validate(issuer, policy)?)
}
