// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Turning a metadata document into structured metadata.

use vci_issuer_metadata::{
    CredentialIssuerId, MetadataParseError, MetadataPolicy, VerifiedCredentialIssuerMetadata,
};

/// Something that decodes and validates a metadata document.
///
/// The discovery logic only guarantees that `json` is syntactically valid
/// JSON; everything else is up to the parser.
pub trait MetadataParser {
    /// How strictly the document should be validated. This is passed through
    /// untouched by the discovery logic.
    type Policy;

    /// The structured metadata.
    type Metadata;

    /// The error returned when the document is rejected.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decode and validate the metadata document of `issuer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid metadata for `issuer`
    /// under `policy`.
    fn parse(
        &self,
        json: &str,
        issuer: &CredentialIssuerId,
        policy: &Self::Policy,
    ) -> Result<Self::Metadata, Self::Error>;
}

/// The default [`MetadataParser`], producing
/// [`VerifiedCredentialIssuerMetadata`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialIssuerMetadataParser;

impl MetadataParser for CredentialIssuerMetadataParser {
    type Policy = MetadataPolicy;
    type Metadata = VerifiedCredentialIssuerMetadata;
    type Error = MetadataParseError;

    fn parse(
        &self,
        json: &str,
        issuer: &CredentialIssuerId,
        policy: &Self::Policy,
    ) -> Result<Self::Metadata, Self::Error> {
        vci_issuer_metadata::parse(json, issuer, *policy)
    }
}
