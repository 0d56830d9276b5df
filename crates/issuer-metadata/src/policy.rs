// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! How strictly a metadata document is validated.

use serde::{Deserialize, Serialize};

/// How strictly a [`CredentialIssuerMetadata`] is validated.
///
/// [`CredentialIssuerMetadata`]: crate::CredentialIssuerMetadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataPolicy {
    /// Validate the metadata according to OpenID4VCI.
    #[default]
    Secure,

    /// Only make basic checks on the metadata: the identifier matches, and
    /// the fields needed to request a credential are present.
    ///
    /// It is not recommended to use this in production as it doesn't ensure
    /// that the issuer implements the proper security practices.
    Insecure,
}

impl MetadataPolicy {
    /// Whether the full set of checks should be run.
    #[must_use]
    pub const fn is_secure(self) -> bool {
        matches!(self, Self::Secure)
    }
}
