// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! [Credential Issuer Metadata] discovery for [OpenID for Verifiable
//! Credential Issuance].
//!
//! Given a [`CredentialIssuerId`], this crate fetches the metadata document
//! the issuer publishes under `/.well-known/openid-credential-issuer`, and
//! hands it to a [`MetadataParser`].
//!
//! Two locations are tried, one after the other:
//!
//! 1. the well-known path appended to the issuer's origin, dropping the path
//!    of the identifier;
//! 2. if the first response is not JSON, the well-known path inserted before
//!    the path of the identifier, for issuers hosted under a sub-path.
//!
//! [Credential Issuer Metadata]: https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html#name-credential-issuer-metadata
//! [OpenID for Verifiable Credential Issuance]: https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html
//! [`CredentialIssuerId`]: vci_issuer_metadata::CredentialIssuerId

#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod parser;
pub mod requests;
mod utils;
pub mod well_known;

#[doc(inline)]
pub use vci_issuer_metadata as metadata;

pub use self::{
    parser::{CredentialIssuerMetadataParser, MetadataParser},
    utils::is_json,
};
