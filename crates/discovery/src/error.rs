// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! The error types used in this crate.

use thiserror::Error;
use url::Url;
use vci_issuer_metadata::MetadataParseError;

/// All possible reasons why no metadata document could be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request failed before a response body could be read.
    #[error("request to {url} failed")]
    Http {
        /// The URL that was requested.
        url: Url,

        /// The error returned by the HTTP client.
        #[source]
        source: reqwest::Error,
    },

    /// None of the discovery URLs returned a JSON document.
    #[error("the response from {url} is not valid JSON")]
    NotJson {
        /// The last URL that was tried.
        url: Url,
    },
}

impl FetchError {
    /// The URL of the request that failed.
    #[must_use]
    pub fn url(&self) -> &Url {
        match self {
            Self::Http { url, .. } | Self::NotJson { url } => url,
        }
    }
}

/// All possible errors when resolving the metadata of a Credential Issuer.
///
/// `E` is the error type of the [`MetadataParser`] in use.
///
/// [`MetadataParser`]: crate::MetadataParser
#[derive(Debug, Error)]
pub enum ResolveError<E = MetadataParseError> {
    /// No metadata document could be retrieved.
    #[error("unable to fetch credential issuer metadata")]
    Fetch(#[from] FetchError),

    /// A document was retrieved, but the parser rejected it.
    #[error(transparent)]
    Metadata(E),
}
