// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! The [Credential Issuer Identifier].
//!
//! [Credential Issuer Identifier]: https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html#name-credential-issuer-identifier

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// All possible errors when building a [`CredentialIssuerId`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidCredentialIssuerId {
    /// The identifier is not a valid URL.
    #[error(transparent)]
    Parse(#[from] url::ParseError),

    /// The identifier doesn't use the `https` scheme.
    #[error("credential issuer identifier must use the https scheme, got {0:?}")]
    NonHttpsScheme(String),

    /// The identifier has no host.
    #[error("credential issuer identifier must have a host")]
    MissingHost,

    /// The identifier has a username or password.
    #[error("credential issuer identifier must not have user information")]
    HasUserinfo,

    /// The identifier has a query component.
    #[error("credential issuer identifier must not have a query component")]
    HasQuery,

    /// The identifier has a fragment component.
    #[error("credential issuer identifier must not have a fragment component")]
    HasFragment,
}

/// The identifier of a Credential Issuer.
///
/// This is a URL using the `https` scheme, with a host, an optional port and
/// optional path components, but no user information, query or fragment
/// components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialIssuerId(Url);

impl CredentialIssuerId {
    /// Validate the given URL as a Credential Issuer Identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL doesn't use the `https` scheme, has no
    /// host, or has user information, a query or a fragment component.
    pub fn new(url: Url) -> Result<Self, InvalidCredentialIssuerId> {
        if url.scheme() != "https" {
            return Err(InvalidCredentialIssuerId::NonHttpsScheme(
                url.scheme().to_owned(),
            ));
        }

        Self::check_components(url)
    }

    /// Like [`CredentialIssuerId::new`], but also accepts the `http` scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL uses a scheme other than `http` or
    /// `https`, has no host, or has user information, a query or a fragment.
    ///
    /// # Warning
    ///
    /// This is meant for local development and tests. A plain `http` issuer
    /// is not allowed by OpenID4VCI.
    pub fn new_insecure(url: Url) -> Result<Self, InvalidCredentialIssuerId> {
        if !matches!(url.scheme(), "https" | "http") {
            return Err(InvalidCredentialIssuerId::NonHttpsScheme(
                url.scheme().to_owned(),
            ));
        }

        Self::check_components(url)
    }

    fn check_components(url: Url) -> Result<Self, InvalidCredentialIssuerId> {
        if url.host_str().is_none_or(str::is_empty) {
            return Err(InvalidCredentialIssuerId::MissingHost);
        }

        if !url.username().is_empty() || url.password().is_some() {
            return Err(InvalidCredentialIssuerId::HasUserinfo);
        }

        if url.query().is_some() {
            return Err(InvalidCredentialIssuerId::HasQuery);
        }

        if url.fragment().is_some() {
            return Err(InvalidCredentialIssuerId::HasFragment);
        }

        Ok(Self(url))
    }

    /// The identifier as a URL.
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the identifier and return the inner URL.
    #[must_use]
    pub fn into_url(self) -> Url {
        self.0
    }
}

impl FromStr for CredentialIssuerId {
    type Err = InvalidCredentialIssuerId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse()?)
    }
}

impl TryFrom<String> for CredentialIssuerId {
    type Error = InvalidCredentialIssuerId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CredentialIssuerId> for String {
    fn from(value: CredentialIssuerId) -> Self {
        value.0.into()
    }
}

impl From<CredentialIssuerId> for Url {
    fn from(value: CredentialIssuerId) -> Self {
        value.0
    }
}

impl AsRef<str> for CredentialIssuerId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CredentialIssuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
