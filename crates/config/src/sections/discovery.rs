// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ConfigurationSection;

/// How strictly the metadata of a Credential Issuer is validated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetadataPolicy {
    /// `secure`: Validate the metadata according to OpenID4VCI
    #[default]
    Secure,

    /// `insecure`: Only check that the metadata is for the right issuer and
    /// has the fields required to request a credential
    Insecure,
}

impl MetadataPolicy {
    fn is_default(&self) -> bool {
        matches!(self, Self::Secure)
    }
}

/// Configuration of the Credential Issuer discovery
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DiscoveryConfig {
    /// How strictly the metadata is validated. Defaults to `secure`.
    #[serde(default, skip_serializing_if = "MetadataPolicy::is_default")]
    pub policy: MetadataPolicy,

    /// Accept issuer identifiers using the `http` scheme.
    ///
    /// This should only be used for local development.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_http: bool,
}

impl DiscoveryConfig {
    pub(crate) fn is_default(&self) -> bool {
        self.policy.is_default() && !self.allow_http
    }
}

impl ConfigurationSection for DiscoveryConfig {
    const PATH: Option<&'static str> = Some("discovery");
}
