// Copyright 2024, 2025 New Vector Ltd.
// Copyright 2022-2024 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use figment::Figment;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod discovery;
mod http;

pub use self::{
    discovery::{DiscoveryConfig, MetadataPolicy},
    http::HttpClientConfig,
};
use crate::util::ConfigurationSection;

/// Application configuration root
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RootConfig {
    /// Configuration of the HTTP client
    #[serde(default, skip_serializing_if = "HttpClientConfig::is_default")]
    pub http: HttpClientConfig,

    /// Configuration of the Credential Issuer discovery
    #[serde(default, skip_serializing_if = "DiscoveryConfig::is_default")]
    pub discovery: DiscoveryConfig,
}

impl ConfigurationSection for RootConfig {
    fn validate(&self, figment: &Figment) -> Result<(), figment::Error> {
        self.http.validate(figment)?;
        self.discovery.validate(figment)?;

        Ok(())
    }
}
