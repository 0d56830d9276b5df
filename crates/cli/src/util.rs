// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use anyhow::Context;
use url::Url;
use vci_config::{HttpClientConfig, MetadataPolicy as ConfigMetadataPolicy};
use vci_issuer_metadata::{CredentialIssuerId, InvalidCredentialIssuerId, MetadataPolicy};

pub fn http_client_from_config(config: &HttpClientConfig) -> anyhow::Result<reqwest::Client> {
    let mut builder = vci_http::client_builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout);

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder.build().context("could not build the HTTP client")
}

pub fn metadata_policy_from_config(policy: ConfigMetadataPolicy) -> MetadataPolicy {
    match policy {
        ConfigMetadataPolicy::Secure => MetadataPolicy::Secure,
        ConfigMetadataPolicy::Insecure => MetadataPolicy::Insecure,
    }
}

/// Parse a Credential Issuer Identifier given on the command line
pub fn issuer_from_arg(
    issuer: &str,
    allow_http: bool,
) -> Result<CredentialIssuerId, InvalidCredentialIssuerId> {
    let url = Url::parse(issuer)?;
    if allow_http {
        CredentialIssuerId::new_insecure(url)
    } else {
        CredentialIssuerId::new(url)
    }
}
