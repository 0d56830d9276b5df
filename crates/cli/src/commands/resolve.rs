// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use figment::Figment;
use tokio::io::AsyncWriteExt;
use vci_config::{ConfigurationSection, RootConfig};
use vci_discovery::requests::metadata::resolve;
use vci_issuer_metadata::MetadataPolicy;

use crate::util::{http_client_from_config, issuer_from_arg, metadata_policy_from_config};

#[derive(Parser, Debug)]
pub(super) struct Options {
    /// The Credential Issuer Identifier, e.g. `https://issuer.example.com/tenant`
    issuer: String,

    /// Only check that the metadata is usable, not that it is fully valid
    #[arg(long)]
    insecure: bool,

    /// Accept an issuer identifier using the `http` scheme
    #[arg(long)]
    allow_http: bool,
}

impl Options {
    #[tracing::instrument(name = "cli.resolve", skip_all, fields(issuer = %self.issuer))]
    pub async fn run(self, figment: &Figment) -> anyhow::Result<ExitCode> {
        let config = RootConfig::extract(figment).context("failed to load the configuration")?;

        let policy = if self.insecure {
            MetadataPolicy::Insecure
        } else {
            metadata_policy_from_config(config.discovery.policy)
        };
        let issuer = issuer_from_arg(&self.issuer, self.allow_http || config.discovery.allow_http)
            .context("invalid credential issuer identifier")?;
        let client = http_client_from_config(&config.http)?;

        let metadata = match resolve(&client, &issuer, policy).await {
            Ok(metadata) => metadata,
            Err(err) => {
                let err = anyhow::Error::from(err);
                tracing::error!("{err:#}");
                return Ok(ExitCode::FAILURE);
            }
        };

        tracing::info!(
            credential_endpoint = %metadata.credential_endpoint(),
            configurations = metadata.credential_configurations_supported().len(),
            "Resolved credential issuer metadata"
        );

        let mut json = serde_json::to_string_pretty(&metadata)?;
        json.push('\n');

        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.flush().await?;

        Ok(ExitCode::SUCCESS)
    }
}
