// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::{io::Write, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use figment::Figment;
use vci_config::{ConfigurationSectionExt, DiscoveryConfig};
use vci_discovery::well_known::{path_preserving_well_known_url, well_known_url};

use crate::util::issuer_from_arg;

#[derive(Parser, Debug)]
pub(super) struct Options {
    /// The Credential Issuer Identifier, e.g. `https://issuer.example.com/tenant`
    issuer: String,

    /// Accept an issuer identifier using the `http` scheme
    #[arg(long)]
    allow_http: bool,
}

impl Options {
    pub fn run(self, figment: &Figment) -> anyhow::Result<ExitCode> {
        let _span = tracing::info_span!("cli.urls").entered();

        let config = DiscoveryConfig::extract_or_default(figment)
            .context("failed to load the configuration")?;
        let issuer = issuer_from_arg(&self.issuer, self.allow_http || config.allow_http)
            .context("invalid credential issuer identifier")?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", well_known_url(&issuer))?;
        writeln!(stdout, "{}", path_preserving_well_known_url(&issuer))?;

        Ok(ExitCode::SUCCESS)
    }
}
