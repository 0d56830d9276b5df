// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::time::Duration;

use figment::Figment;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::Error as _};
use serde_with::serde_as;

use crate::{ConfigurationSection, util::annotate};

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn is_default_timeout(value: &Duration) -> bool {
    *value == default_timeout()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

fn is_default_connect_timeout(value: &Duration) -> bool {
    *value == default_connect_timeout()
}

/// Configuration of the HTTP client used to fetch issuer metadata
#[serde_as]
#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct HttpClientConfig {
    /// Timeout of a whole request, in seconds. Defaults to 60 seconds.
    #[schemars(with = "u64", range(min = 1, max = 3600))]
    #[serde(default = "default_timeout", skip_serializing_if = "is_default_timeout")]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub timeout: Duration,

    /// Timeout to establish a connection, in seconds. Defaults to 30
    /// seconds.
    #[schemars(with = "u64", range(min = 1, max = 3600))]
    #[serde(
        default = "default_connect_timeout",
        skip_serializing_if = "is_default_connect_timeout"
    )]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub connect_timeout: Duration,

    /// Override the `User-Agent` header sent with requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: None,
        }
    }
}

impl HttpClientConfig {
    pub(crate) fn is_default(&self) -> bool {
        is_default_timeout(&self.timeout)
            && is_default_connect_timeout(&self.connect_timeout)
            && self.user_agent.is_none()
    }
}

impl ConfigurationSection for HttpClientConfig {
    const PATH: Option<&'static str> = Some("http");

    fn validate(&self, figment: &Figment) -> Result<(), figment::Error> {
        if self.timeout.is_zero() {
            return Err(annotate::<Self>(
                figment,
                "timeout",
                figment::Error::custom("timeout must be at least one second"),
            ));
        }

        if self.connect_timeout > self.timeout {
            return Err(annotate::<Self>(
                figment,
                "connect_timeout",
                figment::Error::custom("connect_timeout can't be longer than timeout"),
            ));
        }

        if self.user_agent.as_deref().is_some_and(str::is_empty) {
            return Err(annotate::<Self>(
                figment,
                "user_agent",
                figment::Error::custom("user_agent can't be empty"),
            ));
        }

        Ok(())
    }
}
