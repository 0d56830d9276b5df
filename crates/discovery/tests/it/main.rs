// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use url::Url;
use vci_discovery::{
    MetadataParser,
    metadata::CredentialIssuerId,
    well_known::{path_preserving_well_known_url, well_known_url},
};
use wiremock::MockServer;


const TENANT_PATH: &str = "/tenant/123";

async fn init_test() -> (reqwest::Client, MockServer) {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let client = vci_http::reqwest_client();
    let mock_server = MockServer::start().await;

    (client, mock_server)
}

/// A Credential Issuer hosted on the mock server, under the given path.
fn issuer(mock_server: &MockServer, path: &str) -> CredentialIssuerId {
    let url = Url::parse(&mock_server.uri())
        .and_then(|url| url.join(path))
        .expect("Couldn't parse URL");

    CredentialIssuerId::new_insecure(url).expect("Invalid issuer")
}

/// Path of the primary discovery URL.
fn primary_path(issuer: &CredentialIssuerId) -> String {
    well_known_url(issuer).path().to_owned()
}

/// Path of the fallback discovery URL.
fn fallback_path(issuer: &CredentialIssuerId) -> String {
    path_preserving_well_known_url(issuer).path().to_owned()
}

fn metadata_json(issuer: &CredentialIssuerId) -> serde_json::Value {
    let endpoint = |path: &str| format!("{}/{path}", issuer.as_str().trim_end_matches('/'));

    json!({
        "credential_issuer": issuer.as_str(),
        "credential_endpoint": endpoint("credential"),
        "nonce_endpoint": endpoint("nonce"),
        "credential_configurations_supported": {
            "UniversityDegree": {
                "format": "jwt_vc_json",
                "credential_definition": {
                    "type": ["VerifiableCredential", "UniversityDegreeCredential"]
                }
            }
        }
    })
}

const HTML_ERROR_PAGE: &str = "<!DOCTYPE html><html><body><h1>Not Found</h1></body></html>";

/// A parser which records how many times it was called, and returns the
/// document and the policy it was given.
#[derive(Debug, Default)]
struct RecordingParser {
    calls: AtomicUsize,
}

impl RecordingParser {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataParser for RecordingParser {
    type Policy = String;
    type Metadata = (serde_json::Value, String);
    type Error = serde_json::Error;

    fn parse(
        &self,
        json: &str,
        _issuer: &CredentialIssuerId,
        policy: &Self::Policy,
    ) -> Result<Self::Metadata, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((serde_json::from_str(json)?, policy.clone()))
    }
}
