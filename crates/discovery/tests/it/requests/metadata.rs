// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::{net::TcpListener, time::Duration};

use assert_matches::assert_matches;
use url::Url;
use vci_discovery::{
    error::{FetchError, ResolveError},
    metadata::{
        CredentialIssuerId, MetadataParseError, MetadataPolicy, MetadataVerificationError,
    },
    requests::metadata::{fetch_metadata_document, resolve, resolve_with},
};
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{method, path},
};

use crate::{
    HTML_ERROR_PAGE, RecordingParser, TENANT_PATH, fallback_path, init_test, issuer,
    metadata_json, primary_path,
};

#[tokio::test]
async fn pass_resolve_primary() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let metadata = resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap();

    assert_eq!(metadata.credential_issuer(), issuer.as_url());
    assert!(metadata.credential_configuration("UniversityDegree").is_some());
}

#[tokio::test]
async fn pass_resolve_fallback() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);

    assert_eq!(
        fallback_path(&issuer),
        "/.well-known/openid-credential-issuer/tenant/123"
    );

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("content-type", "text/html")
                .set_body_string(HTML_ERROR_PAGE),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let metadata = resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap();

    assert_eq!(metadata.credential_issuer(), issuer.as_url());
}

#[tokio::test]
async fn pass_resolve_fallback_on_empty_body() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let document = fetch_metadata_document(&http_client, &issuer)
        .await
        .unwrap();

    let document: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(document, metadata_json(&issuer));
}

#[tokio::test]
async fn pass_resolve_without_path_asks_twice() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, "/");

    assert_eq!(primary_path(&issuer), fallback_path(&issuer));

    // The first request gets an error page, the second one gets the metadata
    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(503).set_body_string(HTML_ERROR_PAGE))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(1)
        .mount(&mock_server)
        .await;

    resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap();
}

#[tokio::test]
async fn pass_resolve_with_custom_parser() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);
    let parser = RecordingParser::default();

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_string("[\"anything\"]"))
        .mount(&mock_server)
        .await;

    let (document, policy) = resolve_with(&http_client, &parser, &issuer, &"lenient".to_owned())
        .await
        .unwrap();

    assert_eq!(document, serde_json::json!(["anything"]));
    assert_eq!(policy, "lenient");
    assert_eq!(parser.calls(), 1);
}

#[tokio::test]
async fn pass_resolve_is_idempotent() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(404).set_body_string(HTML_ERROR_PAGE))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let first = resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap();
    let second = resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn fail_resolve_not_json() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);
    let parser = RecordingParser::default();

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_string(HTML_ERROR_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(ResponseTemplate::new(404).set_body_string(HTML_ERROR_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let error = resolve_with(&http_client, &parser, &issuer, &String::new())
        .await
        .unwrap_err();

    assert_matches!(
        error,
        ResolveError::Fetch(FetchError::NotJson { url }) if url.path() == fallback_path(&issuer)
    );
    assert_eq!(parser.calls(), 0);
}

#[tokio::test]
async fn fail_resolve_timeout() {
    let (_, mock_server) = init_test().await;
    let http_client = vci_http::client_builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let issuer = issuer(&mock_server, TENANT_PATH);

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(metadata_json(&issuer))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let error = resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap_err();

    assert_matches!(
        error,
        ResolveError::Fetch(FetchError::Http { url, source }) => {
            assert_eq!(url.path(), primary_path(&issuer));
            assert!(source.is_timeout());
        }
    );
}

#[tokio::test]
async fn fail_resolve_fallback_timeout() {
    let (_, mock_server) = init_test().await;
    let http_client = vci_http::client_builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let issuer = issuer(&mock_server, TENANT_PATH);

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(404).set_body_string(HTML_ERROR_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(metadata_json(&issuer))
                .set_delay(Duration::from_secs(5)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let error = resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap_err();

    assert_matches!(
        error,
        ResolveError::Fetch(FetchError::Http { url, source }) => {
            assert_eq!(url.path(), fallback_path(&issuer));
            assert!(source.is_timeout());
        }
    );
}

#[tokio::test]
async fn fail_resolve_connection_refused() {
    let (http_client, _mock_server) = init_test().await;

    // Grab a free port, and close it right away
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{address}/tenant/123")).unwrap();
    let issuer = CredentialIssuerId::new_insecure(url).unwrap();

    let error = resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap_err();

    assert_matches!(
        error,
        ResolveError::Fetch(FetchError::Http { url, .. }) if url.path() == "/.well-known/openid-credential-issuer"
    );
}

#[tokio::test]
async fn fail_resolve_invalid_metadata() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let error = resolve(&http_client, &issuer, MetadataPolicy::Insecure)
        .await
        .unwrap_err();

    assert_matches!(
        error,
        ResolveError::Metadata(MetadataParseError::Verification(
            MetadataVerificationError::MissingCredentialIssuer
        ))
    );
}

#[tokio::test]
async fn fail_resolve_secure_policy_on_http_endpoints() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .mount(&mock_server)
        .await;

    let error = resolve(&http_client, &issuer, MetadataPolicy::Secure)
        .await
        .unwrap_err();

    assert_matches!(
        error,
        ResolveError::Metadata(MetadataParseError::Verification(
            MetadataVerificationError::UrlNonHttpsScheme("credential_endpoint", _)
        ))
    );
}

#[tokio::test]
async fn cancelled_resolve_never_falls_back() {
    let (http_client, mock_server) = init_test().await;
    let issuer = issuer(&mock_server, TENANT_PATH);

    Mock::given(method("GET"))
        .and(path(primary_path(&issuer)))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(HTML_ERROR_PAGE)
                .set_delay(Duration::from_secs(1)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(fallback_path(&issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata_json(&issuer)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = tokio::time::timeout(
        Duration::from_millis(200),
        resolve(&http_client, &issuer, MetadataPolicy::Insecure),
    )
    .await;
    assert!(result.is_err());

    // Give a chance to a stray request to reach the server
    tokio::time::sleep(Duration::from_millis(1500)).await;
}
