// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Requests for the [Credential Issuer Metadata].
//!
//! [Credential Issuer Metadata]: https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html#name-credential-issuer-metadata

use url::Url;
use vci_http::RequestBuilderExt;
use vci_issuer_metadata::{CredentialIssuerId, MetadataPolicy, VerifiedCredentialIssuerMetadata};

use crate::{
    CredentialIssuerMetadataParser, MetadataParser,
    error::{FetchError, ResolveError},
    is_json,
    well_known::{path_preserving_well_known_url, well_known_url},
};

/// GET `url` and read the response body as text.
///
/// The status code is not checked: an error page is a body like any other.
async fn fetch_body(client: &reqwest::Client, url: &Url) -> Result<String, FetchError> {
    let http_error = |source: reqwest::Error| FetchError::Http {
        url: url.clone(),
        source,
    };

    let response = client
        .get(url.as_str())
        .send_traced()
        .await
        .map_err(http_error)?;

    tracing::debug!(%url, status = %response.status(), "Got a response");

    response.text().await.map_err(http_error)
}

/// Fetch the metadata document of the given Credential Issuer, without
/// interpreting it.
///
/// The well-known path on the issuer's origin is tried first. If that
/// response is not JSON, the well-known path inserted before the issuer's
/// path is tried next. A transport error on the first request stops
/// everything: the second URL is only tried when the first one answered
/// with something that isn't JSON.
///
/// # Errors
///
/// Returns [`FetchError::Http`] if one of the requests fails, or
/// [`FetchError::NotJson`] if neither URL returned JSON.
pub async fn fetch_metadata_document(
    client: &reqwest::Client,
    issuer: &CredentialIssuerId,
) -> Result<String, FetchError> {
    tracing::debug!("Fetching credential issuer metadata...");

    let url = well_known_url(issuer);
    let body = fetch_body(client, &url).await?;
    if is_json(&body) {
        return Ok(body);
    }

    let url = path_preserving_well_known_url(issuer);
    tracing::debug!(%url, "Response is not JSON, trying the path-preserving URL");

    let body = fetch_body(client, &url).await?;
    if is_json(&body) {
        return Ok(body);
    }

    Err(FetchError::NotJson { url })
}

/// Fetch the metadata of a Credential Issuer and hand it to the given
/// parser.
///
/// # Arguments
///
/// * `client` - The reqwest client to use for making HTTP requests.
///
/// * `parser` - The parser which decodes and validates the document.
///
/// * `issuer` - The identifier of the Credential Issuer.
///
/// * `policy` - Passed to the parser as-is.
///
/// # Errors
///
/// Returns [`ResolveError::Fetch`] if no JSON document could be retrieved,
/// or [`ResolveError::Metadata`] with the parser's error if the document was
/// rejected.
#[tracing::instrument(skip_all, fields(issuer = %issuer))]
pub async fn resolve_with<P>(
    client: &reqwest::Client,
    parser: &P,
    issuer: &CredentialIssuerId,
    policy: &P::Policy,
) -> Result<P::Metadata, ResolveError<P::Error>>
where
    P: MetadataParser,
{
    let json = fetch_metadata_document(client, issuer)
        .await
        .inspect_err(|error| tracing::warn!(%error, "Could not fetch credential issuer metadata"))?;

    parser.parse(&json, issuer, policy).map_err(|error| {
        tracing::warn!(%error, "Credential issuer metadata was rejected");
        ResolveError::Metadata(error)
    })
}

/// Fetch the metadata of a Credential Issuer and validate it.
///
/// # Errors
///
/// Returns an error if the document couldn't be fetched or if it doesn't
/// pass the checks required by `policy`.
pub async fn resolve(
    client: &reqwest::Client,
    issuer: &CredentialIssuerId,
    policy: MetadataPolicy,
) -> Result<VerifiedCredentialIssuerMetadata, ResolveError> {
    resolve_with(client, &CredentialIssuerMetadataParser, issuer, &policy).await
}
