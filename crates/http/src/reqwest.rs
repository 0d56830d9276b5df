// Copyright 2024, 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::{str::FromStr, sync::Arc, time::Duration};

use headers::{ContentLength, HeaderMapExt as _, UserAgent};
use hyper_util::client::legacy::connect::{
    HttpInfo,
    dns::{GaiResolver, Name},
};
use rustls_platform_verifier::ConfigVerifierExt;
use tokio::time::Instant;
use tower::{BoxError, Service as _};
use tracing::Instrument;

/// The `User-Agent` sent with every request made by [`client`]
pub static USER_AGENT: &str = concat!("vci-discovery/", env!("CARGO_PKG_VERSION"));

struct TracingResolver {
    inner: GaiResolver,
}

impl TracingResolver {
    fn new() -> Self {
        let inner = GaiResolver::new();
        Self { inner }
    }
}

impl reqwest::dns::Resolve for TracingResolver {
    fn resolve(&self, name: reqwest::dns::Name) -> reqwest::dns::Resolving {
        let span = tracing::info_span!("dns.resolve", name = name.as_str());
        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let name = Name::from_str(name.as_str()).map_err(|err| -> BoxError { Box::new(err) })?;
                let addrs = inner
                    .call(name)
                    .await
                    .map_err(|err| -> BoxError { Box::new(err) })?;
                let addrs: reqwest::dns::Addrs = Box::new(addrs);
                Ok(addrs)
            }
            .instrument(span),
        )
    }
}

/// Create a new [`reqwest::ClientBuilder`] with sane parameters
///
/// Callers can further tweak the timeouts or the user agent before building
/// the client.
///
/// # Panics
///
/// Panics if the platform TLS verifier can't be initialized, which should
/// never happen
#[must_use]
pub fn client_builder() -> reqwest::ClientBuilder {
    // The explicit typing here is because `use_preconfigured_tls` accepts
    // `Any`, but wants a `ClientConfig` under the hood. This helps us detect
    // breaking changes in the rustls-platform-verifier API.
    let tls_config: rustls::ClientConfig =
        rustls::ClientConfig::with_platform_verifier().expect("failed to create TLS config");

    reqwest::Client::builder()
        .dns_resolver(Arc::new(TracingResolver::new()))
        .use_preconfigured_tls(tls_config)
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(30))
}

/// Create a new [`reqwest::Client`] with sane parameters
///
/// # Panics
///
/// Panics if the client fails to build, which should never happen
#[must_use]
pub fn client() -> reqwest::Client {
    client_builder()
        .build()
        .expect("failed to create HTTP client")
}

async fn send_traced(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, reqwest::Error> {
    let start = Instant::now();
    let (client, request) = request.build_split();
    let request = request?;

    let headers = request.headers();
    let server_address = request.url().host_str().map(ToOwned::to_owned);
    let server_port = request.url().port_or_known_default();
    let user_agent = headers
        .typed_get::<UserAgent>()
        .map(tracing::field::display);
    let content_length = headers.typed_get().map(|ContentLength(len)| len);
    let method = request.method().to_string();

    let span = tracing::info_span!(
        "http.client.request",
        "otel.kind" = "client",
        "otel.status_code" = tracing::field::Empty,
        "http.request.method" = method,
        "url.full" = %request.url(),
        "http.response.status_code" = tracing::field::Empty,
        "server.address" = server_address,
        "server.port" = server_port,
        "http.request.body.size" = content_length,
        "http.response.body.size" = tracing::field::Empty,
        "network.transport" = "tcp",
        "network.type" = tracing::field::Empty,
        "network.peer.address" = tracing::field::Empty,
        "network.peer.port" = tracing::field::Empty,
        "user_agent.original" = user_agent,
        "rust.error" = tracing::field::Empty,
    );

    async move {
        let span = tracing::Span::current();
        let result = client.execute(request).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(response) => {
                span.record("otel.status_code", "OK");
                span.record("http.response.status_code", response.status().as_u16());

                if let Some(ContentLength(content_length)) = response.headers().typed_get() {
                    span.record("http.response.body.size", content_length);
                }

                if let Some(http_info) = response.extensions().get::<HttpInfo>() {
                    let peer = http_info.remote_addr();
                    let family = if peer.is_ipv4() { "ipv4" } else { "ipv6" };
                    span.record("network.type", family);
                    span.record("network.peer.address", peer.ip().to_string());
                    span.record("network.peer.port", peer.port());
                }

                tracing::debug!(duration_ms, status = %response.status(), "HTTP request completed");
            }
            Err(err) => {
                span.record("otel.status_code", "ERROR");
                span.record("rust.error", err as &dyn std::error::Error);

                tracing::debug!(duration_ms, "HTTP request failed");
            }
        }

        result
    }
    .instrument(span)
    .await
}

/// An extension trait implemented for [`reqwest::RequestBuilder`] to send a
/// request with a tracing span.
pub trait RequestBuilderExt {
    /// Send the request with a tracing span.
    fn send_traced(self) -> impl Future<Output = Result<reqwest::Response, reqwest::Error>> + Send;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn send_traced(self) -> impl Future<Output = Result<reqwest::Response, reqwest::Error>> + Send {
        send_traced(self)
    }
}
