// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Construction of the URLs where the metadata document is looked up.

use url::Url;
use vci_issuer_metadata::CredentialIssuerId;

/// The well-known path under which Credential Issuers publish their
/// metadata.
pub const WELL_KNOWN_PATH: &str = "/.well-known/openid-credential-issuer";

/// The primary discovery URL: the well-known path on the issuer's origin.
///
/// Any path of the identifier is dropped, so
/// `https://issuer.example.com/tenant` gives
/// `https://issuer.example.com/.well-known/openid-credential-issuer`.
#[must_use]
pub fn well_known_url(issuer: &CredentialIssuerId) -> Url {
    build(issuer.as_url(), WELL_KNOWN_PATH, false)
}

/// The fallback discovery URL: the well-known path inserted before the path
/// of the identifier.
///
/// `https://issuer.example.com/tenant` gives
/// `https://issuer.example.com/.well-known/openid-credential-issuer/tenant`.
/// Without a path, this is the same as [`well_known_url`].
#[must_use]
pub fn path_preserving_well_known_url(issuer: &CredentialIssuerId) -> Url {
    build(issuer.as_url(), WELL_KNOWN_PATH, true)
}

fn build(issuer: &Url, well_known: &str, keep_path: bool) -> Url {
    let mut path = String::from("/");
    path.push_str(well_known.trim_matches('/'));

    if keep_path {
        // Empty segments come from a trailing or doubled slash
        let segments = issuer
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|segment| !segment.is_empty());

        for segment in segments {
            path.push('/');
            path.push_str(segment);
        }
    }

    let mut url = issuer.clone();
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    url
}
