// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Types for the [Credential Issuer Metadata].
//!
//! [Credential Issuer Metadata]: https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html#name-credential-issuer-metadata-p

use std::ops::Deref;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use thiserror::Error;
use url::Url;

use crate::{CredentialIssuerId, MetadataPolicy};

/// Information about the encryption of the Credential Response supported by
/// the Credential Issuer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialResponseEncryption {
    /// JWE `alg` values supported to encrypt the Credential Response.
    #[serde(default)]
    pub alg_values_supported: Vec<String>,

    /// JWE `enc` values supported to encrypt the Credential Response.
    #[serde(default)]
    pub enc_values_supported: Vec<String>,

    /// Whether the Credential Issuer requires the Credential Response to be
    /// encrypted.
    #[serde(default)]
    pub encryption_required: bool,
}

/// Information about the support for batch issuance of credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCredentialIssuance {
    /// The maximum array size for the `proofs` parameter in a Credential
    /// Request.
    pub batch_size: u64,
}

/// A logo to display.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo {
    /// Where the logo can be fetched.
    pub uri: Url,

    /// Alternative text for the logo.
    pub alt_text: Option<String>,
}

/// Display properties of the Credential Issuer for a given language.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssuerDisplay {
    /// Display name of the Credential Issuer.
    pub name: Option<String>,

    /// Language of this object, as a BCP47 language tag.
    pub locale: Option<String>,

    /// Logo of the Credential Issuer.
    pub logo: Option<Logo>,
}

/// Display properties of a supported credential for a given language.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDisplay {
    /// Display name of the credential.
    pub name: String,

    /// Language of this object, as a BCP47 language tag.
    pub locale: Option<String>,

    /// Logo of the credential.
    pub logo: Option<Logo>,

    /// Description of the credential.
    pub description: Option<String>,

    /// Background color of the credential, as a CSS color.
    pub background_color: Option<String>,

    /// Text color of the credential, as a CSS color.
    pub text_color: Option<String>,
}

/// A proof type supported by a credential configuration.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProofType {
    /// Algorithms supported to sign the proof.
    #[serde(default)]
    pub proof_signing_alg_values_supported: Vec<String>,

    /// Requirements on key attestations, kept as-is.
    pub key_attestations_required: Option<Value>,
}

/// A credential the Credential Issuer is able to issue.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialConfiguration {
    /// Format of the credential, e.g. `jwt_vc_json` or `mso_mdoc`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,

    /// Scope value to use to request this credential in an authorization
    /// request.
    pub scope: Option<String>,

    /// How the credential is bound to the key material of the holder.
    pub cryptographic_binding_methods_supported: Option<Vec<String>>,

    /// Algorithms the Credential Issuer uses to sign the credential.
    ///
    /// These are strings for JOSE-based formats and integers for COSE-based
    /// formats, so they are kept as raw JSON values.
    pub credential_signing_alg_values_supported: Option<Vec<Value>>,

    /// Proof types supported, keyed by proof type.
    pub proof_types_supported: Option<IndexMap<String, ProofType>>,

    /// Display properties of the credential.
    pub display: Option<Vec<CredentialDisplay>>,

    /// Format-specific parameters.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The metadata published by a Credential Issuer.
///
/// Every field is optional here so that missing required fields are
/// reported by [`CredentialIssuerMetadata::validate()`] instead of failing
/// deserialization.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialIssuerMetadata {
    /// The Credential Issuer's identifier.
    pub credential_issuer: Option<String>,

    /// Identifiers of the OAuth 2.0 Authorization Servers the Credential
    /// Issuer relies on.
    ///
    /// If omitted, the Credential Issuer acts as its own Authorization
    /// Server.
    pub authorization_servers: Option<Vec<Url>>,

    /// URL of the Credential Endpoint.
    pub credential_endpoint: Option<Url>,

    /// URL of the Nonce Endpoint.
    pub nonce_endpoint: Option<Url>,

    /// URL of the Deferred Credential Endpoint.
    pub deferred_credential_endpoint: Option<Url>,

    /// URL of the Notification Endpoint.
    pub notification_endpoint: Option<Url>,

    /// Support for encryption of the Credential Response.
    pub credential_response_encryption: Option<CredentialResponseEncryption>,

    /// Support for batch issuance.
    pub batch_credential_issuance: Option<BatchCredentialIssuance>,

    /// A JWT containing metadata parameters as claims.
    ///
    /// This is passed through without being verified.
    pub signed_metadata: Option<String>,

    /// Display properties of the Credential Issuer.
    pub display: Option<Vec<IssuerDisplay>>,

    /// The credentials the Credential Issuer supports, keyed by credential
    /// configuration identifier.
    pub credential_configurations_supported: Option<IndexMap<String, CredentialConfiguration>>,
}

/// All errors that can happen when validating a [`CredentialIssuerMetadata`].
#[derive(Debug, Error)]
pub enum MetadataVerificationError {
    /// The credential issuer is missing.
    #[error("missing credential issuer")]
    MissingCredentialIssuer,

    /// The credential issuer is not a valid URL.
    #[error("invalid credential issuer {0:?}")]
    InvalidCredentialIssuer(String),

    /// The credential issuer is not the one that was requested.
    #[error("credential issuer {found:?} doesn't match the expected {expected:?}")]
    CredentialIssuerMismatch {
        /// The identifier the metadata was fetched for.
        expected: String,
        /// The identifier found in the metadata.
        found: String,
    },

    /// The credential endpoint is missing.
    #[error("missing credential endpoint")]
    MissingCredentialEndpoint,

    /// An URL doesn't use the `https` scheme.
    #[error("{0}'s URL doesn't use a https scheme: {1}")]
    UrlNonHttpsScheme(&'static str, Url),

    /// The list of authorization servers is present but empty.
    #[error("empty authorization servers list")]
    EmptyAuthorizationServers,

    /// No credential configuration is supported.
    #[error("missing credential configurations")]
    MissingCredentialConfigurations,

    /// A credential configuration has no format.
    #[error("credential configuration {0:?} has no format")]
    MissingCredentialFormat(String),

    /// A credential configuration has binding methods but no proof types.
    #[error("credential configuration {0:?} has binding methods but no proof types")]
    MissingProofTypes(String),

    /// A proof type lists no signing algorithm.
    #[error(
        "proof type {proof_type:?} of credential configuration {configuration:?} has no signing algorithm"
    )]
    MissingProofSigningAlgorithms {
        /// The credential configuration identifier.
        configuration: String,
        /// The proof type.
        proof_type: String,
    },

    /// The credential response encryption lacks algorithms or methods.
    #[error("credential response encryption must list at least one alg and one enc value")]
    InvalidCredentialResponseEncryption,

    /// The batch size is lower than 2.
    #[error("batch size must be at least 2, got {0}")]
    InvalidBatchSize(u64),
}

impl CredentialIssuerMetadata {
    /// Validate this metadata for the given Credential Issuer, according to
    /// the given policy.
    ///
    /// # Errors
    ///
    /// Returns an error if a check required by `policy` fails.
    pub fn validate(
        self,
        issuer: &CredentialIssuerId,
        policy: MetadataPolicy,
    ) -> Result<VerifiedCredentialIssuerMetadata, MetadataVerificationError> {
        let credential_issuer = self.verify_basics(issuer)?;

        if policy.is_secure() {
            self.verify_secure()?;
        }

        Ok(VerifiedCredentialIssuerMetadata {
            inner: self,
            credential_issuer,
        })
    }

    fn verify_basics(&self, issuer: &CredentialIssuerId) -> Result<Url, MetadataVerificationError> {
        let Some(found) = &self.credential_issuer else {
            return Err(MetadataVerificationError::MissingCredentialIssuer);
        };

        let credential_issuer = Url::parse(found)
            .map_err(|_| MetadataVerificationError::InvalidCredentialIssuer(found.clone()))?;

        if &credential_issuer != issuer.as_url() {
            return Err(MetadataVerificationError::CredentialIssuerMismatch {
                expected: issuer.as_str().to_owned(),
                found: found.clone(),
            });
        }

        if self.credential_endpoint.is_none() {
            return Err(MetadataVerificationError::MissingCredentialEndpoint);
        }

        let configurations = match &self.credential_configurations_supported {
            Some(configurations) if !configurations.is_empty() => configurations,
            _ => return Err(MetadataVerificationError::MissingCredentialConfigurations),
        };

        for (id, configuration) in configurations {
            if configuration.format.is_empty() {
                return Err(MetadataVerificationError::MissingCredentialFormat(
                    id.clone(),
                ));
            }
        }

        Ok(credential_issuer)
    }

    fn verify_secure(&self) -> Result<(), MetadataVerificationError> {
        validate_url("credential_endpoint", self.credential_endpoint.as_ref())?;
        validate_url("nonce_endpoint", self.nonce_endpoint.as_ref())?;
        validate_url(
            "deferred_credential_endpoint",
            self.deferred_credential_endpoint.as_ref(),
        )?;
        validate_url(
            "notification_endpoint",
            self.notification_endpoint.as_ref(),
        )?;

        let servers = self.authorization_servers.as_deref();
        if servers.is_some_and(<[Url]>::is_empty) {
            return Err(MetadataVerificationError::EmptyAuthorizationServers);
        }

        for server in servers.unwrap_or_default() {
            validate_url("authorization_servers", Some(server))?;
        }

        if self
            .credential_response_encryption
            .as_ref()
            .is_some_and(|encryption| {
                encryption.alg_values_supported.is_empty()
                    || encryption.enc_values_supported.is_empty()
            })
        {
            return Err(MetadataVerificationError::InvalidCredentialResponseEncryption);
        }

        if let Some(batch_size) = self
            .batch_credential_issuance
            .as_ref()
            .map(|batch| batch.batch_size)
            .filter(|batch_size| *batch_size < 2)
        {
            return Err(MetadataVerificationError::InvalidBatchSize(batch_size));
        }

        for (id, configuration) in self.credential_configurations_supported.iter().flatten() {
            let binds_to_key = configuration
                .cryptographic_binding_methods_supported
                .as_ref()
                .is_some_and(|methods| !methods.is_empty());

            match &configuration.proof_types_supported {
                Some(proof_types) if !proof_types.is_empty() => {
                    for (proof_type, params) in proof_types {
                        if params.proof_signing_alg_values_supported.is_empty() {
                            return Err(
                                MetadataVerificationError::MissingProofSigningAlgorithms {
                                    configuration: id.clone(),
                                    proof_type: proof_type.clone(),
                                },
                            );
                        }
                    }
                }
                _ if binds_to_key => {
                    return Err(MetadataVerificationError::MissingProofTypes(id.clone()));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn validate_url(field: &'static str, url: Option<&Url>) -> Result<(), MetadataVerificationError> {
    match url {
        Some(url) if url.scheme() != "https" => Err(MetadataVerificationError::UrlNonHttpsScheme(
            field,
            url.clone(),
        )),
        _ => Ok(()),
    }
}

/// The verified metadata of a Credential Issuer.
///
/// All the fields required by the policy used for validation are guaranteed
/// to be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedCredentialIssuerMetadata {
    #[serde(flatten)]
    inner: CredentialIssuerMetadata,

    #[serde(skip)]
    credential_issuer: Url,
}

impl VerifiedCredentialIssuerMetadata {
    /// The Credential Issuer's identifier.
    #[must_use]
    pub fn credential_issuer(&self) -> &Url {
        &self.credential_issuer
    }

    /// URL of the Credential Endpoint.
    #[must_use]
    pub fn credential_endpoint(&self) -> &Url {
        match &self.credential_endpoint {
            Some(u) => u,
            None => unreachable!(),
        }
    }

    /// The credentials the Credential Issuer supports.
    #[must_use]
    pub fn credential_configurations_supported(&self) -> &IndexMap<String, CredentialConfiguration> {
        match &self.credential_configurations_supported {
            Some(c) => c,
            None => unreachable!(),
        }
    }

    /// The credential configuration with the given identifier, if supported.
    #[must_use]
    pub fn credential_configuration(&self, id: &str) -> Option<&CredentialConfiguration> {
        self.credential_configurations_supported().get(id)
    }

    /// The Authorization Servers to use with this Credential Issuer.
    ///
    /// Defaults to the Credential Issuer itself if none were advertised.
    #[must_use]
    pub fn authorization_servers(&self) -> &[Url] {
        match &self.authorization_servers {
            Some(servers) => servers,
            None => std::slice::from_ref(&self.credential_issuer),
        }
    }

    /// Get the inner, unverified metadata.
    #[must_use]
    pub fn into_inner(self) -> CredentialIssuerMetadata {
        self.inner
    }
}

impl Deref for VerifiedCredentialIssuerMetadata {
    type Target = CredentialIssuerMetadata;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
