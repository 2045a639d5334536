// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

mod etherscan;
mod fourbyte;
mod openchain;
mod sourcify;

pub use etherscan::EtherscanSource;
pub use fourbyte::FourByteSource;
pub use openchain::OpenChainSource;
pub use sourcify::SourcifySource;

// ============================================================================
// Errors
// ============================================================================

/// An error which arises when querying a third-party metadata or
/// signature service.  Every variant names the provider which
/// produced it, so a failure inside a composite can be traced to its
/// origin.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The provider holds no record for the address.  Composites
    /// treat this as a cue to try the next provider rather than a
    /// failure.
    #[error("{provider}: no record for {address}")]
    NotFound {
        provider: &'static str,
        address: String,
    },

    /// The request could not be completed at the transport level.
    #[error("{provider}: request for {address} failed ({url}): {source}")]
    Http {
        provider: &'static str,
        address: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with an unexpected HTTP status (anything
    /// unsuccessful other than a 404).
    #[error("{provider}: unexpected status {status} for {address} ({url})")]
    Status {
        provider: &'static str,
        address: String,
        url: String,
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("{provider}: undecodable response for {address} ({url}): {source}")]
    Decode {
        provider: &'static str,
        address: String,
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Records
// ============================================================================

/// Everything a metadata source knows about a deployed contract.  An
/// all-empty record (`ok == false`) means the source held no entry
/// for the address; this is ordinary data rather than an error, since
/// most deployed contracts are simply unverified.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContractRecord {
    /// The verified ABI as parsed JSON, or `Value::Null` when
    /// unknown.
    pub abi: Value,
    pub name: Option<String>,
    pub evm_version: Option<String>,
    pub compiler_version: Option<String>,
    /// Optimizer runs the contract was compiled with.
    pub runs: Option<u64>,
    /// Whether the source actually held a record for the address.
    pub ok: bool,
}

impl ContractRecord {
    /// The record returned when a source has no entry for an address.
    pub fn not_found() -> Self {
        Self::default()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A source of verified contract metadata, keyed by deployed address.
pub trait AbiSource: Send + Sync {
    /// Look up the record for a deployed contract.  Having no record
    /// is reported in-band (`ok == false`), not as an error.
    fn get_contract(&self, address: &str) -> Result<ContractRecord, LoaderError>;
}

/// A directory mapping 4-byte selectors and 32-byte topic hashes back
/// to human-readable signatures.  Several signatures may collide on
/// one selector, so lookups yield a list of candidates.
pub trait SignatureSource: Send + Sync {
    /// Candidate signatures for a function selector.
    fn load_functions(&self, selector: &str) -> Result<Vec<String>, LoaderError>;

    /// Candidate signatures for an event topic hash.
    fn load_events(&self, hash: &str) -> Result<Vec<String>, LoaderError>;
}

// ============================================================================
// Composites
// ============================================================================

/// Queries several metadata sources in order, returning the first
/// record found.  A source which comes up empty advances to the next;
/// any other failure short-circuits with that source's error.  If
/// every source is empty the composite reports not-found in-band,
/// like any single source would.
#[derive(Default)]
pub struct MultiAbiSource {
    sources: Vec<Box<dyn AbiSource>>,
}

impl MultiAbiSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source; earlier sources are consulted first.
    pub fn with(mut self, source: Box<dyn AbiSource>) -> Self {
        self.sources.push(source);
        self
    }
}

impl AbiSource for MultiAbiSource {
    fn get_contract(&self, address: &str) -> Result<ContractRecord, LoaderError> {
        for source in &self.sources {
            match source.get_contract(address) {
                Ok(record) if record.ok => return Ok(record),
                Ok(_) | Err(LoaderError::NotFound { .. }) => {
                    debug!("no record for {address}, advancing to next source");
                }
                Err(err) => {
                    warn!("metadata lookup for {address} aborted: {err}");
                    return Err(err);
                }
            }
        }
        Ok(ContractRecord::not_found())
    }
}

/// Queries several signature directories in order, returning the
/// first non-empty candidate list.  Same fallback discipline as
/// [`MultiAbiSource`].
#[derive(Default)]
pub struct MultiSignatureSource {
    sources: Vec<Box<dyn SignatureSource>>,
}

impl MultiSignatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory; earlier directories are consulted first.
    pub fn with(mut self, source: Box<dyn SignatureSource>) -> Self {
        self.sources.push(source);
        self
    }

    fn first_non_empty<F>(&self, key: &str, mut lookup: F) -> Result<Vec<String>, LoaderError>
    where
        F: FnMut(&dyn SignatureSource) -> Result<Vec<String>, LoaderError>,
    {
        for source in &self.sources {
            match lookup(source.as_ref()) {
                Ok(sigs) if !sigs.is_empty() => return Ok(sigs),
                Ok(_) | Err(LoaderError::NotFound { .. }) => {
                    debug!("no signatures for {key}, advancing to next directory");
                }
                Err(err) => {
                    warn!("signature lookup for {key} aborted: {err}");
                    return Err(err);
                }
            }
        }
        Ok(Vec::new())
    }
}

impl SignatureSource for MultiSignatureSource {
    fn load_functions(&self, selector: &str) -> Result<Vec<String>, LoaderError> {
        self.first_non_empty(selector, |source| source.load_functions(selector))
    }

    fn load_events(&self, hash: &str) -> Result<Vec<String>, LoaderError> {
        self.first_non_empty(hash, |source| source.load_events(hash))
    }
}

// ============================================================================
// HTTP plumbing
// ============================================================================

/// Construct the blocking client every provider shares its settings
/// with.  Client construction only fails on catastrophic TLS backend
/// misconfiguration.
pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("failed to construct HTTP client")
}

/// Issue a GET and apply the shared status discipline: a 404 becomes
/// [`LoaderError::NotFound`], any other unsuccessful status becomes
/// [`LoaderError::Status`], and a successful body is returned as text
/// for the provider to decode.
pub(crate) fn get_text(
    client: &Client,
    provider: &'static str,
    address: &str,
    url: &str,
) -> Result<String, LoaderError> {
    let response = client.get(url).send().map_err(|source| LoaderError::Http {
        provider,
        address: address.to_string(),
        url: url.to_string(),
        source,
    })?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(LoaderError::NotFound {
            provider,
            address: address.to_string(),
        });
    }
    if !status.is_success() {
        return Err(LoaderError::Status {
            provider,
            address: address.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(|source| LoaderError::Http {
        provider,
        address: address.to_string(),
        url: url.to_string(),
        source,
    })
}

// ============================================================================
// Tests
// ============================================================================
