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
use std::collections::BTreeMap;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::loader::{get_text, http_client, AbiSource, ContractRecord, LoaderError};

const PROVIDER: &str = "sourcify";
const BASE_URL: &str = "https://repo.sourcify.dev/contracts";

/// Metadata source backed by the Sourcify repository, which archives
/// the solc metadata document of every verified contract.  Misses are
/// plain HTTP 404s.
pub struct SourcifySource {
    chain_id: u64,
    client: Client,
}

impl SourcifySource {
    pub fn new(config: &Config) -> Self {
        Self {
            chain_id: config.sourcify_chain_id,
            client: http_client(),
        }
    }

    fn metadata_url(&self, match_kind: &str, address: &str) -> String {
        format!(
            "{BASE_URL}/{match_kind}/{}/{}/metadata.json",
            self.chain_id, address
        )
    }
}

impl AbiSource for SourcifySource {
    fn get_contract(&self, address: &str) -> Result<ContractRecord, LoaderError> {
        // Sourcify files exact-metadata matches separately from
        // bytecode-only matches; prefer the former.
        for match_kind in ["full_match", "partial_match"] {
            let url = self.metadata_url(match_kind, address);
            let body = match get_text(&self.client, PROVIDER, address, &url) {
                Ok(body) => body,
                Err(LoaderError::NotFound { .. }) => continue,
                Err(err) => return Err(err),
            };
            let metadata: Metadata =
                serde_json::from_str(&body).map_err(|e| LoaderError::Decode {
                    provider: PROVIDER,
                    address: address.to_string(),
                    url: url.to_string(),
                    source: e,
                })?;
            return Ok(record_from(metadata));
        }
        Ok(ContractRecord::not_found())
    }
}

/// The slice of the solc metadata document this loader cares about.
#[derive(Default, Deserialize)]
#[serde(default)]
struct Metadata {
    output: MetadataOutput,
    settings: MetadataSettings,
    compiler: MetadataCompiler,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct MetadataOutput {
    abi: Value,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MetadataSettings {
    evm_version: Option<String>,
    optimizer: Optimizer,
    /// Source path to contract name; solc emits exactly one pair.
    compilation_target: BTreeMap<String, String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Optimizer {
    runs: Option<u64>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct MetadataCompiler {
    version: Option<String>,
}

fn record_from(metadata: Metadata) -> ContractRecord {
    let name = metadata.settings.compilation_target.into_values().next();
    ContractRecord {
        abi: metadata.output.abi,
        name,
        evm_version: metadata.settings.evm_version,
        compiler_version: metadata.compiler.version,
        runs: metadata.settings.optimizer.runs,
        ok: true,
    }
}
