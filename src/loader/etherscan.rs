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
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::loader::{get_text, http_client, AbiSource, ContractRecord, LoaderError};

const PROVIDER: &str = "etherscan";

/// Metadata source backed by the Etherscan contract API.  Etherscan
/// reports misses in-band (a zero status, or a placeholder where the
/// ABI should be) rather than through HTTP status codes.
pub struct EtherscanSource {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl EtherscanSource {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.etherscan_base_url.clone(),
            api_key: config.etherscan_api_key.clone(),
            client: http_client(),
        }
    }

    fn lookup_url(&self, address: &str) -> String {
        let mut url = format!(
            "{}/api?module=contract&action=getsourcecode&address={}",
            self.base_url, address
        );
        if let Some(key) = &self.api_key {
            url.push_str("&apikey=");
            url.push_str(key);
        }
        url
    }
}

impl AbiSource for EtherscanSource {
    fn get_contract(&self, address: &str) -> Result<ContractRecord, LoaderError> {
        let url = self.lookup_url(address);
        let body = get_text(&self.client, PROVIDER, address, &url)?;
        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|e| decode_err(address, &url, e))?;
        if envelope.status != "1" {
            return Ok(ContractRecord::not_found());
        }
        let records: Vec<SourceRecord> =
            serde_json::from_value(envelope.result).map_err(|e| decode_err(address, &url, e))?;
        let record = match records.into_iter().next() {
            Some(record) => record,
            None => return Ok(ContractRecord::not_found()),
        };
        // An unverified contract still answers with status 1, putting
        // a prose apology in the ABI field.
        if !record.abi.starts_with('[') {
            return Ok(ContractRecord::not_found());
        }
        let abi: Value =
            serde_json::from_str(&record.abi).map_err(|e| decode_err(address, &url, e))?;
        Ok(ContractRecord {
            abi,
            name: none_if_empty(record.contract_name),
            evm_version: none_if_empty(record.evm_version),
            compiler_version: none_if_empty(record.compiler_version),
            runs: record.runs.parse().ok(),
            ok: true,
        })
    }
}

/// Response envelope of the Etherscan API.  The `result` stays
/// untyped here since error responses put a bare string in it.
#[derive(Deserialize)]
struct Envelope {
    status: String,
    result: Value,
}

/// One element of a `getsourcecode` result.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SourceRecord {
    #[serde(rename = "ABI")]
    abi: String,
    contract_name: String,
    compiler_version: String,
    #[serde(rename = "EVMVersion")]
    evm_version: String,
    runs: String,
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn decode_err(address: &str, url: &str, source: serde_json::Error) -> LoaderError {
    LoaderError::Decode {
        provider: PROVIDER,
        address: address.to_string(),
        url: url.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url_without_key() {
        let source = EtherscanSource::new(&Config::default());
        let url = source.lookup_url("0xdead");
        assert_eq!(
            url,
            "https://api.etherscan.io/api?module=contract&action=getsourcecode&address=0xdead"
        );
    }

    #[test]
    fn test_lookup_url_with_key() {
        let config = Config {
            etherscan_api_key: Some("KEY".to_string()),
            ..Config::default()
        };
        let source = EtherscanSource::new(&config);
        assert!(source.lookup_url("0xdead").ends_with("&apikey=KEY"));
    }

    #[test]
    fn test_unverified_record_decodes_to_not_found() {
        let record = SourceRecord {
            abi: "Contract source code not verified".to_string(),
            ..SourceRecord::default()
        };
        assert!(!record.abi.starts_with('['));
    }
}
