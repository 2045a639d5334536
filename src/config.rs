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
use std::env;

/// Options recognized at the outer boundary when constructing
/// loaders.  The extraction core never reads configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// API key passed through to Etherscan, if any.  Anonymous access
    /// works, with aggressive rate limits.
    pub etherscan_api_key: Option<String>,
    /// Base URL of the Etherscan-compatible API.
    pub etherscan_base_url: String,
    /// Chain the Sourcify repository is queried for.
    pub sourcify_chain_id: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            etherscan_api_key: None,
            etherscan_base_url: "https://api.etherscan.io".to_string(),
            sourcify_chain_id: 1,
        }
    }
}

impl Config {
    /// Read configuration from the environment (`ETHERSCAN_API_KEY`,
    /// `ETHERSCAN_BASE_URL`, `SOURCIFY_CHAIN_ID`), falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            etherscan_api_key: env::var("ETHERSCAN_API_KEY").ok(),
            etherscan_base_url: env::var("ETHERSCAN_BASE_URL")
                .unwrap_or(defaults.etherscan_base_url),
            sourcify_chain_id: env::var("SOURCIFY_CHAIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sourcify_chain_id),
        }
    }
}
