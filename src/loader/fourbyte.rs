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

use crate::loader::{get_text, http_client, LoaderError, SignatureSource};

const PROVIDER: &str = "fourbyte";
const BASE_URL: &str = "https://www.4byte.directory/api/v1";

/// Signature directory backed by the 4Byte database.  Open
/// submission, so collisions are common; results are ordered oldest
/// first since later submissions against a popular selector tend to
/// be deliberate collisions.
pub struct FourByteSource {
    client: Client,
}

impl FourByteSource {
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }

    fn lookup(&self, endpoint: &str, key: &str) -> Result<Vec<String>, LoaderError> {
        let url = format!("{BASE_URL}/{endpoint}/?hex_signature={key}");
        let body = get_text(&self.client, PROVIDER, key, &url)?;
        let page: Page = serde_json::from_str(&body).map_err(|source| LoaderError::Decode {
            provider: PROVIDER,
            address: key.to_string(),
            url: url.to_string(),
            source,
        })?;
        let mut results = page.results;
        results.sort_by_key(|r| r.id);
        Ok(results.into_iter().map(|r| r.text_signature).collect())
    }
}

impl Default for FourByteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureSource for FourByteSource {
    fn load_functions(&self, selector: &str) -> Result<Vec<String>, LoaderError> {
        self.lookup("signatures", selector)
    }

    fn load_events(&self, hash: &str) -> Result<Vec<String>, LoaderError> {
        self.lookup("event-signatures", hash)
    }
}

/// One page of directory results.  An unknown selector is an empty
/// page, not an error.
#[derive(Default, Deserialize)]
#[serde(default)]
struct Page {
    results: Vec<SignatureRecord>,
}

#[derive(Deserialize)]
struct SignatureRecord {
    id: u64,
    text_signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_decoding_orders_oldest_first() {
        let body = r#"{
            "count": 2,
            "results": [
                {"id": 1007, "text_signature": "join_tg_invmru_haha(address,bool)", "hex_signature": "0xa9059cbb"},
                {"id": 145, "text_signature": "transfer(address,uint256)", "hex_signature": "0xa9059cbb"}
            ]
        }"#;
        let page: Page = serde_json::from_str(body).unwrap();
        let mut results = page.results;
        results.sort_by_key(|r| r.id);
        assert_eq!(results[0].text_signature, "transfer(address,uint256)");
    }

    #[test]
    fn test_empty_page_decodes() {
        let page: Page = serde_json::from_str(r#"{"count": 0, "results": []}"#).unwrap();
        assert!(page.results.is_empty());
    }
}
