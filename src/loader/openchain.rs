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
use std::collections::HashMap;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::loader::{get_text, http_client, LoaderError, SignatureSource};

const PROVIDER: &str = "openchain";
const BASE_URL: &str = "https://api.openchain.xyz/signature-database/v1/lookup";

/// Signature directory backed by the OpenChain database (formerly
/// samczsun's signature collection).  Curated, so `filter=true` keeps
/// known junk submissions out of the results.
pub struct OpenChainSource {
    client: Client,
}

impl OpenChainSource {
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }

    fn lookup(&self, kind: &'static str, key: &str) -> Result<Vec<String>, LoaderError> {
        let url = format!("{BASE_URL}?{kind}={key}&filter=true");
        let body = get_text(&self.client, PROVIDER, key, &url)?;
        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|source| LoaderError::Decode {
                provider: PROVIDER,
                address: key.to_string(),
                url: url.to_string(),
                source,
            })?;
        if !envelope.ok {
            return Ok(Vec::new());
        }
        let table = match kind {
            "function" => envelope.result.function,
            _ => envelope.result.event,
        };
        // The response table is keyed by the queried selector; an
        // unknown selector maps to null.
        let sigs = table
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v)
            .unwrap_or_default();
        Ok(sigs.into_iter().map(|s| s.name).collect())
    }
}

impl Default for OpenChainSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureSource for OpenChainSource {
    fn load_functions(&self, selector: &str) -> Result<Vec<String>, LoaderError> {
        self.lookup("function", selector)
    }

    fn load_events(&self, hash: &str) -> Result<Vec<String>, LoaderError> {
        self.lookup("event", hash)
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Envelope {
    ok: bool,
    result: LookupResult,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LookupResult {
    function: HashMap<String, Option<Vec<Signature>>>,
    event: HashMap<String, Option<Vec<Signature>>>,
}

#[derive(Deserialize)]
struct Signature {
    name: String,
}
