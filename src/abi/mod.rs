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
use serde::{Deserialize, Serialize};

mod extractor;

pub use extractor::*;

/// A single entry within an ABI sketch recovered from bytecode.  This
/// is deliberately much weaker than a full ABI: argument types and
/// names cannot be recovered without source, so a function is known
/// only by its dispatch selector and an event only by its topic hash.
/// The serialized form is tagged the way ABI tooling expects, e.g.
/// `{"type":"function","selector":"0x2e64cec1","payable":true}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiEntry {
    /// An externally callable function, discovered through the
    /// dispatcher prologue.
    Function {
        /// Dispatch selector, rendered as an `0x`-prefixed lowercase
        /// hex string of exactly four bytes.
        selector: String,
        /// Whether the dispatch target lacks the compiler's
        /// non-payable guard.
        payable: bool,
    },
    /// An event, discovered through a `LOGn` whose topic was staged by
    /// a preceding `PUSH32`.
    Event {
        /// Topic hash of the event signature, rendered as an
        /// `0x`-prefixed lowercase hex string of exactly 32 bytes.
        hash: String,
    },
}
