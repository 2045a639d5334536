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

/// Functionality for recovering an ABI sketch from a bytecode
/// sequence, including the extraction engine itself and its output
/// model.
pub mod abi;
/// Functionality related to raw bytecode sequences, namely opcode
/// constants and a step-aware decoding cursor.
pub mod bytecode;
/// Configuration recognized at the outer boundary, feeding the
/// loaders (never the core).
pub mod config;
/// Loaders which resolve contract metadata and human-readable
/// signatures from third-party services.
pub mod loader;
pub mod util;

pub use abi::{abi_from_bytecode, abi_from_hex, selectors_from_bytecode, AbiEntry, AbiExtractor};
pub use config::Config;
