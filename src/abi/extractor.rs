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

use indexmap::IndexMap;
use log::debug;

use crate::abi::AbiEntry;
use crate::bytecode::opcode::{self, is_log, is_push};
use crate::bytecode::BytecodeCursor;
use crate::util::{FromHexString, HexError, ToHexString};

/// Number of prior instructions the dispatcher idiom reaches back
/// over, and hence the lookback the extractor's cursor needs.
const DISPATCH_WINDOW: usize = 4;

// ============================================================================
// Extractor
// ============================================================================

/// Recognizer for the code idioms solc emits around externally
/// visible behaviour.  Two idioms are matched, without executing
/// anything:
///
/// * The dispatcher prologue compares the leading four calldata bytes
///   against each function selector in turn,
///
///   ```txt
///   DUP1 PUSH4 <selector> EQ PUSHn <dest> JUMPI
///   ```
///
///   which yields the selector and its claimed jump destination.
///
/// * An event emission stages its 32-byte topic hash with a `PUSH32`
///   shortly before the `LOGn` which publishes it.
///
/// Payability falls out of a third observation: a non-payable function
/// begins with a value guard (`JUMPDEST CALLVALUE DUP1 ISZERO`) at its
/// dispatch destination, so any destination lacking that guard is
/// reported payable.
///
/// The scan is deliberately lenient.  Real contracts end in CBOR
/// auxdata which is not code at all, so nothing here fails on a
/// malformed or truncated stream; unrecognized regions simply
/// contribute no entries.
pub struct AbiExtractor<'a> {
    cursor: BytecodeCursor<'a>,
    /// Dispatch table discovered so far: selector to claimed jump
    /// destination.  Destinations are recorded as-is, without checking
    /// that they land on a JUMPDEST.
    jumps: IndexMap<String, usize>,
    /// Byte offsets observed as JUMPDEST, each with the step it was
    /// decoded at.
    dests: HashMap<usize, usize>,
    /// Subset of `dests` immediately followed by the non-payable
    /// guard.
    not_payable: HashMap<usize, usize>,
    /// Immediate of the most recent PUSH32; empty before the first.
    last_push32: &'a [u8],
    /// Entries emitted so far (events during the scan, functions at
    /// finalization).
    abi: Vec<AbiEntry>,
    /// When set, selectors whose destination was never observed as a
    /// JUMPDEST are dropped at finalization.
    strict: bool,
}

impl<'a> AbiExtractor<'a> {
    pub fn new(bytecode: &'a [u8]) -> Self {
        Self {
            cursor: BytecodeCursor::with_lookback(bytecode, DISPATCH_WINDOW),
            jumps: IndexMap::new(),
            dests: HashMap::new(),
            not_payable: HashMap::new(),
            last_push32: &[],
            abi: Vec::new(),
            strict: false,
        }
    }

    /// Drop selectors whose claimed destination was never observed as
    /// a JUMPDEST.  Off by default: the dispatcher idiom alone has
    /// proven reliable in practice, and a destination can sit beyond a
    /// region this scanner gave up on.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Scan the whole sequence and return the accumulated sketch.
    /// Events appear in the order their LOGs were encountered;
    /// functions follow, in the order their selectors were first
    /// dispatched.
    pub fn extract(mut self) -> Vec<AbiEntry> {
        while self.cursor.has_more() {
            let op = self.cursor.next();
            if op == opcode::PUSH32 {
                // Remember the immediate: if a LOG follows, this is
                // its topic hash.
                self.last_push32 = self.cursor.value();
            } else if is_log(op) && !self.last_push32.is_empty() {
                // NOTE: last_push32 is intentionally left in place, so
                // consecutive LOGs all report the same topic.
                self.abi.push(AbiEntry::Event {
                    hash: self.last_push32.to_hex_string(),
                });
            } else if op == opcode::JUMPDEST {
                self.record_jumpdest();
            } else if self.matches_dispatch() {
                self.record_dispatch();
            }
        }
        self.finalize()
    }

    /// Record a jump destination, noting whether it opens with the
    /// non-payable guard.
    fn record_jumpdest(&mut self) {
        let pos = self.cursor.pos();
        let step = self.cursor.step();
        self.dests.insert(pos, step);
        // None of CALLVALUE, DUP1 or ISZERO carry immediates, so the
        // guard can be matched by direct byte indexing.
        if self.cursor.at(pos as isize + 1) == opcode::CALLVALUE
            && self.cursor.at(pos as isize + 2) == opcode::DUP1
            && self.cursor.at(pos as isize + 3) == opcode::ISZERO
        {
            self.not_payable.insert(pos, step);
        }
    }

    /// Check whether the last four decoded instructions (current one
    /// included) form the tail of the dispatcher idiom.
    fn matches_dispatch(&self) -> bool {
        // A shorter prefix cannot contain the whole idiom.
        self.cursor.lookbehind() >= DISPATCH_WINDOW
            && self.cursor.at(-1) == opcode::JUMPI
            && is_push(self.cursor.at(-2))
            && self.cursor.at(-3) == opcode::EQ
            && is_push(self.cursor.at(-4))
    }

    /// Record the selector and destination of a matched dispatch.  A
    /// redispatched selector keeps its original table position but
    /// takes the newer destination.
    fn record_dispatch(&mut self) {
        let selector = selector_hex(self.cursor.value_at(-4));
        let dest = be_offset(self.cursor.value_at(-2));
        debug!("selector {selector} dispatches to {dest:#x}");
        self.jumps.insert(selector, dest);
    }

    /// Flush the dispatch table into function entries, resolving
    /// payability against the observed guards.
    fn finalize(self) -> Vec<AbiEntry> {
        let AbiExtractor {
            jumps,
            dests,
            not_payable,
            mut abi,
            strict,
            ..
        } = self;
        for (selector, dest) in jumps {
            if strict && !dests.contains_key(&dest) {
                debug!("selector {selector} dropped: {dest:#x} is not a JUMPDEST");
                continue;
            }
            abi.push(AbiEntry::Function {
                selector,
                payable: !not_payable.contains_key(&dest),
            });
        }
        abi
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Render a push immediate as a dispatch selector of exactly four
/// bytes.  The compiler trims leading zero bytes from the pushed
/// selector (a `PUSH3` for `0x00aabbcc`, say), so the immediate is
/// padded back out on the left.
fn selector_hex(value: &[u8]) -> String {
    let mut selector = [0u8; 4];
    let n = value.len().min(4);
    selector[4 - n..].copy_from_slice(&value[value.len() - n..]);
    selector.as_slice().to_hex_string()
}

/// Interpret a push immediate as a big-endian byte offset.
fn be_offset(value: &[u8]) -> usize {
    value.iter().fold(0, |acc, &b| (acc << 8) | b as usize)
}

// ============================================================================
// Entry points
// ============================================================================

/// Extract an ABI sketch from a raw bytecode sequence.
pub fn abi_from_bytecode(bytecode: &[u8]) -> Vec<AbiEntry> {
    AbiExtractor::new(bytecode).extract()
}

/// Extract an ABI sketch from a bytecode hex string, with or without
/// an `0x` prefix.
pub fn abi_from_hex(hex: &str) -> Result<Vec<AbiEntry>, HexError> {
    let bytes = hex.from_hex_string()?;
    Ok(abi_from_bytecode(&bytes))
}

/// Extract just the dispatch selectors from a raw bytecode sequence,
/// in dispatch-table order.  Useful when all that is wanted is a set
/// of keys to resolve against a signature directory.
pub fn selectors_from_bytecode(bytecode: &[u8]) -> Vec<String> {
    abi_from_bytecode(bytecode)
        .into_iter()
        .filter_map(|entry| match entry {
            AbiEntry::Function { selector, .. } => Some(selector),
            AbiEntry::Event { .. } => None,
        })
        .collect()
}
