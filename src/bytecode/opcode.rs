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

//! Named constants for the opcodes the scanner cares about, along with
//! the handful of predicates it needs over them.  This is not a full
//! opcode table: anything the idiom matcher never inspects is simply an
//! unnamed byte to it.

// 0s: Stop and Arithmetic Operations
pub const STOP: u8 = 0x00;
// 10s: Comparison & Bitwise Logic Operations
pub const EQ: u8 = 0x14;
pub const ISZERO: u8 = 0x15;
// 30s: Environment Information
pub const CALLVALUE: u8 = 0x34;
// 50s: Stack, Memory, Storage and Flow Operations
pub const JUMPI: u8 = 0x57;
pub const JUMPDEST: u8 = 0x5b;
// 60s & 70s: Push Operations
pub const PUSH1: u8 = 0x60;
pub const PUSH4: u8 = 0x63;
pub const PUSH32: u8 = 0x7f;
// 80s: Duplication Operations
pub const DUP1: u8 = 0x80;
// a0s: Logging Operations
pub const LOG1: u8 = 0xa1;
pub const LOG4: u8 = 0xa4;

/// Check whether a given opcode is in the `PUSH1..PUSH32` family.
pub fn is_push(op: u8) -> bool {
    (PUSH1..=PUSH32).contains(&op)
}

/// Check whether a given opcode is in the `LOG1..LOG4` family.
pub fn is_log(op: u8) -> bool {
    (LOG1..=LOG4).contains(&op)
}

/// Determine the width (in bytes) of the immediate operand carried by
/// a given opcode.  A `PUSHn` instruction embeds `n` inline operand
/// bytes; every other opcode embeds none.
pub fn push_width(op: u8) -> usize {
    if is_push(op) {
        (op - PUSH1 + 1) as usize
    } else {
        0
    }
}
