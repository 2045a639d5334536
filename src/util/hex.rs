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
use std::fmt;
use std::fmt::Write;

// ============================================================================
// Hex Error
// ============================================================================

/// An error which arises when parsing a hexadecimal string into a byte
/// sequence.  In essence, this indicates the string is not a rendering
/// of whole bytes.
pub enum HexError {
    /// Indicates an odd number of digits remained after any `0x`
    /// prefix was removed.
    OddLength(usize),
    /// Indicates a character which is not a hexadecimal digit, along
    /// with its offset amongst the digits.
    InvalidDigit(char, usize),
}

impl fmt::Debug for HexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HexError::OddLength(n) => write!(f, "odd number of hex digits ({n})"),
            HexError::InvalidDigit(c, i) => write!(f, "invalid hex digit {c:?} at offset {i}"),
        }
    }
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Just reuse debug formatting.
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for HexError {}

// ============================================================================
// Conversion Traits
// ============================================================================

/// A simple trait allowing something to be converted into a hex
/// string.
pub trait ToHexString {
    fn to_hex_string(&self) -> String;
}

/// A simple trait allowing something to be converted from a hex
/// string.
pub trait FromHexString {
    fn from_hex_string(&self) -> Result<Vec<u8>, HexError>;
}

/// A default implementation for byte slices.
impl ToHexString for [u8] {
    fn to_hex_string(&self) -> String {
        let size = 2 + (2 * self.len());
        let mut hexstr = String::with_capacity(size);
        // Prepend "0x"
        write!(hexstr, "0x").unwrap();
        // Write each byte
        for b in self {
            write!(hexstr, "{:02x}", b).unwrap();
        }
        // Done
        hexstr
    }
}

/// A default implementation for string slices
impl FromHexString for str {
    fn from_hex_string(&self) -> Result<Vec<u8>, HexError> {
        // Remove prepended "0x" (only if present)
        let digits = self.strip_prefix("0x").unwrap_or(self).as_bytes();
        // Only whole bytes can be represented.
        if (digits.len() % 2) != 0 {
            return Err(HexError::OddLength(digits.len()));
        }
        let mut bytes = Vec::with_capacity(digits.len() / 2);
        // parse contents
        for i in (0..digits.len()).step_by(2) {
            let hi = decode_digit(digits, i)?;
            let lo = decode_digit(digits, i + 1)?;
            bytes.push((hi << 4) | lo);
        }
        //
        Ok(bytes)
    }
}

/// Decode a single hex digit at a given offset within a digit
/// sequence.
fn decode_digit(digits: &[u8], i: usize) -> Result<u8, HexError> {
    match digits[i] {
        d @ b'0'..=b'9' => Ok(d - b'0'),
        d @ b'a'..=b'f' => Ok(10 + d - b'a'),
        d @ b'A'..=b'F' => Ok(10 + d - b'A'),
        d => Err(HexError::InvalidDigit(d as char, i)),
    }
}
