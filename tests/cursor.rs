use abisketch::bytecode::opcode::{self, is_log, is_push, push_width};
use abisketch::bytecode::BytecodeCursor;
use abisketch::util::{FromHexString, HexError};

// ============================================================================
// Opcode predicates
// ============================================================================

#[test]
fn test_push_predicates_01() {
    assert!(!is_push(0x5f));
    assert!(is_push(opcode::PUSH1));
    assert!(is_push(opcode::PUSH4));
    assert!(is_push(opcode::PUSH32));
    assert!(!is_push(opcode::DUP1));
}

#[test]
fn test_push_width_01() {
    assert_eq!(push_width(opcode::PUSH1), 1);
    assert_eq!(push_width(opcode::PUSH4), 4);
    assert_eq!(push_width(opcode::PUSH32), 32);
    // Non-push opcodes carry no immediate.
    assert_eq!(push_width(opcode::STOP), 0);
    assert_eq!(push_width(opcode::JUMPI), 0);
    assert_eq!(push_width(0xff), 0);
}

#[test]
fn test_log_predicates_01() {
    // LOG0 carries no topic, so it sits outside the family.
    assert!(!is_log(0xa0));
    assert!(is_log(opcode::LOG1));
    assert!(is_log(0xa2));
    assert!(is_log(opcode::LOG4));
    assert!(!is_log(0xa5));
}

// ============================================================================
// Stepping
// ============================================================================

#[test]
fn test_step_position_duality_01() {
    // PUSH1 0x80, PUSH2 0x0060, STOP
    let bytes = "608061006000".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::new(&bytes);
    //
    assert_eq!(cursor.next(), opcode::PUSH1);
    assert_eq!(cursor.pos(), 0);
    assert_eq!(cursor.step(), 0);
    //
    assert_eq!(cursor.next(), 0x61);
    assert_eq!(cursor.pos(), 2);
    assert_eq!(cursor.step(), 1);
    //
    assert_eq!(cursor.next(), opcode::STOP);
    assert_eq!(cursor.pos(), 5);
    assert_eq!(cursor.step(), 2);
    //
    assert!(!cursor.has_more());
}

#[test]
fn test_step_position_duality_02() {
    // Positions must equal the running sum of 1 + push_width over
    // every decoded instruction, whatever the mix of widths.
    let bytes = "60016101025b630000000300".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::new(&bytes);
    let mut expected_pos = 0;
    let mut expected_step = 0;
    while cursor.has_more() {
        let op = cursor.next();
        assert_eq!(cursor.pos(), expected_pos);
        assert_eq!(cursor.step(), expected_step);
        expected_pos += 1 + push_width(op);
        expected_step += 1;
    }
    assert_eq!(expected_pos, bytes.len());
}

#[test]
fn test_exhausted_returns_stop_01() {
    let bytes: Vec<u8> = Vec::new();
    let mut cursor = BytecodeCursor::new(&bytes);
    assert!(!cursor.has_more());
    // Draining an exhausted cursor saturates rather than failing.
    assert_eq!(cursor.next(), opcode::STOP);
    assert_eq!(cursor.next(), opcode::STOP);
}

#[test]
fn test_truncated_push_tolerated_01() {
    // A PUSH1 with no operand byte: decoding advances past the end.
    let bytes = "60".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::new(&bytes);
    assert!(cursor.has_more());
    assert_eq!(cursor.next(), opcode::PUSH1);
    assert_eq!(cursor.value(), &[] as &[u8]);
    assert!(!cursor.has_more());
}

#[test]
fn test_truncated_push_short_slice_01() {
    // A PUSH4 with only two operand bytes present.
    let bytes = "63aabb".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::new(&bytes);
    assert_eq!(cursor.next(), opcode::PUSH4);
    assert_eq!(cursor.value(), &[0xaa, 0xbb]);
}

// ============================================================================
// Ring lookback
// ============================================================================

#[test]
fn test_ring_lookback_01() {
    // PUSH2, STOP, PUSH1, JUMPDEST: widths differ, so step-relative
    // lookups cannot be byte-relative.
    let bytes = "61aabb0060cc5b".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::with_lookback(&bytes, 4);
    for _ in 0..4 {
        cursor.next();
    }
    assert_eq!(cursor.lookbehind(), 4);
    assert_eq!(cursor.at(-1), opcode::JUMPDEST);
    assert_eq!(cursor.at(-2), opcode::PUSH1);
    assert_eq!(cursor.at(-3), opcode::STOP);
    assert_eq!(cursor.at(-4), 0x61);
}

#[test]
fn test_ring_eviction_01() {
    // Default lookback retains a single instruction.
    let bytes = "600160026003".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::new(&bytes);
    cursor.next();
    cursor.next();
    assert_eq!(cursor.lookbehind(), 1);
    assert_eq!(cursor.at(-1), opcode::PUSH1);
    // Beyond the retained window the read saturates.
    assert_eq!(cursor.at(-2), opcode::STOP);
}

#[test]
fn test_ring_partial_fill_01() {
    let bytes = "5b5b".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::with_lookback(&bytes, 4);
    cursor.next();
    assert_eq!(cursor.lookbehind(), 1);
    assert_eq!(cursor.at(-1), opcode::JUMPDEST);
    assert_eq!(cursor.at(-2), opcode::STOP);
    cursor.next();
    assert_eq!(cursor.lookbehind(), 2);
}

#[test]
fn test_absolute_reads_01() {
    let bytes = "5b348015".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::new(&bytes);
    cursor.next();
    assert_eq!(cursor.at(0), opcode::JUMPDEST);
    assert_eq!(cursor.at(1), opcode::CALLVALUE);
    assert_eq!(cursor.at(2), opcode::DUP1);
    assert_eq!(cursor.at(3), opcode::ISZERO);
    // Past the end of the buffer the read saturates.
    assert_eq!(cursor.at(4), opcode::STOP);
    assert_eq!(cursor.at(1000), opcode::STOP);
}

// ============================================================================
// Immediate values
// ============================================================================

#[test]
fn test_value_widths_01() {
    let bytes = "60aa61bbcc6301020304".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::new(&bytes);
    cursor.next();
    assert_eq!(cursor.value(), &[0xaa]);
    cursor.next();
    assert_eq!(cursor.value(), &[0xbb, 0xcc]);
    cursor.next();
    assert_eq!(cursor.value(), &[0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn test_value_non_push_is_empty_01() {
    let bytes = "5b00".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::new(&bytes);
    cursor.next();
    assert_eq!(cursor.value(), &[] as &[u8]);
}

#[test]
fn test_value_at_negative_01() {
    // PUSH4 <sel> EQ PUSH1 <dest> JUMPI: the dispatch shape the
    // extractor reaches back over.
    let bytes = "632e64cec114603757".from_hex_string().unwrap();
    let mut cursor = BytecodeCursor::with_lookback(&bytes, 4);
    for _ in 0..4 {
        cursor.next();
    }
    assert_eq!(cursor.value_at(-4), &[0x2e, 0x64, 0xce, 0xc1]);
    assert_eq!(cursor.value_at(-3), &[] as &[u8]);
    assert_eq!(cursor.value_at(-2), &[0x37]);
    // Beyond the retained window.
    assert_eq!(cursor.value_at(-5), &[] as &[u8]);
}

// ============================================================================
// Hex parsing
// ============================================================================

#[test]
fn test_hex_parsing_01() {
    assert_eq!("0x".from_hex_string().unwrap(), Vec::<u8>::new());
    assert_eq!("".from_hex_string().unwrap(), Vec::<u8>::new());
    assert_eq!("0x6001".from_hex_string().unwrap(), vec![0x60, 0x01]);
    assert_eq!("6001".from_hex_string().unwrap(), vec![0x60, 0x01]);
    assert_eq!("0xAaBb".from_hex_string().unwrap(), vec![0xaa, 0xbb]);
}

#[test]
fn test_hex_odd_length_01() {
    assert!(matches!(
        "0x123".from_hex_string(),
        Err(HexError::OddLength(3))
    ));
    assert!(matches!("1".from_hex_string(), Err(HexError::OddLength(1))));
}

#[test]
fn test_hex_invalid_digit_01() {
    assert!(matches!(
        "0x12g4".from_hex_string(),
        Err(HexError::InvalidDigit('g', 2))
    ));
}
