use super::*;

#[test]
fn bytes_expand_msb_first() {
    let seq = BitSequence::from_bytes(vec![0b1010_0001]);
    let bits: Vec<bool> = seq.iter().collect();
    assert_eq!(
        bits,
        vec![true, false, true, false, false, false, false, true]
    );
    assert_eq!(seq.len(), 8);
    assert_eq!(seq.get(0), Some(true));
    assert_eq!(seq.get(7), Some(true));
    assert_eq!(seq.get(8), None);
}

#[test]
fn pushed_bits_pack_into_bytes() {
    let mut seq = BitSequence::new();
    for bit in [false, false, false, false, false, false, false, true] {
        seq.push(bit);
    }
    for _ in 0..8 {
        seq.push(true);
    }
    assert_eq!(seq.into_bytes().unwrap(), vec![0x01, 0xFF]);
}

#[test]
fn partial_byte_is_a_truncated_stream() {
    let seq: BitSequence = [true, false, true].into_iter().collect();
    assert_eq!(seq.len(), 3);
    match seq.into_bytes() {
        Err(BitreelError::TruncatedStream { bits }) => assert_eq!(bits, 3),
        other => panic!("expected TruncatedStream, got {other:?}"),
    }
}

#[test]
fn empty_sequence_packs_to_no_bytes() {
    let seq = BitSequence::new();
    assert!(seq.is_empty());
    assert!(seq.into_bytes().unwrap().is_empty());
}

#[test]
fn extend_continues_a_partial_byte() {
    let mut seq: BitSequence = [true, false, true].into_iter().collect();
    seq.extend([false, false, false, false, true, true]);
    assert_eq!(seq.len(), 9);
    assert_eq!(seq.get(8), Some(true));
    seq.extend(std::iter::repeat_n(false, 7));
    assert_eq!(seq.into_bytes().unwrap(), vec![0b1010_0001, 0b1000_0000]);
}
