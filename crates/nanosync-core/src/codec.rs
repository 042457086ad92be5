//! Bit-packing used by the device for SysEx payloads.
//!
//! MIDI data bytes are 7 bits wide, so the device ships every 7 natural
//! bytes as 8 wire bytes. The first byte of each wire group collects the
//! high bits: bit `n` holds bit 7 of natural byte `n`. The remaining seven
//! wire bytes carry the low 7 bits of each natural byte.
//!
//! ```text
//! wire:    [h6..h0] [b0 & 7f] [b1 & 7f] ... [b6 & 7f]
//! natural: [b0] [b1] ... [b6]
//! ```

/// Natural bytes per packed group.
pub const NATURAL_GROUP: usize = 7;
/// Wire bytes per packed group.
pub const WIRE_GROUP: usize = 8;

/// Unpack wire bytes into natural bytes.
///
/// A trailing partial group yields one byte per payload byte present; missing
/// payload is never synthesized.
#[must_use]
pub fn decode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() / WIRE_GROUP * NATURAL_GROUP + NATURAL_GROUP);

    for group in bytes.chunks(WIRE_GROUP) {
        let carrier = group[0];
        for (bit, &payload) in group[1..].iter().enumerate() {
            out.push(payload | (((carrier >> bit) & 1) << 7));
        }
    }

    out
}

/// Pack natural bytes into 7-bit clean wire bytes.
///
/// The output length is always a multiple of [`WIRE_GROUP`]; the last group
/// is zero-filled when the input is not a multiple of [`NATURAL_GROUP`].
#[must_use]
pub fn encode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len().div_ceil(NATURAL_GROUP) * WIRE_GROUP);

    for group in bytes.chunks(NATURAL_GROUP) {
        let mut packed = [0u8; WIRE_GROUP];
        for (bit, &natural) in group.iter().enumerate() {
            packed[bit + 1] = natural & 0x7f;
            packed[0] |= (natural >> 7) << bit;
        }
        out.extend_from_slice(&packed);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_restores_high_bits() {
        // Carrier marks bytes 0 and 6 as having the high bit set.
        let wire = [0b0100_0001, 0x7f, 0x01, 0x02, 0x03, 0x04, 0x05, 0x10];
        assert_eq!(decode(&wire), vec![0xff, 0x01, 0x02, 0x03, 0x04, 0x05, 0x90]);
    }

    #[test]
    fn test_encode_moves_high_bits_to_carrier() {
        let natural = [0x80, 0x00, 0xff, 0x7f, 0x00, 0x00, 0x81];
        assert_eq!(
            encode(&natural),
            vec![0b0100_0101, 0x00, 0x00, 0x7f, 0x7f, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn test_encode_pads_partial_group() {
        let packed = encode(&[0xaa, 0x55]);
        assert_eq!(packed, vec![0b01, 0x2a, 0x55, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_partial_group_does_not_pad() {
        // Carrier plus three payload bytes.
        let wire = [0b010, 0x01, 0x02, 0x03];
        assert_eq!(decode(&wire), vec![0x01, 0x82, 0x03]);
    }

    #[test]
    fn test_decode_lone_carrier_yields_nothing() {
        assert!(decode(&[0x7f]).is_empty());
        let mut wire = encode(&[1, 2, 3, 4, 5, 6, 7]);
        wire.push(0x7f);
        assert_eq!(decode(&wire), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_empty_input() {
        assert!(encode(&[]).is_empty());
        assert!(decode(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_encoded_length_is_whole_groups(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let packed = encode(&data);
            prop_assert_eq!(packed.len() % WIRE_GROUP, 0);
            prop_assert!(packed.iter().all(|b| b & 0x80 == 0));
        }

        #[test]
        fn prop_round_trip_whole_groups(groups in proptest::collection::vec(any::<[u8; 7]>(), 1..48)) {
            let data: Vec<u8> = groups.concat();
            prop_assert_eq!(decode(&encode(&data)), data);
        }

        #[test]
        fn prop_round_trip_keeps_prefix(data in proptest::collection::vec(any::<u8>(), 1..256)) {
            let restored = decode(&encode(&data));
            prop_assert_eq!(restored.len(), data.len().div_ceil(NATURAL_GROUP) * NATURAL_GROUP);
            prop_assert_eq!(&restored[..data.len()], &data[..]);
            prop_assert!(restored[data.len()..].iter().all(|&b| b == 0));
        }

        #[test]
        fn prop_decode_length_counts_payload(wire in proptest::collection::vec(0u8..0x80, 0..256)) {
            let whole = wire.len() / WIRE_GROUP * NATURAL_GROUP;
            let partial = (wire.len() % WIRE_GROUP).saturating_sub(1);
            prop_assert_eq!(decode(&wire).len(), whole + partial);
        }
    }
}
