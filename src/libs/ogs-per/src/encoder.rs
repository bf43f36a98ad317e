//! Fragment composer
//!
//! `AperEncoder` lays encoded fragments out in schema order: bit-fields are
//! packed back to back, octet-aligned parts start on the next octet
//! boundary.

use bitvec::prelude::*;
use bytes::Bytes;

use crate::bit_field::BitField;
use crate::constraint::{Constraint, LengthBound, Size, SizeConstraint};
use crate::encode::{
    enc_choice, enc_enumerated, enc_integer, enc_length_determinant, enc_sequence,
    enc_sequence_of,
};
use crate::error::PerResult;
use crate::string::{
    enc_bit_string, enc_octet_string, OctetStringEncoding, MAX_BIT_FIELD_BITS, MAX_BIT_FIELD_OCTETS,
};

/// Smallest range whose whole numbers occupy whole octets
const OCTET_RANGE: u128 = 256;

/// APER (Aligned PER) output buffer
#[derive(Debug, Clone, Default)]
pub struct AperEncoder {
    buffer: BitVec<u8, Msb0>,
}

impl AperEncoder {
    pub fn new() -> Self {
        Self {
            buffer: BitVec::new(),
        }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            buffer: BitVec::with_capacity(bits),
        }
    }

    /// Get the encoded bytes, padded to a whole octet
    pub fn into_bytes(mut self) -> Bytes {
        self.align();
        Bytes::from(self.buffer.into_vec())
    }

    /// Get current bit position
    pub fn bit_position(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_aligned(&self) -> bool {
        self.buffer.len() % 8 == 0
    }

    /// Align to octet boundary
    pub fn align(&mut self) {
        let remainder = self.buffer.len() % 8;
        if remainder != 0 {
            let padded = self.buffer.len() + 8 - remainder;
            self.buffer.resize(padded, false);
        }
    }

    /// Append a bit-field right after the previous one
    pub fn push_field(&mut self, field: &BitField) {
        self.buffer.extend_from_bitslice(field.as_bitslice());
    }

    /// Append a field that starts on an octet boundary
    pub fn push_aligned_field(&mut self, field: &BitField) {
        self.align();
        self.push_field(field);
    }

    /// Append whole octets, octet-aligned
    pub fn push_octets(&mut self, octets: &[u8]) {
        self.align();
        self.buffer
            .extend_from_bitslice(BitSlice::<u8, Msb0>::from_slice(octets));
    }

    /// Append an encoded BIT STRING; fixed sizes above 16 bits are aligned
    pub fn push_bit_string(&mut self, field: &BitField, size: &SizeConstraint) {
        match size.size {
            Size::Fixed(bits) if bits > MAX_BIT_FIELD_BITS => self.push_aligned_field(field),
            _ => self.push_field(field),
        }
    }

    /// Append an encoded OCTET STRING: prefix bits, then the payload.
    ///
    /// Fixed sizes of one or two octets stay in the bit-field; every other
    /// payload starts on an octet boundary.
    pub fn push_octet_string(&mut self, encoded: &OctetStringEncoding, size: &SizeConstraint) {
        self.push_field(&encoded.prefix);
        if encoded.payload.is_empty() {
            return;
        }
        match size.size {
            Size::Fixed(octets) if octets <= MAX_BIT_FIELD_OCTETS => {
                self.push_field(&BitField::from_octets(encoded.payload.to_vec()))
            }
            _ => self.push_octets(&encoded.payload),
        }
    }

    /// Append an open type value: general length determinant, then the
    /// value octets
    pub fn push_open_type(&mut self, value: &[u8]) -> PerResult<()> {
        let length = enc_length_determinant(value.len(), LengthBound::Unbounded)?;
        self.push_aligned_field(&length);
        self.push_octets(value);
        Ok(())
    }

    /// Encode `value` into its own buffer and append it as an open type
    pub fn push_open_value<T: AperEncode + ?Sized>(&mut self, value: &T) -> PerResult<()> {
        let mut inner = AperEncoder::new();
        value.encode_aper(&mut inner)?;
        self.push_open_type(&inner.into_bytes())
    }

    /// Append a constrained whole number; one and two octet encodings
    /// (range of 256 and above) start on an octet boundary
    pub fn push_whole_number(&mut self, field: &BitField, constraint: &Constraint) {
        if constraint.range() >= OCTET_RANGE {
            self.push_aligned_field(field);
        } else {
            self.push_field(field);
        }
    }

    pub fn encode_integer(&mut self, value: i64, constraint: &Constraint) -> PerResult<()> {
        let field = enc_integer(value, constraint)?;
        self.push_whole_number(&field, constraint);
        Ok(())
    }

    pub fn encode_enumerated(&mut self, value: i64, constraint: &Constraint) -> PerResult<()> {
        let field = enc_enumerated(value, constraint)?;
        self.push_whole_number(&field, constraint);
        Ok(())
    }

    pub fn encode_choice_index(&mut self, index: i64, constraint: &Constraint) -> PerResult<()> {
        let field = enc_choice(index, constraint)?;
        self.push_whole_number(&field, constraint);
        Ok(())
    }

    /// Encode the element count of a SEQUENCE OF
    pub fn encode_sequence_of(&mut self, count: usize, constraint: &Constraint) -> PerResult<()> {
        let field = enc_sequence_of(count as i64, constraint)?;
        self.push_whole_number(&field, constraint);
        Ok(())
    }

    /// Encode a SEQUENCE preamble (extension bit and presence bitmap)
    pub fn encode_sequence_preamble(
        &mut self,
        extensible: bool,
        optional_count: usize,
        presence: u8,
    ) -> PerResult<()> {
        let field = enc_sequence(extensible, optional_count, presence)?;
        self.push_field(&field);
        Ok(())
    }

    pub fn encode_bit_string(
        &mut self,
        bits: &[u8],
        bit_len: usize,
        size: &SizeConstraint,
    ) -> PerResult<()> {
        let field = enc_bit_string(bits, bit_len, size)?;
        self.push_bit_string(&field, size);
        Ok(())
    }

    pub fn encode_octet_string(&mut self, octets: &[u8], size: &SizeConstraint) -> PerResult<()> {
        let encoded = enc_octet_string(octets.to_vec(), size)?;
        self.push_octet_string(&encoded, size);
        Ok(())
    }
}

/// Trait for types that can be encoded with APER
pub trait AperEncode {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_fields() {
        let mut encoder = AperEncoder::new();
        encoder.push_field(&enc_choice(0, &Constraint::extensible(0, 2)).unwrap());
        assert_eq!(encoder.bit_position(), 3);
        encoder.push_aligned_field(&enc_integer(21, &Constraint::new(0, 255)).unwrap());
        assert_eq!(encoder.bit_position(), 16);
        encoder.push_field(&enc_enumerated(0, &Constraint::new(0, 2)).unwrap());
        assert!(!encoder.is_aligned());
        assert_eq!(&encoder.into_bytes()[..], &[0x00, 0x15, 0x00]);
    }

    #[test]
    fn test_push_octet_string() {
        let mut encoder = AperEncoder::new();
        let size = SizeConstraint::range(0, 7).with_extension();
        let encoded = enc_octet_string(vec![0xAA, 0xBB, 0xCC], &size).unwrap();
        encoder.push_octet_string(&encoded, &size);
        // 0 0011 xxx | AA BB CC
        assert_eq!(&encoder.into_bytes()[..], &[0x18, 0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_push_bit_string_alignment() {
        let size = SizeConstraint::fixed(24);
        let field = enc_bit_string(&[0x01, 0x02, 0x03], 24, &size).unwrap();
        let mut encoder = AperEncoder::new();
        encoder.push_field(&BitField::from_left_aligned(vec![0x80], 1).unwrap());
        encoder.push_bit_string(&field, &size);
        assert_eq!(&encoder.into_bytes()[..], &[0x80, 0x01, 0x02, 0x03]);

        let size = SizeConstraint::fixed(4);
        let field = enc_bit_string(&[0x0F], 4, &size).unwrap();
        let mut encoder = AperEncoder::new();
        encoder.push_field(&BitField::from_left_aligned(vec![0x80], 1).unwrap());
        encoder.push_bit_string(&field, &size);
        assert_eq!(&encoder.into_bytes()[..], &[0xF8]);
    }

    #[test]
    fn test_short_fixed_octet_string_is_unaligned() {
        let mut encoder = AperEncoder::new();
        encoder.encode_sequence_preamble(false, 1, 1).unwrap();
        encoder
            .encode_octet_string(&[0xAB], &SizeConstraint::fixed(1))
            .unwrap();
        assert_eq!(encoder.bit_position(), 9);
        assert_eq!(&encoder.into_bytes()[..], &[0xD5, 0x80]);

        let mut encoder = AperEncoder::new();
        encoder.encode_sequence_preamble(false, 1, 1).unwrap();
        encoder
            .encode_octet_string(&[0xAB, 0xCD], &SizeConstraint::fixed(2))
            .unwrap();
        assert_eq!(encoder.bit_position(), 17);
        assert_eq!(&encoder.into_bytes()[..], &[0xD5, 0xE6, 0x80]);

        // three octets and more are aligned
        let mut encoder = AperEncoder::new();
        encoder.encode_sequence_preamble(false, 1, 1).unwrap();
        encoder
            .encode_octet_string(&[0xAB, 0xCD, 0xEF], &SizeConstraint::fixed(3))
            .unwrap();
        assert_eq!(encoder.bit_position(), 32);
        assert_eq!(&encoder.into_bytes()[..], &[0x80, 0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn test_push_open_value() {
        struct Drx(i64);

        impl AperEncode for Drx {
            fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
                encoder.encode_enumerated(self.0, &Constraint::extensible(0, 3))
            }
        }

        let mut encoder = AperEncoder::new();
        encoder.encode_enumerated(1, &Constraint::new(0, 2)).unwrap();
        encoder.push_open_value(&Drx(2)).unwrap();
        // 01 xxxxxx | length 1 | 0010 xxxx
        assert_eq!(&encoder.into_bytes()[..], &[0x40, 0x01, 0x20]);

        let mut encoder = AperEncoder::new();
        assert!(encoder.push_open_value(&Drx(4)).is_err());
        assert_eq!(encoder.bit_position(), 0);
    }

    #[test]
    fn test_push_open_type() {
        let mut encoder = AperEncoder::new();
        encoder.push_field(&enc_enumerated(1, &Constraint::new(0, 2)).unwrap());
        encoder.push_open_type(&[0xDE, 0xAD]).unwrap();
        assert_eq!(&encoder.into_bytes()[..], &[0x40, 0x02, 0xDE, 0xAD]);
    }

    #[test]
    fn test_encode_whole_numbers() {
        let mut encoder = AperEncoder::new();
        encoder
            .encode_choice_index(0, &Constraint::extensible(0, 2))
            .unwrap();
        encoder.encode_integer(21, &Constraint::new(0, 255)).unwrap();
        encoder.encode_enumerated(0, &Constraint::new(0, 2)).unwrap();
        assert_eq!(&encoder.into_bytes()[..], &[0x00, 0x15, 0x00]);

        let mut encoder = AperEncoder::new();
        encoder.encode_sequence_preamble(true, 0, 0).unwrap();
        encoder
            .encode_sequence_of(3, &Constraint::new(0, 65535))
            .unwrap();
        assert_eq!(&encoder.into_bytes()[..], &[0x00, 0x00, 0x03]);

        let mut encoder = AperEncoder::new();
        encoder.encode_sequence_of(1, &Constraint::new(1, 12)).unwrap();
        encoder.encode_enumerated(2, &Constraint::new(0, 2)).unwrap();
        assert_eq!(encoder.bit_position(), 6);
    }

    #[test]
    fn test_encode_strings() {
        let mut encoder = AperEncoder::new();
        encoder.encode_sequence_preamble(true, 2, 0x02).unwrap();
        encoder
            .encode_octet_string(&[0x01], &SizeConstraint::fixed(1))
            .unwrap();
        encoder
            .encode_octet_string(&[0x00, 0x00, 0x7B], &SizeConstraint::fixed(3))
            .unwrap();
        // SST packed after the preamble, SD aligned
        assert_eq!(&encoder.into_bytes()[..], &[0x40, 0x20, 0x00, 0x00, 0x7B]);

        let mut encoder = AperEncoder::new();
        encoder.encode_choice_index(0, &Constraint::new(0, 1)).unwrap();
        encoder
            .encode_bit_string(&[0x00, 0x00, 0x01], 22, &SizeConstraint::range(22, 32))
            .unwrap();
        assert_eq!(encoder.bit_position(), 28);
        assert_eq!(&encoder.into_bytes()[..], &[0x00, 0x00, 0x00, 0x10]);
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        let mut encoder = AperEncoder::new();
        assert!(encoder.encode_enumerated(3, &Constraint::new(0, 2)).is_err());
        assert!(encoder
            .encode_octet_string(&[0x00, 0x01], &SizeConstraint::fixed(3))
            .is_err());
        assert_eq!(encoder.bit_position(), 0);
    }

    #[test]
    fn test_empty_encoder() {
        assert!(AperEncoder::new().into_bytes().is_empty());
    }
}
