//! Bit-field fragments
//!
//! PER ALIGNED packs preambles, extension markers and short integers into
//! bit-fields that are not octet aligned. Those fragments are carried as an
//! octet buffer plus a significant bit length, with the significant bits at
//! the most significant end of the buffer.
//!
//! The raw primitives (`shift_left`, `shift_right`, `shift_left_most`,
//! `merge_bit_field`) take their buffer by value: the caller hands the
//! buffer over and gets a (possibly rewritten) buffer back.

use bitvec::prelude::*;

use crate::error::{PerError, PerResult};

/// Number of octets needed to hold `bits` bits.
#[inline]
pub(crate) fn octets_for(bits: usize) -> usize {
    (bits + 7) / 8
}

/// Logical left shift of the whole buffer by `n` bits.
///
/// Bits carried out of an octet enter the next more significant octet;
/// bits shifted past the first octet are discarded.
pub fn shift_left(mut octets: Vec<u8>, n: usize) -> Vec<u8> {
    let len = octets.len();
    let byte_shift = n / 8;
    let bit_shift = (n % 8) as u32;

    if byte_shift >= len {
        octets.fill(0);
        return octets;
    }

    for i in 0..len {
        let src = i + byte_shift;
        let hi = octets.get(src).copied().unwrap_or(0);
        let lo = octets.get(src + 1).copied().unwrap_or(0);
        octets[i] = if bit_shift == 0 {
            hi
        } else {
            (hi << bit_shift) | (lo >> (8 - bit_shift))
        };
    }
    octets
}

/// Logical right shift of the whole buffer by `n` bits.
///
/// Bits shifted past the last octet are discarded.
pub fn shift_right(mut octets: Vec<u8>, n: usize) -> Vec<u8> {
    let len = octets.len();
    let byte_shift = n / 8;
    let bit_shift = (n % 8) as u32;

    if byte_shift >= len {
        octets.fill(0);
        return octets;
    }

    for i in (0..len).rev() {
        let lo = i.checked_sub(byte_shift).map_or(0, |src| octets[src]);
        let hi = i
            .checked_sub(byte_shift + 1)
            .map_or(0, |src| octets[src]);
        octets[i] = if bit_shift == 0 {
            lo
        } else {
            (lo >> bit_shift) | (hi << (8 - bit_shift))
        };
    }
    octets
}

/// Left-justify the low `bits` bits of `octets`.
///
/// The buffer keeps its length. A bit count larger than the buffer is
/// clamped to the buffer size.
pub fn shift_left_most(octets: Vec<u8>, bits: usize) -> (Vec<u8>, usize) {
    let total = octets.len() * 8;
    let bits = bits.min(total);
    (shift_left(octets, total - bits), bits)
}

/// Merge a left-justified outer fragment with the low `inner_bits` bits of
/// `inner`.
///
/// ```text
/// outer (4 bits)   1010 xxxx
/// inner (14 bits)  xx11 1010 1111 0000
/// result (18 bits) 1010 1110 1011 1100 00xx xxxx
/// ```
///
/// Without an outer fragment the result is `inner` left-justified, with
/// its original octet count.
pub fn merge_bit_field(
    outer: Option<&[u8]>,
    outer_bits: usize,
    inner: &[u8],
    inner_bits: usize,
) -> (Vec<u8>, usize) {
    let Some(outer) = outer else {
        return shift_left_most(inner.to_vec(), inner_bits);
    };

    let outer_bits = outer_bits.min(outer.len() * 8);
    let inner_bits = inner_bits.min(inner.len() * 8);

    let mut merged = vec![0u8; outer.len()];
    merged.extend_from_slice(inner);
    clear_leading_bits(&mut merged[outer.len()..], inner.len() * 8 - inner_bits);

    let gap = (inner.len() * 8 - inner_bits) + (outer.len() * 8 - outer_bits);
    let mut merged = shift_left(merged, gap);

    let mut head = outer.to_vec();
    clear_padding(&mut head, outer_bits);
    for (dst, src) in merged.iter_mut().zip(&head) {
        *dst |= *src;
    }

    let bits = outer_bits + inner_bits;
    merged.truncate(octets_for(bits));
    (merged, bits)
}

/// Zero the `n` most significant bits of `octets`.
fn clear_leading_bits(octets: &mut [u8], n: usize) {
    for (i, octet) in octets.iter_mut().enumerate() {
        let start = i * 8;
        if start >= n {
            break;
        }
        let cleared = (n - start).min(8);
        *octet &= if cleared == 8 { 0 } else { 0xFF >> cleared };
    }
}

/// Truncate to the minimal octet count and zero the padding bits.
fn clear_padding(octets: &mut Vec<u8>, bits: usize) {
    octets.truncate(octets_for(bits));
    let rem = bits % 8;
    if rem != 0 {
        if let Some(last) = octets.last_mut() {
            *last &= 0xFFu8 << (8 - rem);
        }
    }
}

/// A left-justified bit-field fragment.
///
/// Holds exactly `ceil(bit_len / 8)` octets and its padding bits are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitField {
    octets: Vec<u8>,
    bits: usize,
}

impl BitField {
    /// The zero-bit fragment.
    pub const fn empty() -> Self {
        Self {
            octets: Vec::new(),
            bits: 0,
        }
    }

    /// A fragment made of whole octets.
    pub fn from_octets(octets: impl Into<Vec<u8>>) -> Self {
        let octets = octets.into();
        let bits = octets.len() * 8;
        Self { octets, bits }
    }

    /// Take the first `bits` bits of `octets`.
    pub fn from_left_aligned(mut octets: Vec<u8>, bits: usize) -> PerResult<Self> {
        check_capacity(&octets, bits)?;
        clear_padding(&mut octets, bits);
        Ok(Self { octets, bits })
    }

    /// Take the last `bits` bits of `octets`.
    pub fn from_right_aligned(octets: Vec<u8>, bits: usize) -> PerResult<Self> {
        check_capacity(&octets, bits)?;
        let (octets, bits) = shift_left_most(octets, bits);
        Self::from_left_aligned(octets, bits)
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> usize {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn is_octet_aligned(&self) -> bool {
        self.bits % 8 == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.octets
    }

    /// The significant bits, most significant first.
    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &BitSlice::<u8, Msb0>::from_slice(&self.octets)[..self.bits]
    }

    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.octets, self.bits)
    }

    /// Append `inner` after the last significant bit of `self`.
    pub fn concat(mut self, inner: &BitField) -> BitField {
        let offset = self.bits % 8;
        if offset == 0 {
            self.octets.extend_from_slice(&inner.octets);
        } else {
            for &octet in &inner.octets {
                if let Some(last) = self.octets.last_mut() {
                    *last |= octet >> offset;
                }
                self.octets.push(octet << (8 - offset));
            }
        }
        self.bits += inner.bits;
        self.octets.truncate(octets_for(self.bits));
        self
    }
}

fn check_capacity(octets: &[u8], bits: usize) -> PerResult<()> {
    if bits > octets.len() * 8 {
        return Err(PerError::BufferTooShort {
            needed: bits,
            available: octets.len() * 8,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_left() {
        assert_eq!(shift_left(vec![0x00, 0x11, 0x22], 4), vec![0x01, 0x12, 0x20]);
        assert_eq!(shift_left(vec![0x00, 0x11, 0x22], 8), vec![0x11, 0x22, 0x00]);
        assert_eq!(shift_left(vec![0x00, 0x11, 0x22], 0), vec![0x00, 0x11, 0x22]);
        assert_eq!(shift_left(vec![0xFF, 0xFF], 16), vec![0x00, 0x00]);
        assert_eq!(shift_left(vec![0xFF, 0xFF], 100), vec![0x00, 0x00]);
        assert!(shift_left(Vec::new(), 3).is_empty());
    }

    #[test]
    fn test_shift_right() {
        assert_eq!(shift_right(vec![0x00, 0x11, 0x22], 4), vec![0x00, 0x01, 0x12]);
        assert_eq!(shift_right(vec![0x80, 0x01], 9), vec![0x00, 0x40]);
        assert_eq!(shift_right(vec![0xFF], 8), vec![0x00]);
    }

    #[test]
    fn test_shift_left_most() {
        assert_eq!(shift_left_most(vec![0x00, 0x11], 8), (vec![0x11, 0x00], 8));
        assert_eq!(shift_left_most(vec![0x01], 4), (vec![0x10], 4));
        assert_eq!(shift_left_most(vec![0xAB], 8), (vec![0xAB], 8));
        // clamped to the buffer size
        assert_eq!(shift_left_most(vec![0xAB], 12), (vec![0xAB], 8));
    }

    #[test]
    fn test_merge_without_outer() {
        let (out, bits) = merge_bit_field(None, 0, &[0x00, 0x11], 8);
        assert_eq!(out, vec![0x11, 0x00]);
        assert_eq!(bits, 8);
    }

    #[test]
    fn test_merge_bit_field() {
        // 1010 ‖ 11 1010 1111 0000
        let (out, bits) = merge_bit_field(Some(&[0xA0][..]), 4, &[0x3A, 0xF0], 14);
        assert_eq!(out, vec![0xAE, 0xBC, 0x00]);
        assert_eq!(bits, 18);

        // 1000 0000 1 ‖ 0 1000 0000
        let (out, bits) = merge_bit_field(Some(&[0x80, 0x80][..]), 9, &[0x08, 0x80], 9);
        assert_eq!(out, vec![0x80, 0xA0, 0x00]);
        assert_eq!(bits, 18);
    }

    #[test]
    fn test_merge_masks_padding() {
        // outer padding and inner leading bits are not significant
        let (out, bits) = merge_bit_field(Some(&[0xFF][..]), 1, &[0xFE], 1);
        assert_eq!(out, vec![0x80]);
        assert_eq!(bits, 2);
    }

    #[test]
    fn test_bit_field_from_right_aligned() {
        let field = BitField::from_right_aligned(vec![0x00, 0x01, 0x80], 17).unwrap();
        assert_eq!(field.as_bytes(), &[0x00, 0xC0, 0x00]);
        assert_eq!(field.bit_len(), 17);

        let field = BitField::from_right_aligned(vec![0x00, 0x00, 0x02], 2).unwrap();
        assert_eq!(field.as_bytes(), &[0x80]);

        assert_eq!(
            BitField::from_right_aligned(vec![0x01], 9),
            Err(PerError::BufferTooShort { needed: 9, available: 8 })
        );
    }

    #[test]
    fn test_bit_field_from_left_aligned() {
        let field = BitField::from_left_aligned(vec![0xFF, 0xFF], 3).unwrap();
        assert_eq!(field.as_bytes(), &[0xE0]);
        assert_eq!(field.bit_len(), 3);
        assert!(!field.is_octet_aligned());
    }

    #[test]
    fn test_concat() {
        let outer = BitField::from_left_aligned(vec![0x00], 3).unwrap();
        let inner = BitField::from_octets([0xFF]);
        let out = outer.concat(&inner);
        assert_eq!(out.as_bytes(), &[0x1F, 0xE0]);
        assert_eq!(out.bit_len(), 11);

        let out = BitField::empty().concat(&BitField::from_octets([0x12, 0x34]));
        assert_eq!(out.as_bytes(), &[0x12, 0x34]);
        assert!(out.is_octet_aligned());
    }

    #[test]
    fn test_as_bitslice() {
        let field = BitField::from_left_aligned(vec![0xA0], 3).unwrap();
        let bits: Vec<bool> = field.as_bitslice().iter().by_vals().collect();
        assert_eq!(bits, vec![true, false, true]);
    }
}
