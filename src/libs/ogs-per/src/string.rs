//! BIT STRING (X.691 §15) and OCTET STRING (X.691 §16)

use bytes::Bytes;

use crate::bit_field::{merge_bit_field, BitField};
use crate::constraint::{LengthBound, Size, SizeConstraint};
use crate::encode::enc_length_determinant;
use crate::error::{PerError, PerResult};
use crate::whole_number::enc_constrained_whole_number_ext;

/// Largest fixed size encoded without fragmentation
pub const MAX_FIXED_SIZE: usize = 65536;

/// Largest fixed BIT STRING size encoded as a bit-field
pub const MAX_BIT_FIELD_BITS: usize = 16;

/// Largest fixed OCTET STRING size packed into the bit-field prefix
pub const MAX_BIT_FIELD_OCTETS: usize = 2;

/// Encoded OCTET STRING
///
/// `prefix` holds the bits that are merged with the surrounding bit-field
/// (extension bit, length, short fixed-size contents). `payload` is the
/// octet-aligned tail, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OctetStringEncoding {
    pub prefix: BitField,
    pub payload: Bytes,
}

/// Length prefix of a variable size string: extension bit, then the length.
fn enc_length_prefix(length: usize, size: &SizeConstraint) -> PerResult<BitField> {
    match size.size {
        Size::Range { min, max } => enc_constrained_whole_number_ext(
            length as i64,
            &SizeConstraint::length_constraint(min, max, size.extensible),
        ),
        Size::Unconstrained => {
            let length = enc_length_determinant(length, LengthBound::Unbounded)?;
            Ok(extension_bit(size.extensible)?.concat(&length))
        }
        Size::Fixed(_) => Ok(BitField::empty()),
    }
}

fn extension_bit(extensible: bool) -> PerResult<BitField> {
    if extensible {
        BitField::from_left_aligned(vec![0x00], 1)
    } else {
        Ok(BitField::empty())
    }
}

/// Encode a BIT STRING made of the low `bit_len` bits of `bits`.
///
/// Fixed sizes carry no length determinant; sizes above 16 bits form an
/// octet-aligned field, which the caller aligns when composing.
pub fn enc_bit_string(bits: &[u8], bit_len: usize, size: &SizeConstraint) -> PerResult<BitField> {
    size.check(bit_len)?;

    if bits.len() * 8 < bit_len {
        return Err(PerError::BufferTooShort {
            needed: bit_len,
            available: bits.len() * 8,
        });
    }

    if let Size::Fixed(fixed) = size.size {
        if fixed > MAX_FIXED_SIZE {
            log::trace!("fixed BIT STRING of {} bits needs fragmentation", fixed);
            return Err(PerError::LengthTooLarge { length: fixed });
        }
        return BitField::from_right_aligned(bits.to_vec(), bit_len);
    }

    let (prefix, prefix_bits) = enc_length_prefix(bit_len, size)?.into_parts();
    let (merged, merged_bits) = merge_bit_field(Some(prefix.as_slice()), prefix_bits, bits, bit_len);
    BitField::from_left_aligned(merged, merged_bits)
}

/// Encode an OCTET STRING.
///
/// A fixed size string of an extensible type shorter than 3 octets is
/// packed into the prefix as a bit-field; otherwise the octets stay in the
/// aligned payload.
///
/// A string whose length differs from a fixed size fails with
/// `LengthMismatch`; a length outside a range fails with `LengthOutOfRange`.
pub fn enc_octet_string(
    octets: impl Into<Bytes>,
    size: &SizeConstraint,
) -> PerResult<OctetStringEncoding> {
    let octets: Bytes = octets.into();
    let length = octets.len();
    size.check(length)?;

    match size.size {
        Size::Fixed(fixed) if fixed > MAX_FIXED_SIZE => {
            log::trace!("fixed OCTET STRING of {} octets needs fragmentation", fixed);
            Err(PerError::LengthTooLarge { length: fixed })
        }
        Size::Fixed(_) if !size.extensible => Ok(OctetStringEncoding {
            prefix: BitField::empty(),
            payload: octets,
        }),
        Size::Fixed(fixed) if fixed <= MAX_BIT_FIELD_OCTETS => {
            let prefix = extension_bit(true)?.concat(&BitField::from_octets(octets.to_vec()));
            Ok(OctetStringEncoding {
                prefix,
                payload: Bytes::new(),
            })
        }
        Size::Fixed(_) => Ok(OctetStringEncoding {
            prefix: extension_bit(true)?,
            payload: octets,
        }),
        Size::Range { .. } | Size::Unconstrained => Ok(OctetStringEncoding {
            prefix: enc_length_prefix(length, size)?,
            payload: octets,
        }),
    }
}
