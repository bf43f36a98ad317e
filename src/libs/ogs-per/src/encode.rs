//! INTEGER, ENUMERATED, CHOICE, SEQUENCE, SEQUENCE OF and length
//! determinant encoders
//!
//! Every encoder returns a left-justified `BitField` for the caller to merge
//! into the enclosing encoding in schema order.

use crate::bit_field::BitField;
use crate::constraint::{Constraint, LengthBound};
use crate::error::{PerError, PerResult};
use crate::whole_number::enc_constrained_whole_number_ext;

/// Largest number of optional components a one-octet preamble can carry
pub const MAX_PREAMBLE_OPTIONALS: usize = 7;

/// Largest length the non-fragmented general length determinant carries
pub const MAX_UNFRAGMENTED_LENGTH: usize = 16383;

/// Encode INTEGER (X.691 §12)
///
/// Only the single value and constrained whole number cases.
pub fn enc_integer(value: i64, constraint: &Constraint) -> PerResult<BitField> {
    if constraint.is_single_value() {
        constraint.check(value)?;
        return Ok(if constraint.extensible {
            BitField::from_left_aligned(vec![0x00], 1)?
        } else {
            BitField::empty()
        });
    }

    enc_constrained_whole_number_ext(value, constraint)
}

/// Encode ENUMERATED (X.691 §13)
pub fn enc_enumerated(value: i64, constraint: &Constraint) -> PerResult<BitField> {
    enc_constrained_whole_number_ext(value, constraint)
}

/// Encode the element count of a SEQUENCE OF (X.691 §19).
///
/// The count is encoded exactly like an ENUMERATED value.
pub use self::enc_enumerated as enc_sequence_of;

/// Encode a CHOICE index (X.691 §22)
///
/// The index is the leading field of the chosen alternative.
pub fn enc_choice(index: i64, constraint: &Constraint) -> PerResult<BitField> {
    enc_integer(index, constraint)
}

/// Encode a SEQUENCE preamble (X.691 §18)
///
/// The extension bit (if any) is followed by one presence bit per
/// OPTIONAL/DEFAULT component, taken from the low `optional_count` bits of
/// `presence` with the first component in the most significant position.
pub fn enc_sequence(extensible: bool, optional_count: usize, presence: u8) -> PerResult<BitField> {
    if optional_count > MAX_PREAMBLE_OPTIONALS {
        return Err(PerError::TooManyOptionals {
            count: optional_count,
        });
    }

    let max_presence = (1i64 << optional_count) - 1;
    if i64::from(presence) > max_presence {
        return Err(PerError::OutOfRange {
            value: i64::from(presence),
            min: 0,
            max: max_presence,
        });
    }

    let bits = usize::from(extensible) + optional_count;
    if bits == 0 {
        return Ok(BitField::empty());
    }
    BitField::from_right_aligned(vec![presence], bits)
}

/// Encode a length determinant (X.691 §10.9)
///
/// A bound below 64K encodes the length as a constrained whole number over
/// `0..=ub`. Otherwise the general form is used: one octet up to 127, two
/// octets (`10` + 14 bits) up to 16383. Longer lengths need fragmentation
/// and fail with `LengthTooLarge`. A length above `ub` fails with
/// `OutOfRange`, as any constrained whole number does.
pub fn enc_length_determinant(length: usize, bound: LengthBound) -> PerResult<BitField> {
    if let LengthBound::Upper(ub) = bound {
        if length > ub {
            return Err(PerError::OutOfRange {
                value: length as i64,
                min: 0,
                max: ub as i64,
            });
        }
        if ub < 65536 {
            return enc_constrained_whole_number_ext(length as i64, &Constraint::new(0, ub as i64));
        }
    }

    match length {
        0..=127 => Ok(BitField::from_octets([length as u8])),
        128..=MAX_UNFRAGMENTED_LENGTH => Ok(BitField::from_octets(
            (0x8000 | length as u16).to_be_bytes(),
        )),
        _ => {
            log::trace!("length determinant {} needs fragmentation", length);
            Err(PerError::LengthTooLarge { length })
        }
    }
}
