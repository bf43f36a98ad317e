//! Constrained whole numbers (X.691 §10.5) and the extension marker

use crate::bit_field::BitField;
use crate::constraint::Constraint;
use crate::error::{PerError, PerResult};

/// Encode `value` as a constrained whole number.
///
/// Returns the octets holding `value - min` in their low-order bits,
/// big-endian, and the number of significant bits:
///
/// | range        | bits                  |
/// |--------------|-----------------------|
/// | 1            | 0                     |
/// | 2..=255      | bit length of `range` |
/// | 256          | 8                     |
/// | 257..=65536  | 16                    |
///
/// Larger ranges need the indefinite length case and fail with
/// `RangeTooLarge`.
pub fn enc_constrained_whole_number(
    value: i64,
    constraint: &Constraint,
) -> PerResult<(Vec<u8>, usize)> {
    constraint.check(value)?;

    let range = constraint.range();
    let offset = (value as i128 - constraint.min as i128) as u64;

    match range {
        1 => Ok((Vec::new(), 0)),
        2..=255 => Ok((vec![offset as u8], constraint.field_width())),
        256 => Ok((vec![offset as u8], 8)),
        257..=65536 => Ok(((offset as u16).to_be_bytes().to_vec(), 16)),
        _ => {
            log::trace!("constrained whole number range {} not supported", range);
            Err(PerError::RangeTooLarge { range })
        }
    }
}

/// Constrained whole number, preceded by the extension bit when the
/// constraint is extensible, left-justified.
///
/// An octet-sized base encoding (including the empty one) gets a new zero
/// lead octet; a shorter bit-field just grows by one bit.
pub(crate) fn enc_constrained_whole_number_ext(
    value: i64,
    constraint: &Constraint,
) -> PerResult<BitField> {
    let (mut octets, mut bits) = enc_constrained_whole_number(value, constraint)?;

    if constraint.extensible {
        if bits % 8 == 0 {
            octets.insert(0, 0x00);
            bits += 8;
        } else if bits < 8 {
            bits += 1;
        }
    }

    BitField::from_right_aligned(octets, bits)
}
