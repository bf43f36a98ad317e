//! NextGCore PER Codec Library
//!
//! ASN.1 Packed Encoding Rules, ALIGNED variant (ITU-T X.691), encode
//! direction. Each encoder produces a left-justified bit-field fragment;
//! protocol layers combine fragments in schema order with
//! `merge_bit_field` / `BitField::concat` or the `AperEncoder` composer.
//!
//! # Modules
//!
//! - `bit_field` - bit-field fragments, shifting and merging
//! - `constraint` - value and size constraints
//! - `whole_number` - constrained whole numbers (X.691 §10.5)
//! - `encode` - INTEGER, ENUMERATED, CHOICE, SEQUENCE, SEQUENCE OF, lengths
//! - `string` - BIT STRING and OCTET STRING
//! - `encoder` - fragment composer

pub mod bit_field;
pub mod constraint;
pub mod encode;
pub mod encoder;
pub mod error;
pub mod string;
pub mod whole_number;


// Re-export commonly used types
pub use bit_field::{merge_bit_field, shift_left, shift_left_most, shift_right, BitField};
pub use constraint::{Constraint, LengthBound, Size, SizeConstraint};
pub use encode::{
    enc_choice, enc_enumerated, enc_integer, enc_length_determinant, enc_sequence,
    enc_sequence_of,
};
pub use encoder::{AperEncode, AperEncoder};
pub use error::{PerError, PerResult};
pub use string::{enc_bit_string, enc_octet_string, OctetStringEncoding};
pub use whole_number::enc_constrained_whole_number;
