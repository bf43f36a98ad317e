//! Value and size constraints
//!
//! `Constraint` parameterizes the whole-number based encoders (INTEGER,
//! ENUMERATED, CHOICE index, SEQUENCE OF count). `SizeConstraint` selects
//! the framing of BIT STRING and OCTET STRING once, at the call site.

use crate::error::{PerError, PerResult};

/// Value range constraint `min..=max`, optionally extensible (`...`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub min: i64,
    pub max: i64,
    pub extensible: bool,
}

impl Constraint {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max, extensible: false }
    }

    pub const fn extensible(min: i64, max: i64) -> Self {
        Self { min, max, extensible: true }
    }

    /// Number of values in the range, 0 when `max < min`
    pub fn range(&self) -> u128 {
        if self.max >= self.min {
            (self.max as i128 - self.min as i128) as u128 + 1
        } else {
            0
        }
    }

    /// Width of the bit-field case (ranges 2..=255): the bit length of the
    /// range itself.
    pub fn field_width(&self) -> usize {
        (u128::BITS - self.range().leading_zeros()) as usize
    }

    pub fn is_single_value(&self) -> bool {
        self.min == self.max
    }

    /// Check that the constraint is well formed and contains `value`.
    pub fn check(&self, value: i64) -> PerResult<()> {
        if self.min > self.max {
            return Err(PerError::InvalidConstraint {
                min: self.min,
                max: self.max,
            });
        }
        if value < self.min || value > self.max {
            return Err(PerError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Size shape of a string type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    /// `SIZE(n)`
    Fixed(usize),
    /// `SIZE(min..max)`
    Range { min: usize, max: usize },
    /// No size constraint
    Unconstrained,
}

/// Size constraint of a BIT STRING or OCTET STRING
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeConstraint {
    pub size: Size,
    pub extensible: bool,
}

impl SizeConstraint {
    pub const fn fixed(size: usize) -> Self {
        Self {
            size: Size::Fixed(size),
            extensible: false,
        }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            size: Size::Range { min, max },
            extensible: false,
        }
    }

    pub const fn unconstrained() -> Self {
        Self {
            size: Size::Unconstrained,
            extensible: false,
        }
    }

    /// Mark the size constraint extensible (`SIZE(...,...)`).
    pub const fn with_extension(mut self) -> Self {
        self.extensible = true;
        self
    }

    /// Build from `min`/`max` bounds; equal bounds give a fixed size.
    pub const fn from_bounds(min: usize, max: usize, extensible: bool) -> Self {
        let size = if min == max {
            Size::Fixed(min)
        } else {
            Size::Range { min, max }
        };
        Self { size, extensible }
    }

    /// Check that `length` satisfies the constraint.
    pub fn check(&self, length: usize) -> PerResult<()> {
        match self.size {
            Size::Fixed(expected) if length != expected => Err(PerError::LengthMismatch {
                expected,
                actual: length,
            }),
            Size::Range { min, max } if length < min || length > max => {
                Err(PerError::LengthOutOfRange { length, min, max })
            }
            _ => Ok(()),
        }
    }

    /// Whole-number constraint over the permitted lengths of a `Range`.
    pub(crate) fn length_constraint(min: usize, max: usize, extensible: bool) -> Constraint {
        Constraint {
            min: min as i64,
            max: max as i64,
            extensible,
        }
    }
}

/// Upper bound of a length determinant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthBound {
    /// Lengths `0..=ub`
    Upper(usize),
    /// General length determinant
    Unbounded,
}
