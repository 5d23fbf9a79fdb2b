//! Numeric code generation

use rand::{rngs::OsRng, Rng};

use crate::errors::ValidationError;

/// Length of codes produced by default
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generate a zero-padded numeric code of `length` digits using the OS CSPRNG
///
/// `length` must be between 1 and 9.
pub fn generate_numeric_code(length: usize) -> Result<String, ValidationError> {
    if !(1..=9).contains(&length) {
        return Err(ValidationError::OutOfRange {
            field: "length".to_string(),
            min: "1".to_string(),
            max: "9".to_string(),
        });
    }
    let upper = 10u32.pow(length as u32);
    let value = OsRng.gen_range(0..upper);
    Ok(format!("{:0width$}", value, width = length))
}
