//! Israeli ID number validation.
//!
//! A valid ID has exactly nine ASCII digits. Digits are weighted 1, 2, 1,
//! 2, ... from the left; a weighted digit above 9 contributes its value
//! minus 9. The ID is valid when the sum is divisible by 10.

use crate::error::{PlatformError, Result};

const ID_LENGTH: usize = 9;

pub fn is_valid_id(id: &str) -> bool {
    if id.len() != ID_LENGTH || !id.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = id
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let weighted = u32::from(b - b'0') * (i as u32 % 2 + 1);
            if weighted > 9 {
                weighted - 9
            } else {
                weighted
            }
        })
        .sum();

    sum % 10 == 0
}

pub fn validate_id(id: &str) -> Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(PlatformError::InvalidId(id.to_string()))
    }
}
