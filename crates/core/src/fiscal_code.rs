//! Age and gender decoding from an Italian fiscal code (codice fiscale).
//!
//! Only the birth-date block is read:
//!
//! ```text
//! RSS MRA 46 M 15 H501X
//!         ^^ ^ ^^
//!         |  | day of birth, +40 for women
//!         |  month letter
//!         two-digit year
//! ```
//!
//! The surname/name consonants, the municipality code and the check character are not
//! validated. Decoding never fails loudly: any malformed input simply yields `None`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Minimum normalised length needed to reach the day field.
pub const MIN_FISCAL_CODE_LEN: usize = 11;

/// Offset added to the day of birth for women.
const FEMALE_DAY_OFFSET: u32 = 40;

/// Month letters in calendar order.
const MONTH_LETTERS: [char; 12] = ['A', 'B', 'C', 'D', 'E', 'H', 'L', 'M', 'P', 'R', 'S', 'T'];

/// Gender as encoded by the day field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

/// Result of decoding the birth-date block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedIdentity {
    /// Whole years between the birth date and the reference day.
    pub age: u32,
    pub gender: Gender,
    pub birth_date: NaiveDate,
}

/// Decodes age and gender, measuring age at `today`.
///
/// # Arguments
///
/// * `raw` - Fiscal code as typed; surrounding whitespace and case are ignored.
/// * `today` - Reference day for the age computation.
///
/// # Returns
///
/// `None` if the code is shorter than 11 characters, has a non-numeric year or day, an unknown
/// month letter, a day that does not exist in the decoded month, or decodes to a birth date
/// after `today`.
pub fn decode(raw: &str, today: NaiveDate) -> Option<DecodedIdentity> {
    let code: Vec<char> = raw.trim().to_uppercase().chars().collect();
    if code.len() < MIN_FISCAL_CODE_LEN {
        return None;
    }

    let yy = two_digits(code[6], code[7])?;
    let month = month_from_letter(code[8])?;
    let mut day = two_digits(code[9], code[10])?;

    let gender = if day > FEMALE_DAY_OFFSET {
        day -= FEMALE_DAY_OFFSET;
        Gender::F
    } else {
        Gender::M
    };
    if day == 0 {
        return None;
    }

    // Two-digit years are ambiguous; anything that would land in the future belongs to the 1900s.
    let year = if 2000 + yy as i32 > today.year() {
        1900 + yy as i32
    } else {
        2000 + yy as i32
    };

    let birth_date = NaiveDate::from_ymd_opt(year, month, day)?;
    let age = whole_years_between(birth_date, today)?;

    Some(DecodedIdentity {
        age,
        gender,
        birth_date,
    })
}

fn two_digits(tens: char, units: char) -> Option<u32> {
    Some(tens.to_digit(10)? * 10 + units.to_digit(10)?)
}

fn month_from_letter(letter: char) -> Option<u32> {
    MONTH_LETTERS
        .iter()
        .position(|&m| m == letter)
        .map(|idx| idx as u32 + 1)
}

/// Completed years from `from` to `to`, or `None` if `from` is after `to`.
fn whole_years_between(from: NaiveDate, to: NaiveDate) -> Option<u32> {
    if from > to {
        return None;
    }
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
