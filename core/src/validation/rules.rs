//! Date arithmetic and HR rules shared by forms and views.

use chrono::{Datelike, NaiveDate};

use super::ValidationError;

/// Paid-leave days granted per year when the backend reports no balance.
pub const ANNUAL_LEAVE_ALLOWANCE: u32 = 30;
pub const MIN_WORKING_AGE: u32 = 18;
pub const RETIREMENT_AGE: u32 = 60;

/// Number of calendar days covered by `start..=end`.
///
/// Returns `None` when `end` precedes `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> Option<u32> {
    let span = (end - start).num_days();
    if span < 0 {
        return None;
    }
    u32::try_from(span + 1).ok()
}

pub fn validate_leave_dates(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    Ok(())
}

/// Age in completed years on `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age.max(0)).unwrap_or(0)
}

/// Employees must be at least 18 and younger than 60.
pub fn validate_birth_date(
    birth: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let birth = birth.ok_or(ValidationError::BirthDateMissing)?;
    let age = age_on(birth, today);
    if age < MIN_WORKING_AGE {
        return Err(ValidationError::TooYoung { age });
    }
    if age >= RETIREMENT_AGE {
        return Err(ValidationError::TooOld { age });
    }
    Ok(())
}

pub fn retirement_year(birth: NaiveDate) -> i32 {
    birth.year() + RETIREMENT_AGE as i32
}

/// Refuses a paid-leave request longer than `balance - pending`.
pub fn check_paid_leave_balance(
    requested: u32,
    balance: u32,
    pending: u32,
) -> Result<(), ValidationError> {
    let available = balance.saturating_sub(pending);
    if requested > available {
        return Err(ValidationError::InsufficientBalance {
            requested,
            available,
            balance,
            pending,
        });
    }
    Ok(())
}
