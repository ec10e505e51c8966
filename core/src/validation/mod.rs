//! Local checks run before a form is sent to the backend.

pub mod rules;

use chrono::NaiveDate;
use thiserror::Error;

pub use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("birth date is required")]
    BirthDateMissing,
    #[error("employee must be at least {min} years old (is {age})", min = rules::MIN_WORKING_AGE)]
    TooYoung { age: u32 },
    #[error("employee must be younger than {max} (is {age})", max = rules::RETIREMENT_AGE)]
    TooOld { age: u32 },
    #[error(
        "requested {requested} paid days but only {available} remain \
         (balance {balance}, pending {pending})"
    )]
    InsufficientBalance {
        requested: u32,
        available: u32,
        balance: u32,
        pending: u32,
    },
    #[error("{0}")]
    Invalid(String),
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        messages.sort();
        ValidationError::Invalid(messages.join(", "))
    }
}
