//! Per-field rules for new accounts.
//!
//! Every check returns the reason it failed so the caller can surface it as-is.
//! Lengths are counted in characters, not bytes.

use super::AccountError;
use regex::Regex;
use serde_json::{Map, Value};

const USERNAME_MIN: usize = 5;
const USERNAME_MAX: usize = 24;
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 99;
const PASSWORD_MIN: usize = 9;
const PASSWORD_MAX: usize = 999;

// Quoted or dot-atom local part, at least one domain label and a 2+ char TLD.
// Only ASCII whitespace is excluded from atoms.
const MAIL_PATTERN: &str = r#"^(([^<>()\[\]\.,;:\t\n\f\r @"]+(\.[^<>()\[\]\.,;:\t\n\f\r @"]+)*)|(".+"))@(([^<>()\[\]\.,;:\t\n\f\r @"]+\.)+[^<>()\[\]\.,;:\t\n\f\r @"]{2,})$"#;

const REQUIRED_FIELDS: [&str; 5] = ["username", "name", "mail", "password", "confirm_password"];

/// Creation input once every required field is known to be present.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub name: String,
    pub mail: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// All five fields must be present and non-null; the error lists every missing one.
///
/// # Errors
/// `MissingField` when any field is absent or null, `ValidationFailed` when a
/// field is not a string.
pub fn require_fields(body: &Map<String, Value>) -> Result<NewAccount, AccountError> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| body.get(*field).map_or(true, Value::is_null))
        .collect();

    if !missing.is_empty() {
        return Err(AccountError::MissingField(missing.join(", ")));
    }

    let text = |field: &str| -> Result<String, AccountError> {
        body.get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AccountError::ValidationFailed(format!("{field} must be a string")))
    };

    Ok(NewAccount {
        username: text("username")?,
        name: text("name")?,
        mail: text("mail")?,
        password: text("password")?,
        confirm_password: text("confirm_password")?,
    })
}

fn within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

/// # Errors
/// `ValidationFailed` unless the username has 5 to 24 characters.
pub fn username(username: &str) -> Result<(), AccountError> {
    if within(username, USERNAME_MIN, USERNAME_MAX) {
        Ok(())
    } else {
        Err(AccountError::ValidationFailed(format!(
            "the username needs a length between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )))
    }
}

/// # Errors
/// `ValidationFailed` unless the name has 2 to 99 characters.
pub fn name(name: &str) -> Result<(), AccountError> {
    if within(name, NAME_MIN, NAME_MAX) {
        Ok(())
    } else {
        Err(AccountError::ValidationFailed(format!(
            "the name needs a length between {NAME_MIN} and {NAME_MAX} characters"
        )))
    }
}

/// # Errors
/// `ValidationFailed` unless the whole value matches the mail grammar.
pub fn mail(mail: &str) -> Result<(), AccountError> {
    if Regex::new(MAIL_PATTERN).is_ok_and(|re| re.is_match(mail)) {
        Ok(())
    } else {
        Err(AccountError::ValidationFailed("not valid mail".to_string()))
    }
}

/// Length first, then the confirmation.
///
/// # Errors
/// `ValidationFailed` unless the password has 9 to 999 characters and equals
/// `confirm_password` byte for byte.
pub fn password(password: &str, confirm_password: &str) -> Result<(), AccountError> {
    if !within(password, PASSWORD_MIN, PASSWORD_MAX) {
        return Err(AccountError::ValidationFailed(format!(
            "the password needs a length between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
        )));
    }

    if password.as_bytes() != confirm_password.as_bytes() {
        return Err(AccountError::ValidationFailed(
            "the password doesn't match with confirm password".to_string(),
        ));
    }

    Ok(())
}
