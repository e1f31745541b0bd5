use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Characters that satisfy the "special character" password rule.
pub const PASSWORD_SPECIALS: &str = "!@#$%&*?.,_:<>\"|-";

const MIN_NAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("full name is required")]
    NameMissing,
    #[error("full name must be at least {} characters", MIN_NAME_LEN)]
    NameTooShort,
    #[error("email is required")]
    EmailMissing,
    #[error("invalid email address")]
    EmailInvalid,
    #[error("password is required")]
    PasswordMissing,
    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("password needs at least one uppercase letter")]
    PasswordNoUppercase,
    #[error("password needs at least one lowercase letter")]
    PasswordNoLowercase,
    #[error("password needs at least one digit")]
    PasswordNoDigit,
    #[error("password needs at least one of {}", PASSWORD_SPECIALS)]
    PasswordNoSpecial,
    #[error("passwords do not match")]
    PasswordMismatch,
}

pub fn validate_registration(
    full_name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    let name = full_name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameMissing);
    }
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort);
    }
    validate_email(email)?;
    validate_password(password)?;
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Sign-in only checks shape; the credentials themselves are checked by the store.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::PasswordMissing);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailMissing);
    }
    if !is_well_formed_email(email) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Local part from the HTML email grammar, then dot-separated domain labels.
static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .ok()
});

fn is_well_formed_email(email: &str) -> bool {
    (*EMAIL_RE).as_ref().is_some_and(|re| re.is_match(email))
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordMissing);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordNoUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::PasswordNoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordNoDigit);
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(ValidationError::PasswordNoSpecial);
    }
    Ok(())
}

/// Friendly name for the header: the email's local part with `.`, `_` and
/// `-` turned into spaces. Falls back to "you".
pub fn greeting_alias(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let alias: String = local
        .chars()
        .map(|c| if matches!(c, '.' | '_' | '-') { ' ' } else { c })
        .collect();
    if alias.trim().is_empty() {
        "you".to_string()
    } else {
        alias
    }
}
