//! Input validation for registration and login payloads.
//!
//! Fields arrive as optional strings so a missing field produces a readable
//! message instead of a deserialization failure. Validation stops at the
//! first failing field, in declaration order.

use thiserror::Error;

/// Minimum password length (characters, after trimming).
pub const PASSWORD_MIN_LEN: usize = 6;
/// Maximum password length (characters, after trimming).
pub const PASSWORD_MAX_LEN: usize = 12;

/// The first failing field's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Validated registration input. All fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validated login input. All fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Validate a registration payload.
pub fn validate_signup(
    name: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<SignupInput, ValidationError> {
    let name = required(name, "Name is required.")?;
    let email = validate_email(email)?;
    let password = required(password, "Password is required")?;

    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(ValidationError(format!(
            "Password must have at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(ValidationError(format!(
            "Password can not exceed {PASSWORD_MAX_LEN} characters"
        )));
    }

    Ok(SignupInput {
        name,
        email,
        password,
    })
}

/// Validate a login payload. No length bounds apply to the password so that
/// every wrong secret fails the same way at the credential check.
pub fn validate_login(
    email: Option<&str>,
    password: Option<&str>,
) -> Result<LoginInput, ValidationError> {
    let email = validate_email(email)?;
    let password = required(password, "Password is required")?;
    Ok(LoginInput { email, password })
}

fn required(value: Option<&str>, message: &str) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError(message.to_string())),
    }
}

fn validate_email(value: Option<&str>) -> Result<String, ValidationError> {
    let email = required(value, "Email is required")?;
    if is_email_shape(&email) {
        Ok(email)
    } else {
        Err(ValidationError("Invalid Email Address".to_string()))
    }
}

/// `local@domain.tld` in plain ASCII.
///
/// The local part uses letters, digits and `_ ' + - .`, does not start with a
/// dot, has no `..` and ends in a letter, digit, `_`, `+` or `-`. Domain labels
/// start with a letter or digit and continue with letters, digits or `-`; the
/// top-level label is at least two letters.
pub fn is_email_shape(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    is_local_part(local) && is_domain(domain)
}

fn is_local_part(local: &str) -> bool {
    let Some(last) = local.chars().last() else {
        return false;
    };
    !local.starts_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_'+-.".contains(c))
        && (last.is_ascii_alphanumeric() || "_+-".contains(last))
}

fn is_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };
    !rest.is_empty()
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
        && rest.iter().all(|label| {
            label.starts_with(|c: char| c.is_ascii_alphanumeric())
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
