//! Signup input validation.
//!
//! Pure character-class checks for email shape and password strength.
//! These guard user input before any store write happens; they are not a
//! substitute for the conditional-write uniqueness enforcement.

/// Characters allowed in an email local-part atom besides alphanumerics.
const EMAIL_LOCAL_SPECIALS: &str = "!#$%&'*+/=?`{|}~^-_";

/// Special characters the password policy accepts.
const PASSWORD_SPECIALS: &str = ".!@#&()\u{2013}[{}]:;',?/*~$^+=<>";

/// Checks that `email` has a plausible mailbox shape.
///
/// Accepted form: dot-separated non-empty atoms of word characters and
/// common specials, an `@`, then at least two dot-separated host labels of
/// alphanumerics and hyphens, ending in an alphabetic top-level domain of
/// 2 to 6 characters.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    if local.is_empty()
        || local
            .split('.')
            .any(|atom| atom.is_empty() || !atom.chars().all(is_email_local_char))
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let Some((tld, hosts)) = labels.split_last() else {
        return false;
    };
    if hosts
        .iter()
        .any(|label| label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
    {
        return false;
    }

    (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Checks the password policy: 8 to 50 characters with at least one digit,
/// one lowercase letter, one uppercase letter and one special character.
pub fn validate_password(password: &str) -> bool {
    let length = password.chars().count();
    if !(8..=50).contains(&length) {
        return false;
    }

    password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

fn is_email_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || EMAIL_LOCAL_SPECIALS.contains(c)
}
