/// Input validation utilities shared by the auth and content services.
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const BIO_MAX_LEN: usize = 250;
pub const POST_CONTENT_MAX_LEN: usize = 2000;
pub const COMMENT_CONTENT_MAX_LEN: usize = 500;
pub const TAG_MAX_LEN: usize = 30;

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").expect("hardcoded username regex is invalid - fix source code")
});

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").expect("hardcoded tag regex is invalid - fix source code")
});

/// Validates email format (RFC 5322)
pub fn validate_email(email: &str) -> bool {
    email.validate_email()
}

/// Validates username format: 3-32 characters, alphanumeric and underscore only
pub fn validate_username(username: &str) -> bool {
    username.chars().count() >= USERNAME_MIN_LEN
        && username.chars().count() <= USERNAME_MAX_LEN
        && USERNAME_REGEX.is_match(username)
}

/// Validates password length. Hashing rejects nothing else; stronger policy
/// is enforced client-side.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LEN
}

/// Validates bio length (optional field, max 250 characters)
pub fn validate_bio(bio: &str) -> bool {
    bio.chars().count() <= BIO_MAX_LEN
}

/// Validates post content after trimming: 1-2000 characters
pub fn validate_post_content(content: &str) -> bool {
    let len = content.chars().count();
    len >= 1 && len <= POST_CONTENT_MAX_LEN
}

/// Validates comment content after trimming: 1-500 characters
pub fn validate_comment_content(content: &str) -> bool {
    let len = content.chars().count();
    len >= 1 && len <= COMMENT_CONTENT_MAX_LEN
}

/// Validates a single tag: 1-30 characters, alphanumeric and underscore only
pub fn validate_tag(tag: &str) -> bool {
    let len = tag.chars().count();
    len >= 1 && len <= TAG_MAX_LEN && TAG_REGEX.is_match(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("user+tag@example.co.uk"));
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(!validate_email("invalid-email"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
    }

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("user123"));
        assert!(validate_username("user_name"));
        assert!(validate_username("abc"));
    }

    #[test]
    fn test_validate_username_too_short() {
        assert!(!validate_username("ab"));
    }

    #[test]
    fn test_validate_username_too_long() {
        assert!(!validate_username(&"a".repeat(33)));
    }

    #[test]
    fn test_validate_username_invalid_characters() {
        assert!(!validate_username("user-name"));
        assert!(!validate_username("user.name"));
        assert!(!validate_username("user name"));
        assert!(!validate_username("user@name"));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret"));
        assert!(validate_password("a much longer passphrase"));
        assert!(!validate_password("short"));
        assert!(!validate_password(""));
    }

    #[test]
    fn test_validate_bio() {
        assert!(validate_bio(""));
        assert!(validate_bio("I build things."));
        assert!(validate_bio(&"b".repeat(250)));
        assert!(!validate_bio(&"b".repeat(251)));
    }

    #[test]
    fn test_validate_post_content_bounds() {
        assert!(validate_post_content("x"));
        assert!(validate_post_content(&"x".repeat(2000)));
        assert!(!validate_post_content(""));
        assert!(!validate_post_content(&"x".repeat(2001)));
    }

    #[test]
    fn test_validate_comment_content_bounds() {
        assert!(validate_comment_content("nice"));
        assert!(validate_comment_content(&"x".repeat(500)));
        assert!(!validate_comment_content(""));
        assert!(!validate_comment_content(&"x".repeat(501)));
    }

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("rust"));
        assert!(validate_tag("rust_lang"));
        assert!(validate_tag(&"t".repeat(30)));
        assert!(!validate_tag(""));
        assert!(!validate_tag(&"t".repeat(31)));
        assert!(!validate_tag("no spaces"));
        assert!(!validate_tag("no-hyphens"));
    }
}
