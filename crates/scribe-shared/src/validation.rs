use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Usernames double as profile URL slugs.
    /// Letters, digits and `.@+-_` only.
    /// - Valid: "leo", "anna.k", "user+blog@home", "ivan_99"
    /// - Invalid: "", "two words", "slash/name", "semi;colon"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[\w.@+-]+$").unwrap();

    /// Category slugs: latin letters, digits, hyphen and underscore.
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap();
}
