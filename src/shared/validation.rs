use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating phone numbers given at sign-up
    /// Digits, whitespace, `+`, `-` and parentheses, with at least 10 digits
    /// - Valid: "+91 98450 12345", "(080) 2222 3333", "9845012345"
    /// - Invalid: "123456", "phone", "+", "98450 12345 ext 2"
    pub static ref PHONE_REGEX: Regex =
        Regex::new(r"^[\s\-+()]*(?:[0-9][\s\-+()]*){10,}$").unwrap();
}
