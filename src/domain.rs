//! Input sanitising for domain names given on the command line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;

// Labels of 1-63 letters, digits or hyphens, then an alphabetic TLD (or an
// IDNA `xn--` TLD), then an optional root dot.
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9\-]{1,63}\.)+([a-zA-Z0-9]{2,63}|xn--[a-zA-Z0-9\-]{1,59})\.?$")
        .expect("domain pattern is valid")
});

/// Converts a possibly Unicode domain to its ASCII (punycode) form.
pub fn normalize(domain: &str) -> Option<String> {
    idna::domain_to_ascii(domain).ok()
}

/// Checks the label structure of an ASCII domain.
pub fn is_valid(domain: &str) -> bool {
    !domain.starts_with('-') && DOMAIN_RE.is_match(domain)
}

/// Normalizes then validates `input`.
pub fn prepare(input: &str) -> Result<String, Error> {
    match normalize(input) {
        Some(ascii) if is_valid(&ascii) => Ok(ascii),
        _ => Err(Error::InvalidDomain(input.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["example.com", "x.org", "www.example.co.uk", "example.com.", "a-b.io"] {
            assert!(is_valid(name), "{} should be valid", name);
        }
    }

    #[test]
    fn rejects_bad_structure() {
        for name in [
            "bad..domain",
            "localhost",
            "-leading.com",
            "example.c",
            "example.xyz123-",
            "under_score.com",
            "",
            ".com",
        ] {
            assert!(!is_valid(name), "{} should be invalid", name);
        }
        let long_label = format!("{}.com", "a".repeat(64));
        assert!(!is_valid(&long_label));
    }

    #[test]
    fn unicode_is_punycoded() {
        assert_eq!(normalize("bücher.de").as_deref(), Some("xn--bcher-kva.de"));
        assert_eq!(prepare("Bücher.DE").unwrap(), "xn--bcher-kva.de");
        assert_eq!(prepare("пример.рф").unwrap(), "xn--e1afmkfd.xn--p1ai");
    }

    #[test]
    fn prepare_rejects_before_any_lookup() {
        assert!(matches!(
            prepare("bad..domain"),
            Err(Error::InvalidDomain(ref d)) if d == "bad..domain"
        ));
    }
}
