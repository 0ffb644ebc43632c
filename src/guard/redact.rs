use std::sync::LazyLock;

use regex::Regex;

/// Removes sensitive entities from text.
pub trait Redactor: Send + Sync {
    fn redact(&self, text: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRedactor;

impl Redactor for NoopRedactor {
    fn redact(&self, text: &str) -> String {
        text.to_string()
    }
}

static RE_EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").ok());
static RE_PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s])?\(?\d{3}\)?[-.\s]\d{3}[-.\s]\d{4}\b").ok()
});
static RE_DIGITS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b\d{6,}\b").ok());

/// Regex-based redaction of e-mail addresses, phone numbers and long digit runs
/// (account, card and ID numbers).
///
/// Replacements are entity placeholders such as `<EMAIL_ADDRESS>`; redacting an
/// already redacted text is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternRedactor;

fn patterns() -> [(&'static LazyLock<Option<Regex>>, &'static str); 3] {
    [
        (&RE_EMAIL, "<EMAIL_ADDRESS>"),
        (&RE_PHONE, "<PHONE_NUMBER>"),
        (&RE_DIGITS, "<NUMBER>"),
    ]
}

impl Redactor for PatternRedactor {
    fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (pattern, placeholder) in patterns() {
            if let Some(re) = &**pattern {
                out = re.replace_all(&out, placeholder).into_owned();
            }
        }
        out
    }
}
