// Text Signals
// Pattern detections shared by feature scoring and indicator generation.
// Every detection is a single linear scan over the text.

use regex::Regex;
use std::sync::OnceLock;

fn capitalization_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\p{Lu}\p{Ll}+").expect("capitalization regex"))
}

fn official_terms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)official|government|certificate|license|permit|authority|ministry|department|policy|circular|announcement|budget",
        )
        .expect("official terms regex")
    })
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b\d{1,2}/\d{1,2}/\d{4}\b|\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}(?:st|nd|rd|th)?\s+(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?,?\s+\d{4}\b",
        )
        .expect("date regex")
    })
}

fn structural_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)subject|reference|dear|sincerely|regards|paragraph|section|article")
            .expect("structural regex")
    })
}

fn suspicious_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)urgent|immediately|scam|fake|click here|suspicious|free money|lottery|claim your prize|whatsapp|forward this message|act now|\blol\b",
        )
        .expect("suspicious regex")
    })
}

fn whitespace_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{3,}").expect("whitespace regex"))
}

/// Boolean and count signals derived once per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextSignals {
    /// Length in characters (Unicode scalar values).
    pub char_len: usize,
    pub is_blank: bool,
    pub has_numbers: bool,
    pub has_official_terms: bool,
    pub has_date: bool,
    pub has_proper_capitalization: bool,
    pub has_structural_elements: bool,
    pub has_suspicious_patterns: bool,
    pub has_excessive_whitespace: bool,
    /// Number of `.`, `!` and `?` characters.
    pub sentence_delimiters: usize,
}

impl TextSignals {
    pub fn detect(text: &str) -> Self {
        let mut char_len = 0usize;
        let mut sentence_delimiters = 0usize;
        let mut has_numbers = false;
        for c in text.chars() {
            char_len += 1;
            if matches!(c, '.' | '!' | '?') {
                sentence_delimiters += 1;
            }
            if c.is_ascii_digit() {
                has_numbers = true;
            }
        }

        Self {
            char_len,
            is_blank: text.trim().is_empty(),
            has_numbers,
            has_official_terms: official_terms_re().is_match(text),
            has_date: date_re().is_match(text),
            has_proper_capitalization: capitalization_re().is_match(text),
            has_structural_elements: structural_re().is_match(text),
            has_suspicious_patterns: suspicious_re().is_match(text),
            has_excessive_whitespace: whitespace_run_re().is_match(text),
            sentence_delimiters,
        }
    }

    /// More than two pieces when split on sentence delimiters.
    pub fn has_multiple_sentences(&self) -> bool {
        self.sentence_delimiters >= 2
    }
}
