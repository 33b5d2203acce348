use crate::config::DigitHandling;
use crate::errors::{CorpusError, CorpusResult};
use deunicode::deunicode;
use regex::Regex;

/// Rule-based cleanup of a raw transcribed speech into lower-case ASCII words.
///
/// The rules run in a fixed order: the structural rules strip boilerplate
/// that the later punctuation rules would otherwise shred into noise tokens.
pub struct TextNormalizer {
    aside_pattern: Regex,
    speaker_pattern: Regex,
    pronouncement_pattern: Regex,
    stray_punctuation_pattern: Regex,
    whitespace_pattern: Regex,
    abbreviations: Vec<(Regex, &'static str)>,
    digit_pattern: Regex,
    digit_replacement: &'static str,
    punctuation_pattern: Regex,
}

impl TextNormalizer {
    pub fn new(digits: DigitHandling) -> Result<Self, regex::Error> {
        let (digit_pattern, digit_replacement) = match digits {
            DigitHandling::Space => (Regex::new(r"\d")?, " "),
            DigitHandling::Remove => (Regex::new(r"\d+")?, ""),
        };

        Ok(TextNormalizer {
            aside_pattern: Regex::new(r"\([^)]*\)")?,
            speaker_pattern: Regex::new(r"[OA] SRA?[\w\s.]+-")?,
            pronouncement_pattern: Regex::new(r"PRONUNCIAMENTO[\sA-Z]+\s")?,
            stray_punctuation_pattern: Regex::new(r#"\s[."]+"#)?,
            whitespace_pattern: Regex::new(r"\s+")?,
            abbreviations: vec![
                (Regex::new(r"(?i)v\.exa\.")?, "v.exa"),
                (Regex::new(r"(?i)art\.")?, "art"),
                (Regex::new(r"(?i)srs?\.")?, "sr"),
                (Regex::new(r"(?i)sras?\.")?, "sr"),
            ],
            digit_pattern,
            digit_replacement,
            punctuation_pattern: Regex::new(r"[[:punct:]]")?,
        })
    }

    /// Normalizes a record's raw text; absent text is rejected rather than
    /// treated as an empty speech.
    pub fn normalize(&self, raw: Option<&str>) -> CorpusResult<String> {
        raw.map(|text| self.clean(text))
            .ok_or(CorpusError::InvalidInput)
    }

    pub fn clean(&self, raw: &str) -> String {
        let mut text = self.aside_pattern.replace_all(raw, "").into_owned();
        text = self.speaker_pattern.replace_all(&text, "").into_owned();
        text = self.pronouncement_pattern.replace_all(&text, "").into_owned();
        text = self.stray_punctuation_pattern.replace_all(&text, " ").into_owned();
        text = self.whitespace_pattern.replace_all(&text, " ").into_owned();

        for (pattern, canonical) in &self.abbreviations {
            text = pattern.replace_all(&text, *canonical).into_owned();
        }

        text = self.strip_digits_and_punctuation(&text);

        // Transliteration can emit ASCII digits and punctuation ("½" -> "1/2").
        text = deunicode(&text);
        text = self.strip_digits_and_punctuation(&text);

        text.make_ascii_lowercase();
        self.whitespace_pattern
            .replace_all(&text, " ")
            .trim()
            .to_string()
    }

    fn strip_digits_and_punctuation(&self, text: &str) -> String {
        let without_digits = self.digit_pattern.replace_all(text, self.digit_replacement);
        self.punctuation_pattern
            .replace_all(&without_digits, " ")
            .into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(DigitHandling::Space).expect("built-in normalization patterns compile")
    }
}
