//! Abstract boundary detection.
//!
//! Academic PDFs vary wildly in formatting, so the locator is a layered
//! heuristic rather than a structural parser. The explicit "ABSTRACT" marker
//! is the strongest signal; a configurable set of stop headings bounds the
//! span from below; hard word-count caps guarantee a bounded result even when
//! a document carries no structural markers at all.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default cap on the number of whitespace-delimited words returned when no
/// stop heading bounds the abstract. Abstracts are conventionally measured in
/// words, so a word cap keeps the result roughly uniform regardless of
/// formatting density.
pub const DEFAULT_WORD_CAP: usize = 300;

/// The "ABSTRACT" marker. Case-insensitive and tolerant of whitespace
/// inserted between letters ("A B S T R A C T" is a common artifact of
/// letter-spaced headings in PDF text layers). Deliberately NOT line-anchored:
/// some documents put the abstract body on the same line as the marker.
static ABSTRACT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bA\s*B\s*S\s*T\s*R\s*A\s*C\s*T\b").unwrap());

/// Blank-line paragraph boundary (two newlines with optional whitespace
/// between them).
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// A single stop-heading rule.
///
/// Stop headings mark the end of the abstract search window. Each rule is
/// data, not code, so deployments can extend the set when real-world
/// documents introduce new heading synonyms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingRule {
    /// Human-readable name, used in logs.
    pub label: String,
    /// Regex body matching the heading text itself (compiled with `(?im)`).
    pub pattern: String,
    /// Require the match to start at the beginning of a line. This is what
    /// keeps "Introduction" appearing mid-sentence from terminating the
    /// abstract.
    #[serde(default = "default_true")]
    pub line_anchored: bool,
    /// Require the rest of the line to be empty apart from optional `:`/`-`
    /// punctuation. Keywords-style headings disable this so that
    /// "Keywords: a, b, c" still matches.
    #[serde(default = "default_true")]
    pub consumes_line: bool,
}

fn default_true() -> bool {
    true
}

impl HeadingRule {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
            line_anchored: true,
            consumes_line: true,
        }
    }

    /// Allow trailing label text on the heading line.
    pub fn with_trailing_text(mut self) -> Self {
        self.consumes_line = false;
        self
    }

    fn compile(&self) -> Result<Regex, regex::Error> {
        let mut source = String::from("(?im)");
        if self.line_anchored {
            source.push('^');
        }
        source.push_str("(?:");
        source.push_str(&self.pattern);
        source.push(')');
        if self.consumes_line {
            source.push_str(r"\s*[:\-]?\s*$");
        } else {
            source.push_str(r"\s*[:\-]?\s*.*$");
        }
        Regex::new(&source)
    }
}

/// The default stop-heading set: English plus the Indonesian synonyms the
/// upstream document corpus needs (Kata Kunci, Latar Belakang, Bab 1).
///
/// "Notation" and "Background" are kept as terminators even though they are
/// not always later than the abstract in document order. Known heuristic
/// limitation, preserved because downstream consumers depend on the current
/// output shape.
pub fn default_stop_headings() -> Vec<HeadingRule> {
    vec![
        HeadingRule::new("Keywords", r"Keywords|Kata\s*Kunci").with_trailing_text(),
        HeadingRule::new(
            "Introduction",
            r"Introduction|Latar\s*Belakang|Chapter\s*1|Bab\s*1|(?:Chapter|Bab)?\s*(?:1|I)\.?\s+(?:Introduction|Latar\s*Belakang)",
        ),
        HeadingRule::new("Notation", r"Notation"),
        HeadingRule::new("Background", r"Background"),
    ]
}

/// Locator tunables.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Word cap applied when no stop heading bounds the span.
    pub word_cap: usize,
    /// Ordered stop-heading rules. When several rules match, the earliest
    /// match in the text wins; on equal offsets the rule listed first wins.
    pub stop_headings: Vec<HeadingRule>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            word_cap: DEFAULT_WORD_CAP,
            stop_headings: default_stop_headings(),
        }
    }
}

/// Compiled abstract locator.
pub struct AbstractLocator {
    word_cap: usize,
    rules: Vec<(HeadingRule, Regex)>,
}

impl AbstractLocator {
    /// Compile the configured stop-heading rules. Fails only if a
    /// user-supplied pattern is not a valid regex.
    pub fn new(config: &LocatorConfig) -> Result<Self, regex::Error> {
        let rules = config
            .stop_headings
            .iter()
            .map(|rule| rule.compile().map(|re| (rule.clone(), re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            word_cap: config.word_cap,
            rules,
        })
    }

    /// Return the best-guess abstract substring of `text`.
    ///
    /// Branches, in order:
    /// 1. "ABSTRACT" marker found: the span runs from the end of the marker
    ///    to the earliest stop heading after it, or caps at `word_cap` words
    ///    when no stop heading follows.
    /// 2. No marker but a stop heading exists: the last blank-line-separated
    ///    paragraph before the heading, or the last `word_cap` words of the
    ///    prefix when it has no paragraph break.
    /// 3. Neither found: the first `word_cap` words of the whole text.
    ///
    /// Total over all inputs; returns an empty string only for (effectively)
    /// empty input.
    pub fn locate(&self, text: &str) -> String {
        if let Some(marker) = ABSTRACT_MARKER.find(text) {
            let after = &text[marker.end()..];
            match self.earliest_stop(after) {
                Some((rule, offset)) => {
                    debug!(stop = %rule.label, "abstract bounded by stop heading");
                    after[..offset].trim().to_string()
                }
                None => first_words(after, self.word_cap),
            }
        } else if let Some((rule, offset)) = self.earliest_stop(text) {
            debug!(stop = %rule.label, "no marker, using text before stop heading");
            let prefix = text[..offset].trim_end();
            match last_paragraph_start(prefix) {
                Some(start) => prefix[start..].trim().to_string(),
                None => last_words(prefix, self.word_cap),
            }
        } else {
            first_words(text, self.word_cap)
        }
    }

    /// Earliest stop-heading match in `text`, as (rule, match start offset).
    /// Iteration order breaks ties, so the first configured rule wins when
    /// two rules match at the same offset.
    fn earliest_stop<'a>(&'a self, text: &str) -> Option<(&'a HeadingRule, usize)> {
        let mut earliest: Option<(&HeadingRule, usize)> = None;
        for (rule, re) in &self.rules {
            if let Some(m) = re.find(text) {
                match earliest {
                    Some((_, offset)) if offset <= m.start() => {}
                    _ => earliest = Some((rule, m.start())),
                }
            }
        }
        earliest
    }
}

impl Default for AbstractLocator {
    fn default() -> Self {
        // The built-in rules are statically known to compile.
        Self::new(&LocatorConfig::default()).unwrap()
    }
}

fn first_words(text: &str, cap: usize) -> String {
    text.split_whitespace().take(cap).collect::<Vec<_>>().join(" ")
}

fn last_words(text: &str, cap: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    words[words.len().saturating_sub(cap)..].join(" ")
}

/// Byte offset just past the last blank-line boundary in `text`, if any.
fn last_paragraph_start(text: &str) -> Option<usize> {
    PARAGRAPH_BREAK.find_iter(text).last().map(|m| m.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(text: &str) -> String {
        AbstractLocator::default().locate(text)
    }

    // =========================================================================
    // Marker + stop heading
    // =========================================================================

    #[test]
    fn test_marker_bounded_by_keywords() {
        let text = "ABSTRACT\nThis is the abstract.\nKeywords: a, b\nIntroduction\nBody text.";
        assert_eq!(locate(text), "This is the abstract.");
    }

    #[test]
    fn test_marker_bounded_by_introduction() {
        let text = "Title\nABSTRACT\nShort abstract body.\nIntroduction\nThe rest.";
        assert_eq!(locate(text), "Short abstract body.");
    }

    #[test]
    fn test_marker_letter_spaced() {
        let text = "A B S T R A C T\nSpaced marker body.\nKeywords: x\n";
        assert_eq!(locate(text), "Spaced marker body.");
    }

    #[test]
    fn test_marker_case_insensitive_same_line() {
        // The marker is not line-anchored: the body may follow on the same line.
        let text = "Abstract This paper studies things.\nIntroduction\nMore.";
        assert_eq!(locate(text), "This paper studies things.");
    }

    #[test]
    fn test_numbered_introduction_heading() {
        let text = "ABSTRACT\nBody of the abstract.\n1. Introduction\nFirst section.";
        assert_eq!(locate(text), "Body of the abstract.");
    }

    #[test]
    fn test_indonesian_stop_heading() {
        let text = "ABSTRACT\nRingkasan penelitian.\nKata Kunci: energi\n";
        assert_eq!(locate(text), "Ringkasan penelitian.");
    }

    #[test]
    fn test_mid_sentence_heading_does_not_terminate() {
        // "Introduction" inside a sentence must not end the abstract; the
        // rules are line-anchored and line-consuming.
        let text =
            "ABSTRACT\nWe give an Introduction to the method here.\nKeywords: m\ntail";
        assert_eq!(locate(text), "We give an Introduction to the method here.");
    }

    #[test]
    fn test_earliest_stop_heading_wins() {
        let text = "ABSTRACT\nbody\nBackground\nmore\nKeywords: k\n";
        assert_eq!(locate(text), "body");
    }

    // =========================================================================
    // Marker without stop heading
    // =========================================================================

    #[test]
    fn test_marker_no_stop_caps_words() {
        let words: Vec<String> = (0..400).map(|i| format!("w{i}")).collect();
        let text = format!("ABSTRACT\n{}", words.join(" "));
        let result = locate(&text);
        assert_eq!(result.split_whitespace().count(), 300);
        assert!(result.starts_with("w0 w1"));
        assert!(result.ends_with("w299"));
    }

    // =========================================================================
    // No marker
    // =========================================================================

    #[test]
    fn test_no_marker_last_paragraph_before_stop() {
        // No marker anywhere (the word "abstract" itself would count as one),
        // so the last paragraph before the stop heading is taken.
        let text = "Title and authors\n\nThis paragraph summarizes the work.\nIt has two lines.\nIntroduction\nBody.";
        assert_eq!(
            locate(text),
            "This paragraph summarizes the work.\nIt has two lines."
        );
    }

    #[test]
    fn test_no_marker_no_paragraph_break_takes_last_words() {
        let words: Vec<String> = (0..350).map(|i| format!("w{i}")).collect();
        let text = format!("{}\nIntroduction\nBody.", words.join(" "));
        let result = locate(&text);
        assert_eq!(result.split_whitespace().count(), 300);
        assert!(result.ends_with("w349"));
        assert!(result.starts_with("w50"));
    }

    #[test]
    fn test_no_marker_no_stop_takes_first_words() {
        let words: Vec<String> = (0..320).map(|i| format!("w{i}")).collect();
        let text = words.join("  \n ");
        let result = locate(&text);
        assert_eq!(result.split_whitespace().count(), 300);
        // Joined by single spaces regardless of input whitespace.
        assert!(result.starts_with("w0 w1 w2"));
    }

    #[test]
    fn test_short_text_returned_whole() {
        assert_eq!(locate("just a few words"), "just a few words");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(locate(""), "");
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        let text = "ABSTRAK — penelitian\nABSTRACT\nRésumé of the étude.\nKeywords: é\n";
        assert_eq!(locate(text), "Résumé of the étude.");
    }

    // =========================================================================
    // Configurability
    // =========================================================================

    #[test]
    fn test_custom_stop_heading_rule() {
        let mut config = LocatorConfig::default();
        config
            .stop_headings
            .push(HeadingRule::new("Methods", r"Methods|Metode"));
        let locator = AbstractLocator::new(&config).unwrap();
        let text = "ABSTRACT\nbounded by a custom rule\nMethods\nprotocol";
        assert_eq!(locator.locate(text), "bounded by a custom rule");
    }

    #[test]
    fn test_invalid_custom_pattern_is_an_error() {
        let config = LocatorConfig {
            word_cap: DEFAULT_WORD_CAP,
            stop_headings: vec![HeadingRule::new("Broken", r"(unclosed")],
        };
        assert!(AbstractLocator::new(&config).is_err());
    }

    #[test]
    fn test_word_cap_is_tunable() {
        let config = LocatorConfig {
            word_cap: 5,
            stop_headings: default_stop_headings(),
        };
        let locator = AbstractLocator::new(&config).unwrap();
        assert_eq!(
            locator.locate("one two three four five six seven"),
            "one two three four five"
        );
    }
}
