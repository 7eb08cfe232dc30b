//! Control words recognized before response selection: exit and help.

use regex_lite::Regex;
use voxbot_core::error::{Error, Result};
use voxbot_core::text::normalize;

/// The word that asks for the capabilities text.
pub const HELP_WORD: &str = "help";

/// Words that end the session when they appear as whole words anywhere in
/// the input.
#[derive(Debug, Clone)]
pub struct ExitVocabulary {
    words: Vec<String>,
    regex: Regex,
}

impl ExitVocabulary {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let words: Vec<String> = words
            .iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(Error::Config {
                message: "exit vocabulary must not be empty".into(),
            });
        }

        let alternation = words
            .iter()
            .map(|w| regex_lite::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!(r"\b(?:{alternation})\b")).map_err(|e| Error::Config {
            message: format!("invalid exit vocabulary: {e}"),
        })?;

        Ok(Self { words, regex })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn matches(&self, input: &str) -> bool {
        self.regex.is_match(&normalize(input))
    }
}

/// Exact, case-insensitive match on the help word.
pub fn is_help(input: &str) -> bool {
    normalize(input) == HELP_WORD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> ExitVocabulary {
        ExitVocabulary::new(&["goodbye", "bye", "exit", "quit", "stop", "end", "close"]).unwrap()
    }

    #[test]
    fn whole_word_anywhere() {
        let v = vocab();
        assert!(v.matches("ok bye now"));
        assert!(v.matches("QUIT"));
        assert!(v.matches("please stop."));
        assert!(v.matches("goodbye!"));
        // punctuation is a word boundary
        assert!(v.matches("close-ish"));
    }

    #[test]
    fn partial_words_do_not_exit() {
        let v = vocab();
        assert!(!v.matches("goodbyeee"));
        assert!(!v.matches("unstoppable"));
        assert!(!v.matches("legendary"));
        assert!(!v.matches("byebye"));
    }

    #[test]
    fn custom_subset() {
        let v = ExitVocabulary::new(&["quit"]).unwrap();
        assert!(v.matches("quit"));
        assert!(!v.matches("bye"));
        assert_eq!(v.words(), ["quit".to_string()]);
    }

    #[test]
    fn empty_vocabulary_rejected() {
        assert!(ExitVocabulary::new::<&str>(&[]).is_err());
        assert!(ExitVocabulary::new(&["  "]).is_err());
    }

    #[test]
    fn help_is_exact() {
        assert!(is_help("help"));
        assert!(is_help("  HELP "));
        assert!(!is_help("help me"));
        assert!(!is_help("can you help"));
    }
}
