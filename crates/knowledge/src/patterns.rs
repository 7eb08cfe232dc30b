//! Pattern table — ordered regex-to-reply dispatch.
//!
//! Rules are searched (not full-matched) against the lower-cased, trimmed
//! input in declaration order; the first rule that matches wins even when a
//! later rule would match a longer span. Within a rule only the first
//! candidate reply is used; the remaining candidates are kept as written
//! alternatives.

use async_trait::async_trait;
use chrono::{Local, Timelike};
use regex_lite::Regex;
use tracing::error;
use voxbot_config::PatternConfig;
use voxbot_core::error::{Error, SourceError};
use voxbot_core::reply::Reply;
use voxbot_core::source::{KnowledgeSource, SourceAnswer};
use voxbot_core::text::normalize;

/// A match expression and its candidate replies.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: String,
    regex: Regex,
    replies: Vec<Reply>,
}

impl PatternRule {
    /// Compile a rule. Fails on an invalid expression or an empty reply list.
    pub fn new(pattern: &str, replies: Vec<Reply>) -> Result<Self, Error> {
        if replies.is_empty() {
            return Err(Error::Config {
                message: format!("pattern '{pattern}' has no replies"),
            });
        }
        let regex = Regex::new(pattern).map_err(|e| Error::Config {
            message: format!("invalid pattern '{pattern}': {e}"),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            replies,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    /// Whether the expression occurs anywhere in already-normalized input.
    pub fn is_match(&self, normalized: &str) -> bool {
        self.regex.is_match(normalized)
    }

    /// Render the first candidate.
    pub fn respond(&self) -> String {
        self.replies[0].render()
    }
}

/// The outcome of a table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Index of the matching rule in declaration order
    pub index: usize,
    pub reply: String,
}

/// An ordered, immutable list of pattern rules.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// The built-in conversational table.
    pub fn builtin(bot_name: &str) -> Self {
        let rules = builtin_rules(bot_name)
            .into_iter()
            .filter_map(|(pattern, replies)| match PatternRule::new(pattern, replies) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    error!(error = %e, "Skipping built-in pattern");
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// User rules from config, declared ahead of the built-in table.
    pub fn with_overrides(bot_name: &str, overrides: &[PatternConfig]) -> Result<Self, Error> {
        let mut rules = Vec::with_capacity(overrides.len());
        for rule in overrides {
            let replies = rule.replies.iter().map(|r| Reply::literal(r.as_str())).collect();
            rules.push(PatternRule::new(&rule.pattern, replies)?);
        }
        rules.extend(Self::builtin(bot_name).rules);
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First-declared matching rule, rendered.
    pub fn lookup(&self, input: &str) -> Option<PatternMatch> {
        let normalized = normalize(input);
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.is_match(&normalized))
            .map(|(index, rule)| PatternMatch {
                index,
                reply: rule.respond(),
            })
    }
}

#[async_trait]
impl KnowledgeSource for PatternTable {
    fn name(&self) -> &str {
        "patterns"
    }

    async fn query(&self, query: &str) -> Result<SourceAnswer, SourceError> {
        Ok(match self.lookup(query) {
            Some(m) => SourceAnswer::Answer(m.reply),
            None => SourceAnswer::NoAnswer,
        })
    }
}

/// "morning", "afternoon" or "evening" for a 24h hour.
pub fn part_of_day(hour: u32) -> &'static str {
    match hour {
        0..=11 => "morning",
        12..=17 => "afternoon",
        _ => "evening",
    }
}

fn builtin_rules(bot_name: &str) -> Vec<(&'static str, Vec<Reply>)> {
    vec![
        (
            r"\bhello\b|\bhi\b|\bhey\b|\bgreetings\b",
            vec![
                "Hello! How can I help you today?".into(),
                "Hi there! What can I do for you?".into(),
                "Hey! What's on your mind?".into(),
            ],
        ),
        (
            r"\bgood (morning|afternoon|evening)\b",
            vec![Reply::generator(|| {
                format!("Good {}! How are you doing today?", part_of_day(Local::now().hour()))
            })],
        ),
        (
            r"\bhow are you\b|\bhow's it going\b|\bhow are things\b",
            vec![
                "I'm doing great! Thanks for asking.".into(),
                "I'm functioning well, thank you!".into(),
                "All systems operational! How about you?".into(),
            ],
        ),
        (
            r"\bwhat's your name\b|\bwhat is your name\b|\bwho are you\b|\bintroduce yourself\b",
            vec![
                format!("I'm {bot_name}, your personal assistant!").into(),
                "I'm a simple chatbot here to help you.".into(),
            ],
        ),
        (
            r"\bwhat time is it\b|\bcurrent time\b|\bwhat's the time\b",
            vec![
                Reply::generator(|| format!("The current time is {}", Local::now().format("%H:%M:%S"))),
                Reply::generator(|| format!("It's {} right now.", Local::now().format("%I:%M %p"))),
            ],
        ),
        (
            r"\bwhat's the date\b|\bwhat is the date\b|\btoday's date\b|\bwhat day is it\b",
            vec![
                Reply::generator(|| format!("Today's date is {}", Local::now().format("%B %d, %Y"))),
                Reply::generator(|| format!("It's {}", Local::now().format("%A, %B %d, %Y"))),
            ],
        ),
        (
            r"\bhelp\b|\bwhat can you do\b|\bcapabilities\b",
            vec![
                "I can answer simple questions, tell you the time/date, and chat with you!".into(),
                "Try asking me about the time, date, or just have a casual conversation!".into(),
            ],
        ),
        (
            r"\bare you human\b|\bare you real\b",
            vec!["No, I'm an AI - a computer program designed to chat and help you intelligently!".into()],
        ),
        (
            r"\bwhat is ai\b|\bwhat is artificial intelligence\b",
            vec![
                "AI is intelligent machines that can learn and make decisions. \
                 I can understand questions and provide helpful answers!"
                    .into(),
            ],
        ),
        (
            r"\bwhat is machine learning\b",
            vec![
                "Machine learning is a type of AI where computers learn from data \
                 to make predictions without being explicitly programmed."
                    .into(),
            ],
        ),
        (
            r"\bwhat is deep learning\b",
            vec!["Deep learning uses neural networks with many layers to process complex data. It powers modern AI!".into()],
        ),
        (
            r"\bwhat is python\b|\babout python\b",
            vec![
                "Python is a popular programming language known for simplicity and power. \
                 It's used for web development, data science, AI, and more!"
                    .into(),
            ],
        ),
        (
            r"\bhow does the internet work\b",
            vec![
                "The internet connects computers worldwide through networks and protocols. \
                 Data travels as packets between devices using IP addresses."
                    .into(),
            ],
        ),
        (
            r"\bwhat is cloud computing\b",
            vec![
                "Cloud computing means using remote servers on the internet to store \
                 and process data instead of your local computer."
                    .into(),
            ],
        ),
        (
            r"\btell me a joke\b|\bmake me laugh\b",
            vec!["Why do programmers prefer dark mode? Because light attracts bugs!".into()],
        ),
        (
            r"\bthanks\b|\bthank you\b|\bappreciate it\b",
            vec![
                "You're welcome!".into(),
                "Happy to help!".into(),
                "Anytime! Glad I could assist.".into(),
            ],
        ),
        (
            r"\bsorry\b|\bmy apologies\b",
            vec!["No problem at all! Don't worry. How can I assist you?".into()],
        ),
        (
            r"\bgoodbye\b|\bbye\b|\bsee you\b|\bfarewell\b",
            vec![
                "Goodbye! Have a great day!".into(),
                "See you later!".into(),
                "Bye! Take care!".into(),
            ],
        ),
        (
            r"\bhow do i\b.*",
            vec![
                "I'd be happy to help! Can you be more specific about what you need?".into(),
                "That's a good question! Try to be more specific so I can help better.".into(),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        PatternTable::builtin("ChatBot")
    }

    #[test]
    fn greeting_is_case_insensitive() {
        let t = table();
        for input in ["HELLO", "Hello", "hello there friend", "  hey  "] {
            let m = t.lookup(input).unwrap_or_else(|| panic!("no match for {input}"));
            assert_eq!(m.index, 0);
            assert_eq!(m.reply, "Hello! How can I help you today?");
        }
    }

    #[test]
    fn word_boundaries_prevent_false_greetings() {
        // "this" contains "hi", "they" contains "hey"
        assert!(table().lookup("this is they").is_none());
    }

    #[test]
    fn first_declared_rule_wins() {
        // Matches both the greeting and the time rule; greeting is declared first.
        let m = table().lookup("hi, what time is it").unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn precedence_ignores_match_length() {
        let t = PatternTable::new(vec![
            PatternRule::new(r"\bweather\b", vec!["short rule".into()]).unwrap(),
            PatternRule::new(r"what is the weather like in paris", vec!["long rule".into()]).unwrap(),
        ]);
        let m = t.lookup("What is the weather like in Paris").unwrap();
        assert_eq!(m.reply, "short rule");
        assert_eq!(m.index, 0);
    }

    #[test]
    fn first_candidate_only() {
        let t = table();
        for _ in 0..20 {
            assert_eq!(t.lookup("thanks a lot").unwrap().reply, "You're welcome!");
        }
    }

    #[test]
    fn bot_name_is_embedded() {
        let t = PatternTable::builtin("Jarvis");
        assert_eq!(
            t.lookup("who are you?").unwrap().reply,
            "I'm Jarvis, your personal assistant!"
        );
    }

    #[test]
    fn time_generator_format() {
        let reply = table().lookup("what time is it").unwrap().reply;
        let re = Regex::new(r"^The current time is \d{2}:\d{2}:\d{2}$").unwrap();
        assert!(re.is_match(&reply), "unexpected: {reply}");
    }

    #[test]
    fn date_generator_format() {
        let reply = table().lookup("what's the date today").unwrap().reply;
        let re = Regex::new(r"^Today's date is [A-Z][a-z]+ \d{2}, \d{4}$").unwrap();
        assert!(re.is_match(&reply), "unexpected: {reply}");
    }

    #[test]
    fn part_of_day_boundaries() {
        assert_eq!(part_of_day(0), "morning");
        assert_eq!(part_of_day(11), "morning");
        assert_eq!(part_of_day(12), "afternoon");
        assert_eq!(part_of_day(17), "afternoon");
        assert_eq!(part_of_day(18), "evening");
    }

    #[test]
    fn how_do_i_catch_all() {
        let m = table().lookup("how do i bake bread").unwrap();
        assert!(m.reply.starts_with("I'd be happy to help!"));
    }

    #[test]
    fn unknown_input_has_no_match() {
        assert!(table().lookup("what is the capital of mongolia").is_none());
    }

    #[test]
    fn overrides_come_first() {
        let overrides = vec![PatternConfig {
            pattern: r"\bhello\b".into(),
            replies: vec!["Custom hello".into()],
        }];
        let t = PatternTable::with_overrides("ChatBot", &overrides).unwrap();
        assert_eq!(t.len(), table().len() + 1);
        assert_eq!(t.lookup("hello").unwrap().reply, "Custom hello");
        assert_eq!(t.lookup("hi").unwrap().index, 1);
    }

    #[test]
    fn invalid_pattern_rejected() {
        let overrides = vec![PatternConfig {
            pattern: "(unclosed".into(),
            replies: vec!["x".into()],
        }];
        assert!(PatternTable::with_overrides("ChatBot", &overrides).is_err());
    }

    #[test]
    fn rule_without_replies_rejected() {
        assert!(PatternRule::new("x", vec![]).is_err());
    }

    #[tokio::test]
    async fn table_as_knowledge_source() {
        let t = table();
        assert_eq!(t.name(), "patterns");
        assert_eq!(
            t.query("tell me a joke").await.unwrap(),
            SourceAnswer::Answer("Why do programmers prefer dark mode? Because light attracts bugs!".into())
        );
        assert_eq!(t.query("zebra migration").await.unwrap(), SourceAnswer::NoAnswer);
    }
}
