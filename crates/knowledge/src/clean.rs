//! Answer post-processing for text returned by network sources.

use regex_lite::Regex;
use std::sync::LazyLock;

static CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").expect("citation regex"));

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    // last, so "&amp;lt;" decodes to "&lt;" and not "<"
    ("&amp;", "&"),
];

/// Strip citation markers, decode common entities and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let mut out = CITATION.replace_all(text, "").into_owned();
    for (entity, plain) in ENTITIES {
        out = out.replace(entity, plain);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
