use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

pub struct Stage {
    pub name: &'static str,
    pattern: Regex,
}

impl Stage {
    fn new(name: &'static str, pattern: &str) -> Stage {
        Stage {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    pub fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(line, "")
    }
}

lazy_static! {
    static ref STAGES: Vec<Stage> = vec![
        // heading, quote and ordered list markers, e.g. "## ", "> ", "> 1. "
        Stage::new("markers", r"^\s*(?:(?:#+|>|[0-9]+\.)\s+)+"),
        Stage::new("images", r"!\[[^\]]*\]\([^)]*\)"),
        Stage::new("html", r"</?[^>]*>"),
        Stage::new("links", r"\(https?://[^)]*\)"),
    ];
}

/// Removes markdown syntax that should not count as prose.
///
/// The stages run in order and each one removes every match from the line.
pub struct LineSanitizer {
    stages: &'static [Stage],
}

impl Default for LineSanitizer {
    fn default() -> Self {
        LineSanitizer {
            stages: STAGES.as_slice(),
        }
    }
}

impl LineSanitizer {
    pub fn stages(&self) -> &[Stage] {
        self.stages
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn sanitize(&self, line: &str) -> String {
        let mut line = line.to_string();
        for stage in self.stages {
            line = stage.apply(&line).into_owned();
        }
        line
    }

    pub fn count_words(&self, line: &str) -> usize {
        self.sanitize(line).split_whitespace().count()
    }
}
