use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use spdlog::info;

// Words kept lowercase unless they start the title
const SMALL_WORDS: [&str; 6] = ["a", "an", "of", "on", "the", "to"];

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn to_title(raw: &str) -> String {
    let words: Vec<String> = raw.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if i != 0 && SMALL_WORDS.contains(&word) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect();

    words.join(" ")
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lowercase, ascii-only, hyphen separated version of `raw`.
///
/// Leading or trailing spaces are not trimmed and end up as hyphens.
pub fn slugify(raw: &str) -> String {
    lazy_static! {
        static ref SPACES_REGEX: Regex = Regex::new(r" +").unwrap();
    }

    info!("generating slug");
    let mut text = String::new();
    // unidecode ends syllables such as "Ri " with a space, only kept between two of them
    let mut pending_space = false;

    for c in raw.chars() {
        if c == ' ' {
            pending_space = false;
            text.push(' ');
        } else if c.is_ascii() {
            if !is_slug_char(c) {
                continue;
            }
            if pending_space {
                text.push(' ');
                pending_space = false;
            }
            text.push(c.to_ascii_lowercase());
        } else {
            let translit = unidecode::unidecode_char(c);
            let word: String = translit.chars()
                .filter(|&t| is_slug_char(t))
                .map(|t| t.to_ascii_lowercase())
                .collect();
            if word.is_empty() {
                continue;
            }
            if pending_space {
                text.push(' ');
            }
            text.push_str(&word);
            pending_space = translit.ends_with(' ');
        }
    }

    SPACES_REGEX.replace_all(&text, "-").to_string()
}

pub fn format_date_time(date_time: &NaiveDateTime) -> String {
    date_time.format("%Y-%m-%d %H:%M:%S").to_string()
}
