use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::info;

use crate::sanitizer::LineSanitizer;

pub struct ScanResult {
    pub lines: Vec<String>,
    pub word_count: usize,
}

/// Tracks whether the scanner is inside a fenced code block.
#[derive(Default)]
pub struct CodeFence {
    inside: bool,
}

impl CodeFence {
    /// Returns true when the line should be left out of the word count,
    /// either because it is a fence marker or because it is inside a block.
    pub fn skip(&mut self, line: &str) -> bool {
        lazy_static! {
            static ref FENCE_REGEX: Regex = Regex::new(r"```.*").unwrap();
        }

        if FENCE_REGEX.is_match(line) {
            self.inside = !self.inside;
            return true;
        }
        self.inside
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }
}

#[derive(Default)]
pub struct WordCounter {
    fence: CodeFence,
    sanitizer: LineSanitizer,
    word_count: usize,
}

impl WordCounter {
    pub fn add_line(&mut self, line: &str) {
        if self.fence.skip(line) {
            return;
        }
        self.word_count += self.sanitizer.count_words(line);
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

pub fn scan_reader<R: BufRead>(reader: R) -> io::Result<ScanResult> {
    let mut counter = WordCounter::default();
    let mut lines = vec![];

    for line in reader.lines() {
        let line = line?;
        counter.add_line(&line);
        lines.push(line);
    }

    Ok(ScanResult {
        lines,
        word_count: counter.word_count(),
    })
}

pub fn scan_file(path: &Path) -> io::Result<ScanResult> {
    info!("begin parsing markdown");
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening markdown file {}: {}", path.display(), e))),
    };

    let result = match scan_reader(BufReader::new(file)) {
        Ok(result) => result,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error reading markdown file {}: {}", path.display(), e))),
    };

    info!("finished parsing raw blog material");
    info!("final word count: {}", result.word_count);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::test_data::DRAFT_DATA;

    use super::*;

    fn count(text: &str) -> usize {
        scan_reader(text.as_bytes()).unwrap().word_count
    }

    #[test]
    fn test_code_fence_toggle() {
        let mut fence = CodeFence::default();
        assert!(!fence.skip("plain text"));
        assert!(fence.skip("```rust"));
        assert!(fence.is_inside());
        assert!(fence.skip("let x = 1;"));
        assert!(fence.skip("```"));
        assert!(!fence.is_inside());
        assert!(!fence.skip("back to prose"));
    }

    #[test]
    fn test_fenced_lines_not_counted() {
        let text = "one two\n```\nfn main() { println!(\"many words in here\"); }\n# not a heading\n```\nthree";
        assert_eq!(count(text), 3);
    }

    #[test]
    fn test_fence_line_never_counted() {
        assert_eq!(count("```"), 0);
        assert_eq!(count("```python"), 0);
        // unterminated block swallows the rest of the file
        assert_eq!(count("intro\n```\nnever counted\nstill code"), 1);
    }

    #[test]
    fn test_fence_anywhere_in_line() {
        let mut fence = CodeFence::default();
        assert!(fence.skip("text ```inline``` more"));
        assert!(fence.is_inside());
        assert_eq!(count("text ```inline``` more"), 0);
        assert_eq!(count("text ```inline``` more
hidden words
```
shown"), 1);
    }

    #[test]
    fn test_markdown_syntax_matches_plain_text() {
        assert_eq!(count("# Hello World"), count("Hello World"));
        assert_eq!(count("> Hello World"), 2);
        assert_eq!(count("3. Hello World"), 2);
    }

    #[test]
    fn test_scan_keeps_lines() {
        let result = scan_reader(DRAFT_DATA.as_bytes()).unwrap();
        let expected: Vec<&str> = DRAFT_DATA.lines().collect();
        assert_eq!(result.lines, expected);
    }

    #[test]
    fn test_scan_draft() {
        let result = scan_reader(DRAFT_DATA.as_bytes()).unwrap();
        assert_eq!(result.word_count, 31);
    }

    #[test]
    fn test_scan_crlf() {
        let result = scan_reader("# Title\r\nsome text\r\n".as_bytes()).unwrap();
        assert_eq!(result.lines, ["# Title", "some text"]);
        assert_eq!(result.word_count, 3);
    }

    #[test]
    fn test_scan_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DRAFT_DATA.as_bytes()).unwrap();
        let result = scan_file(file.path()).unwrap();
        assert_eq!(result.word_count, 31);
        assert_eq!(result.lines.len(), DRAFT_DATA.lines().count());
    }

    #[test]
    fn test_scan_missing_file() {
        let err = scan_file(Path::new("/does/not/exist.md")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/does/not/exist.md"));
    }
}
