use std::fmt::Write as _;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use spdlog::info;

use crate::prompt::Prompter;
use crate::text_utils::{format_date_time, slugify, to_title};
use crate::word_counter::ScanResult;

pub struct Post {
    pub title: String,
    pub author: String,
    pub slug: String,
    pub timestamp: NaiveDateTime,
    pub word_count: usize,
    pub lines: Vec<String>,
}

/// What the user types in before the post gets written.
#[derive(Debug, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub slug: String,
}

impl Post {
    pub fn new(fields: PostFields, author: &str, timestamp: NaiveDateTime, scan: ScanResult) -> Post {
        Post {
            title: fields.title,
            author: author.to_string(),
            slug: fields.slug,
            timestamp,
            word_count: scan.word_count,
            lines: scan.lines,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.md", self.slug)
    }

    pub fn render_front_matter(&self) -> String {
        let mut buf = String::new();

        let _ = writeln!(&mut buf, "---");
        let _ = writeln!(&mut buf, "title: \"{}\"", self.title);
        let _ = writeln!(&mut buf, "author: {}", self.author);
        let _ = writeln!(&mut buf, "slug: {}", self.slug);
        let _ = writeln!(&mut buf, "date: \"{}\"", format_date_time(&self.timestamp));
        let _ = writeln!(&mut buf, "wcount: {}", self.word_count);
        let _ = writeln!(&mut buf, "---");
        buf
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        info!("generating front matter");
        writer.write_all(self.render_front_matter().as_bytes())?;
        writeln!(writer)?;

        info!("writing data to file");
        for line in &self.lines {
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }

    /// Creates `<posts_dir>/<slug>.md`, replacing any previous file with the same name.
    pub fn write(&self, posts_dir: &Path) -> io::Result<PathBuf> {
        let post_path = posts_dir.join(self.file_name());
        let file = match File::create(&post_path) {
            Ok(file) => file,
            Err(e) => return Err(io::Error::new(e.kind(), format!("Error creating post file {}: {}", post_path.display(), e))),
        };

        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;

        info!("done generating post {}", post_path.display());
        Ok(post_path)
    }
}

fn validate_slug(slug: &str) -> io::Result<()> {
    if slug.is_empty() {
        return Err(io::Error::new(ErrorKind::InvalidInput, "The post slug cannot be empty"));
    }
    if slug.contains('/') || slug.contains('\\') || slug.contains("..") {
        return Err(io::Error::new(ErrorKind::InvalidInput, format!("Invalid post slug: {}", slug)));
    }
    Ok(())
}

pub fn ask_post_fields<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> io::Result<PostFields> {
    let raw_title = prompter.ask("Enter title: ")?;
    let title = to_title(&raw_title);

    let use_default_slug = prompter.ask("Use default slug (Y/n): ")? != "n";
    let slug = if use_default_slug {
        slugify(&raw_title)
    } else {
        prompter.ask("Enter slug: ")?.trim().to_string()
    };

    validate_slug(&slug)?;
    Ok(PostFields { title, slug })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    use crate::test_data::DRAFT_DATA;
    use crate::word_counter::scan_reader;

    use super::*;

    fn sample_post() -> Post {
        let date = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let time = NaiveTime::from_hms_opt(6, 20, 53).unwrap();
        let fields = PostFields {
            title: "Learning Rust the Hard Way".to_string(),
            slug: "learning-rust-the-hard-way".to_string(),
        };
        let scan = scan_reader(DRAFT_DATA.as_bytes()).unwrap();
        Post::new(fields, "Thiago", NaiveDateTime::new(date, time), scan)
    }

    fn ask(answers: &str) -> io::Result<PostFields> {
        let mut prompter = Prompter::new(answers.as_bytes(), io::sink());
        ask_post_fields(&mut prompter)
    }

    #[test]
    fn test_front_matter() {
        let post = sample_post();
        assert_eq!(post.render_front_matter(), r#"---
title: "Learning Rust the Hard Way"
author: Thiago
slug: learning-rust-the-hard-way
date: "2024-02-27 06:20:53"
wcount: 31
---
"#);
    }

    #[test]
    fn test_write_keeps_draft_lines() {
        let dir = TempDir::new().unwrap();
        let post = sample_post();
        let post_path = post.write(dir.path()).unwrap();
        assert_eq!(post_path, dir.path().join("learning-rust-the-hard-way.md"));

        let content = fs::read_to_string(&post_path).unwrap();
        let expected = format!("{}\n{}", post.render_front_matter(), DRAFT_DATA);
        assert_eq!(content, expected);
    }

    #[test]
    fn test_write_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = sample_post().write(&dir.path().join("nope")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_ask_default_slug() {
        let fields = ask("a tale of two cities\n\n").unwrap();
        assert_eq!(fields, PostFields {
            title: "A Tale of Two Cities".to_string(),
            slug: "a-tale-of-two-cities".to_string(),
        });

        let fields = ask("My First Post\nY\n").unwrap();
        assert_eq!(fields.slug, "my-first-post");
    }

    #[test]
    fn test_ask_explicit_slug() {
        let fields = ask("My First Post\nn\n  first  \n").unwrap();
        assert_eq!(fields.title, "My First Post");
        assert_eq!(fields.slug, "first");
    }

    #[test]
    fn test_ask_only_exact_n_asks_slug() {
        let fields = ask("My First Post\nno\n").unwrap();
        assert_eq!(fields.slug, "my-first-post");
    }

    #[test]
    fn test_ask_invalid_slug() {
        assert_eq!(ask("!!!\n\n").err().unwrap().kind(), ErrorKind::InvalidInput);
        assert_eq!(ask("title\nn\n../escape\n").err().unwrap().kind(), ErrorKind::InvalidInput);
    }
}
