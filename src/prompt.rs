use std::io;
use std::io::{BufRead, ErrorKind, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Prompter<R, W> {
        Prompter { input, output }
    }

    /// Prints `prompt` and reads a single line, without its line terminator.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, format!("No answer given to '{}'", prompt.trim())));
        }

        let len = answer.trim_end_matches(&['\n', '\r'][..]).len();
        answer.truncate(len);
        Ok(answer)
    }

    pub fn ask_or(&mut self, prompt: &str, default: &str) -> io::Result<String> {
        let answer = self.ask(prompt)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(default.to_string());
        }
        Ok(answer.to_string())
    }
}

pub fn stdin_prompter() -> Prompter<io::StdinLock<'static>, io::Stdout> {
    Prompter::new(io::stdin().lock(), io::stdout())
}
