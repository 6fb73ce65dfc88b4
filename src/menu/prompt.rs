// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Line based prompts for the menu.

use std::{
    fmt::Display,
    io::{self, BufRead, Write},
};

const RULE_WIDTH: usize = 50;

pub(crate) struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks a question and returns the trimmed answer, or `None` once the
    /// input is closed.
    pub(crate) fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub(crate) fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    pub(crate) fn header(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "\n{}\n{:^width$}\n{}", rule, title, rule, width = RULE_WIDTH)
    }

    pub(crate) fn rule(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))
    }

    pub(crate) fn info(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "[INFO] {}", message)
    }

    pub(crate) fn success(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "[SUCCESS] {}", message)
    }

    pub(crate) fn error(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "[ERROR] {}", message)
    }

    /// Rewrites the current line, used for download progress.
    pub(crate) fn progress(&mut self, status: impl Display) -> io::Result<()> {
        write!(self.output, "\r{}\x1b[K", status)?;
        self.output.flush()
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.output
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use super::*;

    pub(crate) type TestPrompt = Prompt<Cursor<Vec<u8>>, Vec<u8>>;

    /// A prompt answering with `answers`, one per line.
    pub(crate) fn scripted(answers: &[&str]) -> TestPrompt {
        let mut input = answers.join("\n");
        if !answers.is_empty() {
            input.push('\n');
        }
        Prompt::new(Cursor::new(input.into_bytes()), Vec::new())
    }

    pub(crate) fn printed(prompt: &TestPrompt) -> String {
        String::from_utf8_lossy(prompt.output()).into_owned()
    }

    #[test]
    fn answers_are_trimmed() {
        let mut prompt = scripted(&["  42  "]);
        assert_eq!(prompt.ask("ID: ").unwrap(), Some("42".to_string()));
        assert_eq!(printed(&prompt), "ID: ");
    }

    #[test]
    fn closed_input_is_none() {
        let mut prompt = scripted(&[]);
        assert_eq!(prompt.ask("ID: ").unwrap(), None);
    }

    #[test]
    fn header_is_centred() {
        let mut prompt = scripted(&[]);
        prompt.header("MAIN MENU").unwrap();
        let lines: Vec<_> = printed(&prompt).lines().map(str::to_string).collect();
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2].trim(), "MAIN MENU");
        assert_eq!(lines[2].len(), 50);
    }
}
