use anyhow::{Context, Result, bail};
use colored::Colorize;
use log::debug;
use std::fs;
use std::io::{BufRead, Write};
use std::process::Command;

/// Line that ends inline code entry.
pub const END_OF_BLOCK: &str = ".";

/// How multi-line code is collected from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeInput {
    /// Lines typed at the prompt, finished by [`END_OF_BLOCK`].
    Inline,
    /// An external editor command run on a temporary file.
    Editor(String),
}

/// Line-oriented prompts over any reader/writer pair.
///
/// Every `ask*` method returns `Ok(None)` once input is exhausted so the
/// caller can wind down instead of looping on EOF.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Prints `message` and reads one line.
    pub fn ask(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{} {} ", "?".green().bold(), message.bold())?;
        self.output.flush()?;
        self.read_line()
    }

    /// Yes/no question; an empty answer picks `default`.
    pub fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        loop {
            let Some(answer) = self.ask(&format!("{message} {hint}"))? else {
                return Ok(None);
            };
            match answer.trim().to_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    /// Reads lines until one equal to [`END_OF_BLOCK`] or end of input.
    /// Returns `None` only when input was already exhausted.
    pub fn ask_block(&mut self, message: &str) -> Result<Option<String>> {
        writeln!(
            self.output,
            "{} {} {}",
            "?".green().bold(),
            message.bold(),
            format!("(finish with a line containing only '{END_OF_BLOCK}')").dimmed()
        )?;
        self.output.flush()?;

        let mut lines = Vec::new();
        loop {
            match self.read_line()? {
                Some(line) if line == END_OF_BLOCK => break,
                Some(line) => lines.push(line),
                None if lines.is_empty() => return Ok(None),
                None => break,
            }
        }
        Ok(Some(lines.join("\n")))
    }

    /// Collects code either inline or through an external editor seeded
    /// with `initial`.
    pub fn ask_code(
        &mut self,
        message: &str,
        mode: &CodeInput,
        initial: &str,
    ) -> Result<Option<String>> {
        match mode {
            CodeInput::Inline => self.ask_block(message),
            CodeInput::Editor(editor) => {
                writeln!(
                    self.output,
                    "{} {} (opening {editor})",
                    "?".green().bold(),
                    message.bold()
                )?;
                self.output.flush()?;
                edit_in_editor(editor, initial).map(Some)
            }
        }
    }
}

/// Runs `editor` on a temporary file holding `initial` and returns what the
/// user saved, without the trailing newline editors tend to add.
pub fn edit_in_editor(editor: &str, initial: &str) -> Result<String> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("Editor command is empty");
    };

    let file = tempfile::Builder::new()
        .prefix("snipman-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create temporary file for editor")?;
    fs::write(file.path(), initial).context("Failed to seed editor file")?;

    debug!("Launching editor {} on {}", editor, file.path().display());
    let status = Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()
        .with_context(|| format!("Could not launch editor `{editor}`"))?;
    if !status.success() {
        bail!("Editor `{editor}` exited with {status}");
    }

    let mut content = fs::read_to_string(file.path()).context("Failed to read edited code")?;
    let trimmed_len = content.trim_end_matches(['\n', '\r']).len();
    content.truncate(trimmed_len);
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn ask_strips_line_endings() {
        let mut p = prompter("hello world\r\nnext\n");
        assert_eq!(p.ask("Title:").unwrap().as_deref(), Some("hello world"));
        assert_eq!(p.ask("Title:").unwrap().as_deref(), Some("next"));
        assert_eq!(p.ask("Title:").unwrap(), None);
    }

    #[test]
    fn confirm_uses_default_and_retries() {
        let mut p = prompter("\nmaybe\nYES\n");
        assert_eq!(p.confirm("Sure?", false).unwrap(), Some(false));
        assert_eq!(p.confirm("Sure?", false).unwrap(), Some(true));

        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("Please answer y or n."));
    }

    #[test]
    fn block_ends_at_terminator_or_eof() {
        let mut p = prompter("fn main() {\n    body();\n}\n.\nlast line");
        assert_eq!(
            p.ask_block("Code:").unwrap().as_deref(),
            Some("fn main() {\n    body();\n}")
        );
        assert_eq!(p.ask_block("Code:").unwrap().as_deref(), Some("last line"));
        assert_eq!(p.ask_block("Code:").unwrap(), None);
    }

    #[test]
    fn empty_block_is_empty_string() {
        let mut p = prompter(".\n");
        assert_eq!(p.ask_block("Code:").unwrap().as_deref(), Some(""));
    }

    #[cfg(unix)]
    #[test]
    fn editor_output_is_read_back() {
        // `true` leaves the seeded file alone, so the seed comes back.
        let code = edit_in_editor("true", "let x = 1;\n").unwrap();
        assert_eq!(code, "let x = 1;");
    }

    #[test]
    fn empty_editor_command_fails() {
        assert!(edit_in_editor("   ", "").is_err());
    }
}
