//! Interactive menu loop
//!
//! The shell only collects input and reports outcomes. Every state change goes
//! through [`SnippetStore`], and the only errors that escape [`Shell::run`]
//! are I/O failures (a store that cannot be written, a closed terminal).

pub mod prompt;

use crate::highlight::Highlighter;
use crate::models::{SnippetStore, SnippetUpdate, parse_id};
use crate::ui::colors::Palette;
use crate::ui::format::{code_header, count_line, snippet_line};
use anyhow::Result;
use colored::Colorize;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use prompt::{CodeInput, Prompter};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    List,
    Edit,
    Delete,
    Search,
    Show,
    DeleteAll,
    Clear,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 9] = [
        MenuAction::Add,
        MenuAction::List,
        MenuAction::Edit,
        MenuAction::Delete,
        MenuAction::Search,
        MenuAction::Show,
        MenuAction::DeleteAll,
        MenuAction::Clear,
        MenuAction::Exit,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            MenuAction::Add => "add",
            MenuAction::List => "list",
            MenuAction::Edit => "edit",
            MenuAction::Delete => "delete",
            MenuAction::Search => "search",
            MenuAction::Show => "show",
            MenuAction::DeleteAll => "delete-all",
            MenuAction::Clear => "clear",
            MenuAction::Exit => "exit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Add => "Add a snippet",
            MenuAction::List => "List all snippets",
            MenuAction::Edit => "Edit a snippet",
            MenuAction::Delete => "Delete a snippet",
            MenuAction::Search => "Search snippets",
            MenuAction::Show => "Show code for a snippet",
            MenuAction::DeleteAll => "Delete all snippets",
            MenuAction::Clear => "Clear the terminal",
            MenuAction::Exit => "Exit",
        }
    }

    /// Accepts a 1-based menu number or an action keyword.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        if let Ok(number) = input.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(|index| Self::ALL.get(index))
                .copied();
        }
        Self::ALL.into_iter().find(|action| action.keyword() == input)
    }
}

/// Whether the loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    store: SnippetStore,
    highlighter: Highlighter,
    prompter: Prompter<R, W>,
    code_input: CodeInput,
}

/// Unwraps a prompt answer, ending the shell when input runs out.
macro_rules! answer {
    ($prompt:expr) => {
        match $prompt? {
            Some(value) => value,
            None => return Ok(Flow::Quit),
        }
    };
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(store: SnippetStore, prompter: Prompter<R, W>, code_input: CodeInput) -> Self {
        Self {
            store,
            highlighter: Highlighter::default(),
            prompter,
            code_input,
        }
    }

    pub fn into_parts(self) -> (SnippetStore, W) {
        (self.store, self.prompter.into_output())
    }

    fn out(&mut self) -> &mut W {
        self.prompter.output()
    }

    pub fn run(&mut self) -> Result<()> {
        let banner = "==== Welcome to Snippet Manager ====";
        writeln!(self.out(), "\n{}\n", banner.color(Palette::BANNER).bold().underline())?;

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompter.ask("Choose an action:")? else {
                break;
            };

            let flow = match MenuAction::parse(&choice) {
                Some(action) => self.dispatch(action)?,
                None => {
                    let hint = format!(
                        "Unknown choice '{}'. Enter a number between 1 and {} or an action name.",
                        choice.trim(),
                        MenuAction::ALL.len()
                    );
                    writeln!(self.out(), "{}", hint.color(Palette::NOTICE))?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }

        writeln!(self.out(), "{}", "Goodbye!".color(Palette::NOTICE))?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out())?;
        for (index, action) in MenuAction::ALL.iter().enumerate() {
            writeln!(
                self.out(),
                "  {} {:<26} {}",
                format!("{:>2}.", index + 1).color(Palette::ACCENT),
                action.label(),
                action.keyword().dimmed()
            )?;
        }
        Ok(())
    }

    fn dispatch(&mut self, action: MenuAction) -> Result<Flow> {
        match action {
            MenuAction::Add => self.add(),
            MenuAction::List => self.list(),
            MenuAction::Edit => self.edit(),
            MenuAction::Delete => self.delete(),
            MenuAction::Search => self.search(),
            MenuAction::Show => self.show(),
            MenuAction::DeleteAll => self.delete_all(),
            MenuAction::Clear => self.clear(),
            MenuAction::Exit => Ok(Flow::Quit),
        }
    }

    fn success(&mut self, message: &str) -> Result<()> {
        writeln!(self.out(), "{}", message.color(Palette::SUCCESS))?;
        Ok(())
    }

    fn failure(&mut self, message: &str) -> Result<()> {
        writeln!(self.out(), "{}", message.color(Palette::FAILURE))?;
        Ok(())
    }

    fn not_found(&mut self) -> Result<Flow> {
        self.failure("No snippet found for that id.")?;
        Ok(Flow::Continue)
    }

    fn add(&mut self) -> Result<Flow> {
        let title = answer!(self.prompter.ask("Snippet title:"));
        let language = answer!(self.prompter.ask("Programming language:"));
        let code = answer!(self.prompter.ask_code("Snippet code:", &self.code_input, ""));

        let id = self.store.add(title, language, code)?.id;
        self.success(&format!("Snippet added successfully. (id {id})"))?;
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> Result<Flow> {
        let lines: Vec<String> = self.store.list().iter().map(snippet_line).collect();
        let rule = "-------------------- All Snippets --------------------";
        writeln!(self.out(), "{}", rule.color(Palette::NOTICE))?;
        for line in &lines {
            writeln!(self.out(), "{line}")?;
        }
        writeln!(self.out(), "{}", count_line(lines.len()).color(Palette::NOTICE))?;
        Ok(Flow::Continue)
    }

    fn edit(&mut self) -> Result<Flow> {
        let id_text = answer!(self.prompter.ask("Snippet id to edit:"));
        let Some(current) = parse_id(&id_text).and_then(|id| self.store.find(id)).cloned() else {
            return self.not_found();
        };

        writeln!(self.out(), "{}", snippet_line(&current))?;
        let title = answer!(self.prompter.ask("New title (leave empty to keep current):"));
        let language = answer!(self.prompter.ask("New language (leave empty to keep current):"));
        let code = answer!(self.prompter.ask_code(
            "New code (leave empty to keep current):",
            &self.code_input,
            &current.code,
        ));

        let update = SnippetUpdate {
            title,
            language,
            code,
        };
        match self.store.update(current.id, update)? {
            Some(_) => self.success("Snippet updated successfully.")?,
            None => return self.not_found(),
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> Result<Flow> {
        let id_text = answer!(self.prompter.ask("Snippet id to delete:"));
        let Some(id) = parse_id(&id_text) else {
            return self.not_found();
        };

        match self.store.delete(id)? {
            Some(removed) => {
                self.success(&format!("Snippet '{}' deleted successfully.", removed.title))?
            }
            None => return self.not_found(),
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> Result<Flow> {
        let term = answer!(self.prompter.ask("Search term:"));
        let lines: Vec<String> = self.store.search(&term).into_iter().map(snippet_line).collect();

        if lines.is_empty() {
            let message = "No snippets found for that search term.";
            writeln!(self.out(), "{}", message.color(Palette::NOTICE))?;
            return Ok(Flow::Continue);
        }

        let rule = "-".repeat(20);
        let header = format!("{rule} Matching snippets ({}) {rule}", lines.len());
        writeln!(self.out(), "{}", header.color(Palette::NOTICE))?;
        for line in &lines {
            writeln!(self.out(), "{line}")?;
        }
        Ok(Flow::Continue)
    }

    fn show(&mut self) -> Result<Flow> {
        let id_text = answer!(self.prompter.ask("Snippet id:"));
        let Some(snippet) = parse_id(&id_text).and_then(|id| self.store.find(id)) else {
            return self.not_found();
        };

        let header = code_header(snippet);
        let body = self.highlighter.highlight(&snippet.code).to_ansi();
        writeln!(self.prompter.output(), "{header}\n{body}")?;
        Ok(Flow::Continue)
    }

    fn delete_all(&mut self) -> Result<Flow> {
        let confirmed = answer!(
            self.prompter
                .confirm("Are you sure you want to delete all snippets?", false)
        );
        if !confirmed {
            writeln!(self.out(), "{}", "Operation cancelled.".color(Palette::NOTICE))?;
            return Ok(Flow::Continue);
        }

        let removed = self.store.delete_all()?;
        self.success(&format!("All snippets deleted successfully! ({removed} removed)"))?;
        Ok(Flow::Continue)
    }

    fn clear(&mut self) -> Result<Flow> {
        execute!(self.out(), Clear(ClearType::All), MoveTo(0, 0))?;
        writeln!(self.out(), "{}", "Terminal cleared.".blue())?;
        Ok(Flow::Continue)
    }
}
