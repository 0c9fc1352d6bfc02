use std::io::Write;

use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, log, spinner};
use console::{measure_text_width, Term};

use super::prompt::{Input, Notice, Prompt};
use crate::inputs::parse_input;

pub struct CliclackPrompt {
    spinner: Option<cliclack::ProgressBar>,
    term: Term,
    // Terminal rows taken by the snapshot currently on screen
    live_rows: usize,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt {
            spinner: None,
            term: Term::stdout(),
            live_rows: 0,
        }
    }

    fn rows_for(&self, content: &str) -> usize {
        let width = (self.term.size().1 as usize).max(1);
        content
            .split('\n')
            .map(|line| measure_text_width(line).max(1).div_ceil(width))
            .sum()
    }

    fn clear_live(&mut self) {
        if self.live_rows > 0 {
            let _ = self.term.clear_last_lines(self.live_rows);
            self.live_rows = 0;
        }
    }
}

impl Default for CliclackPrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn print_markdown(content: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme("zenburn")
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    if printed.is_err() {
        println!("{}", content);
    }
}

impl Prompt for CliclackPrompt {
    fn render_snapshot(&mut self, content: &str) {
        self.hide_busy();
        self.clear_live();
        let _ = writeln!(&self.term, "{}", content);
        self.live_rows = self.rows_for(content);
    }

    fn finish_reply(&mut self, content: &str) {
        self.hide_busy();
        self.clear_live();
        print_markdown(content);
        println!();
    }

    fn render_notice(&mut self, notice: Notice) {
        let _ = match notice {
            Notice::Info(text) => log::info(text),
            Notice::Success(text) => log::success(text),
            Notice::Warning(text) => log::warning(text),
            Notice::Error(text) => log::error(text),
        };
    }

    fn get_input(&mut self, status: &str) -> Result<Input> {
        let message_text: String = input(format!("Mercury {}    [Help: /?]", status))
            .placeholder("")
            .required(false)
            .interact()?;
        Ok(parse_input(&message_text))
    }

    fn show_busy(&mut self) {
        let spinner = spinner();
        spinner.start("awaiting reply");
        self.spinner = Some(spinner);
    }

    fn hide_busy(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop("");
        }
    }

    fn close(&self) {
        let _ = cliclack::outro("Goodbye!");
    }
}
