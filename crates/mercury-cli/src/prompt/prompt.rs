use anyhow::Result;
use mercury::models::event::ChatMode;

pub trait Prompt {
    /// Show the latest snapshot of a reply in progress, replacing the previous one
    fn render_snapshot(&mut self, content: &str);
    /// Settle the reply on screen once its stream ended
    fn finish_reply(&mut self, content: &str);
    fn render_notice(&mut self, notice: Notice);
    fn get_input(&mut self, status: &str) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    fn close(&self);
    fn mercury_ready(&self) {
        println!("\n");
        println!("Mercury is ready! Ask anything, or type /? for commands.");
        println!("\n");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Optional content as sometimes the user may be issuing a command eg. (Exit)
}

impl Input {
    pub fn message<S: Into<String>>(content: S) -> Self {
        Input {
            input_type: InputType::Message,
            content: Some(content.into()),
        }
    }

    pub fn exit() -> Self {
        Input {
            input_type: InputType::Exit,
            content: None,
        }
    }

    pub fn ask_again() -> Self {
        Input {
            input_type: InputType::AskAgain,
            content: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    AskAgain,         // Ask the user for input again. Control flow command.
    Message,          // User sent a message
    Command(Command), // User changed a setting
    Exit,             // User wants to exit the session
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Set the mode, or toggle it when none is given
    Mode(Option<ChatMode>),
    Tools,
    Tokens(u32),
    Clear,
    Validate,
    Invalid(String),
}
