use cliclack::password;
use mercury::models::event::ChatMode;
use std::str::FromStr;

use crate::prompt::prompt::{Command, Input, InputType};

pub fn get_api_key(input_prompt: &str) -> std::io::Result<String> {
    password(input_prompt).mask('▪').interact()
}

/// Turn a line typed by the user into a message or a slash command
pub fn parse_input(text: &str) -> Input {
    let text = text.trim();
    if text.is_empty() {
        return Input::ask_again();
    }
    if !text.starts_with('/') {
        return Input::message(text);
    }

    let mut parts = text.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();

    let command = match name.as_str() {
        "/exit" | "/quit" => return Input::exit(),
        "/?" | "/help" => Command::Help,
        "/mode" => match arg {
            None => Command::Mode(None),
            Some(mode) => match ChatMode::from_str(mode) {
                Ok(mode) => Command::Mode(Some(mode)),
                Err(_) => Command::Invalid(format!("Unknown mode '{}', use streaming or diffusing", mode)),
            },
        },
        "/tools" => Command::Tools,
        "/tokens" => match arg.map(str::parse::<u32>) {
            Some(Ok(tokens)) => Command::Tokens(tokens),
            _ => Command::Invalid("Usage: /tokens <number>".to_string()),
        },
        "/clear" => Command::Clear,
        "/validate" => Command::Validate,
        other => Command::Invalid(format!("Unknown command {}, try /?", other)),
    };

    Input {
        input_type: InputType::Command(command),
        content: None,
    }
}
