use anyhow::Result;
use futures::StreamExt;
use mercury::models::event::{ChatMode, StreamEvent};
use mercury::models::message::{Message, Role};
use mercury::orchestrator::{ChatOptions, Orchestrator};
use mercury::providers::base::{ChatProvider, KeyStatus};
use mercury::providers::configs::InceptionProviderConfig;
use mercury::providers::inception::InceptionProvider;
use mercury::render::error_line;
use mercury::search::tavily::{TavilyConfig, TavilySearch};
use std::sync::Arc;

use crate::prompt::prompt::{Command, InputType, Notice, Prompt};

pub const MIN_MAX_TOKENS: u32 = 50;
pub const MAX_MAX_TOKENS: u32 = 32000;
const MIN_KEY_LENGTH: usize = 10;

pub fn clamp_max_tokens(max_tokens: u32) -> u32 {
    max_tokens.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS)
}

/// Everything needed to reach the upstream APIs
#[derive(Debug, Clone)]
pub struct Connection {
    pub api_key: String,
    pub tavily_api_key: Option<String>,
    pub inception_host: String,
    pub tavily_host: String,
    pub model: String,
}

impl Connection {
    fn provider(&self, max_tokens: u32) -> Result<InceptionProvider> {
        let config = InceptionProviderConfig::new(self.api_key.clone())
            .with_host(self.inception_host.clone())
            .with_model(self.model.clone())
            .with_max_tokens(max_tokens);
        Ok(InceptionProvider::new(config)?)
    }

    fn search(&self) -> Result<Option<TavilySearch>> {
        match self.tavily_api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => {
                let config = TavilyConfig::new(key).with_host(self.tavily_host.clone());
                Ok(Some(TavilySearch::new(config)?))
            }
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyState {
    Unknown,
    Valid,
    Invalid(String),
}

pub struct Session<'a> {
    connection: Connection,
    prompt: Box<dyn Prompt + 'a>,
    messages: Vec<Message>,
    key_state: KeyState,
    mode: ChatMode,
    max_tokens: u32,
    tools_enabled: bool,
}

impl<'a> Session<'a> {
    pub fn new(connection: Connection, prompt: Box<impl Prompt + 'a>) -> Self {
        Session {
            connection,
            prompt,
            messages: Vec::new(),
            key_state: KeyState::Unknown,
            mode: ChatMode::default(),
            max_tokens: 2000,
            tools_enabled: false,
        }
    }

    pub fn with_mode(mut self, mode: ChatMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = clamp_max_tokens(max_tokens);
        self
    }

    pub fn with_tools(mut self, enabled: bool) -> Self {
        self.tools_enabled = enabled && self.has_search_key();
        self
    }

    fn has_search_key(&self) -> bool {
        self.connection
            .tavily_api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }

    fn status(&self) -> String {
        let tools = if self.tools_enabled { " +search" } else { "" };
        format!("[{} | {} tokens{}]", self.mode, self.max_tokens, tools)
    }

    pub async fn start(&mut self) -> Result<()> {
        self.validate_key().await;
        self.prompt.mercury_ready();

        loop {
            let status = self.status();
            let input = self.prompt.get_input(&status)?;
            match input.input_type {
                InputType::Message => {
                    if let Some(content) = input.content {
                        self.send(content).await;
                    }
                }
                InputType::Command(command) => self.handle_command(command).await,
                InputType::Exit => break,
                InputType::AskAgain => continue,
            }
        }
        self.prompt.close();
        Ok(())
    }

    pub async fn validate_key(&mut self) {
        if self.connection.api_key.trim().len() < MIN_KEY_LENGTH {
            self.key_state = KeyState::Invalid("API key is too short".to_string());
        } else {
            self.prompt.show_busy();
            let status = match self.connection.provider(self.max_tokens) {
                Ok(provider) => provider.validate_key().await,
                Err(e) => KeyStatus::Unreachable(e.to_string()),
            };
            self.prompt.hide_busy();
            tracing::debug!(status = ?status, "Key validation finished");
            self.key_state = match status.into_result() {
                Ok(()) => KeyState::Valid,
                Err(e) => KeyState::Invalid(e.to_string()),
            };
        }

        let notice = match &self.key_state {
            KeyState::Valid => Notice::Success("API key validated".to_string()),
            KeyState::Invalid(error) => Notice::Error(format!("Invalid API key: {}", error)),
            KeyState::Unknown => return,
        };
        self.prompt.render_notice(notice);
    }

    async fn handle_command(&mut self, command: Command) {
        let notice = match command {
            Command::Help => Notice::Info(help_text()),
            Command::Mode(mode) => {
                self.mode = mode.unwrap_or_else(|| self.mode.toggled());
                Notice::Info(format!("Mode set to {}", self.mode))
            }
            Command::Tools if !self.has_search_key() => Notice::Warning(
                "Web search needs a Tavily API key (--tavily-api-key or TAVILY_API_KEY)".to_string(),
            ),
            Command::Tools => {
                self.tools_enabled = !self.tools_enabled;
                let state = if self.tools_enabled { "enabled" } else { "disabled" };
                Notice::Info(format!("Web search {}", state))
            }
            Command::Tokens(requested) => {
                self.max_tokens = clamp_max_tokens(requested);
                Notice::Info(format!("Max tokens set to {}", self.max_tokens))
            }
            Command::Clear => {
                self.messages.clear();
                Notice::Info("Conversation cleared".to_string())
            }
            Command::Validate => {
                self.validate_key().await;
                return;
            }
            Command::Invalid(message) => Notice::Warning(message),
        };
        self.prompt.render_notice(notice);
    }

    fn orchestrator(&self) -> Result<Orchestrator> {
        let provider: Arc<dyn ChatProvider> = Arc::new(self.connection.provider(self.max_tokens)?);
        let mut orchestrator = Orchestrator::new(provider);
        if let Some(search) = self.connection.search()? {
            orchestrator = orchestrator.with_search(Arc::new(search));
        }
        Ok(orchestrator)
    }

    /// Send one user message and render the reply as it streams
    pub async fn send(&mut self, content: String) {
        if self.key_state != KeyState::Valid {
            self.prompt.render_notice(Notice::Warning(
                "Please provide a valid API key first (see /validate)".to_string(),
            ));
            return;
        }

        let orchestrator = match self.orchestrator() {
            Ok(orchestrator) => orchestrator,
            Err(e) => {
                tracing::error!("Could not set up the chat clients: {}", e);
                self.prompt.render_notice(Notice::Error(e.to_string()));
                return;
            }
        };

        self.messages.push(Message::user(content));
        let options = ChatOptions::new(self.mode, self.tools_enabled);
        let mut stream = orchestrator.reply(self.messages.clone(), options);

        self.prompt.show_busy();
        let mut reply = String::new();
        let mut error = None;
        loop {
            tokio::select! {
                event = stream.next() => {
                    match event {
                        Some(StreamEvent::Content { content, .. }) => {
                            self.prompt.render_snapshot(&content);
                            reply = content;
                        }
                        Some(StreamEvent::Error { error: message }) => error = Some(message),
                        Some(StreamEvent::ToolCalls { .. }) => {}
                        Some(StreamEvent::Done) | None => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    drop(stream);
                    tracing::info!("Reply interrupted");
                    self.prompt.hide_busy();
                    // Reset the interaction to before the interrupted user request
                    while let Some(message) = self.messages.pop() {
                        if message.role == Role::User {
                            break;
                        }
                    }
                    self.prompt.render_notice(Notice::Warning(
                        "Interrupted: resetting conversation to before the last sent message".to_string(),
                    ));
                    return;
                }
            }
        }
        self.prompt.hide_busy();

        let reply = match error {
            Some(error) => {
                tracing::warn!("Reply ended with an error: {}", error);
                error_line(&error)
            }
            None => reply,
        };
        self.prompt.finish_reply(&reply);
        self.messages.push(Message::assistant(reply));
    }
}

#[cfg(test)]
impl<'a> Session<'a> {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn key_state(&self) -> &KeyState {
        &self.key_state
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn tools_enabled(&self) -> bool {
        self.tools_enabled
    }
}

fn help_text() -> String {
    [
        "Commands:",
        "/mode [streaming|diffusing] - Toggle or set the response mode",
        "/tools - Toggle web search (needs a Tavily API key)",
        "/tokens N - Set max tokens (50 to 32000)",
        "/clear - Clear the conversation",
        "/validate - Check the API key again",
        "/exit - Exit the session",
        "/? - Display this help message",
        "Ctrl+C - Interrupt a reply",
    ]
    .join("\n")
}
