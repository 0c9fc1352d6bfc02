//! Runs one chat exchange, including the two-phase `web_search` round trip when tools are enabled.
//!
//! Without tools an exchange is a single display call in the requested mode. With tools:
//!
//! - diffusing: probe the model without diffusing, run the searches it asked for, then ask again
//!   with diffusing enabled over the extended history
//! - streaming: display with tools attached until the model stops to request tools, probe for the
//!   calls, run the searches, then replace the searching banner with their digests
//!
//! Whatever happens, the returned stream ends with exactly one `StreamEvent::Done`.
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;

use crate::errors::RelayResult;
use crate::models::event::{ChatMode, StreamEvent};
use crate::models::message::Message;
use crate::models::search::SearchOutcome;
use crate::models::tool::ToolCallFragment;
use crate::providers::base::ChatProvider;
use crate::render;
use crate::search::SearchProvider;
use crate::tools::{web_search_tool, WebSearchArgs, WEB_SEARCH};

/// Per-exchange choices made by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatOptions {
    pub mode: ChatMode,
    pub tools_enabled: bool,
}

impl ChatOptions {
    pub fn new(mode: ChatMode, tools_enabled: bool) -> Self {
        Self {
            mode,
            tools_enabled,
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn ChatProvider>,
    search: Option<Arc<dyn SearchProvider>>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider,
            search: None,
        }
    }

    pub fn with_search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    /// Stream the answer to `messages`
    pub fn reply(&self, messages: Vec<Message>, options: ChatOptions) -> BoxStream<'static, StreamEvent> {
        let provider = Arc::clone(&self.provider);
        let search = self.search.clone().filter(|_| options.tools_enabled);

        let events = match (search, options.mode) {
            (None, mode) => {
                tracing::debug!(mode = %mode, "Chat without tools");
                forward(provider.display(messages, mode, vec![]), String::new())
            }
            (Some(search), ChatMode::Diffusing) => diffusing_with_tools(provider, search, messages),
            (Some(search), ChatMode::Streaming) => streaming_with_tools(provider, search, messages),
        };

        async_stream::stream! {
            let mut events = events;
            while let Some(event) = events.next().await {
                if let StreamEvent::Error { error } = &event {
                    tracing::error!("Chat exchange failed: {}", error);
                }
                yield event;
            }
            yield StreamEvent::Done;
        }
        .boxed()
    }
}

/// Pass through a display sequence with `prefix` in front of every snapshot.
///
/// Stops after an error; `Done` and tool call markers are dropped.
fn forward(mut display: BoxStream<'static, StreamEvent>, prefix: String) -> BoxStream<'static, StreamEvent> {
    async_stream::stream! {
        while let Some(event) = display.next().await {
            match event {
                StreamEvent::Content { content, mode } => {
                    yield StreamEvent::content(format!("{}{}", prefix, content), mode);
                }
                StreamEvent::Error { error } => {
                    yield StreamEvent::error(error);
                    return;
                }
                StreamEvent::Done | StreamEvent::ToolCalls { .. } => return,
            }
        }
    }
    .boxed()
}

fn diffusing_with_tools(
    provider: Arc<dyn ChatProvider>,
    search: Arc<dyn SearchProvider>,
    messages: Vec<Message>,
) -> BoxStream<'static, StreamEvent> {
    async_stream::stream! {
        yield StreamEvent::content(render::CHECKING_TOOLS, ChatMode::Diffusing);

        let probe = match provider.probe(&messages, &[web_search_tool()]).await {
            Ok(probe) => probe,
            Err(e) => {
                yield StreamEvent::error(e.to_string());
                return;
            }
        };

        if probe.tool_calls.is_empty() {
            yield StreamEvent::content(render::NO_TOOLS_NEEDED, ChatMode::Diffusing);
            let mut answer = forward(
                provider.display(messages, ChatMode::Diffusing, vec![]),
                String::new(),
            );
            while let Some(event) = answer.next().await {
                yield event;
            }
            return;
        }

        yield StreamEvent::content(
            render::found_tool_calls(probe.tool_calls.len()),
            ChatMode::Diffusing,
        );
        let mut round = tool_round(
            provider,
            search,
            messages,
            probe.text,
            probe.tool_calls,
        );
        while let Some(event) = round.next().await {
            yield event;
        }
    }
    .boxed()
}

fn streaming_with_tools(
    provider: Arc<dyn ChatProvider>,
    search: Arc<dyn SearchProvider>,
    messages: Vec<Message>,
) -> BoxStream<'static, StreamEvent> {
    async_stream::stream! {
        let mut display = provider.display(messages.clone(), ChatMode::Streaming, vec![web_search_tool()]);
        let mut pending = None;

        while let Some(event) = display.next().await {
            match event {
                StreamEvent::Content { .. } => {
                    yield event;
                }
                StreamEvent::Error { .. } => {
                    yield event;
                    return;
                }
                StreamEvent::Done => return,
                StreamEvent::ToolCalls { content, calls } => {
                    pending = Some((content, calls));
                    break;
                }
            }
        }
        drop(display);

        let (text, marked_calls) = match pending {
            Some(pending) => pending,
            None => return,
        };

        // The banner stays on screen until the first digest takes its place
        yield StreamEvent::content(format!("{}{}", text, render::SEARCHING), ChatMode::Streaming);

        let calls = match provider.probe(&messages, &[web_search_tool()]).await {
            Ok(probe) if !probe.tool_calls.is_empty() => probe.tool_calls,
            Ok(_) => {
                tracing::debug!("Probe found no tool calls, using the streamed ones");
                marked_calls
            }
            Err(e) => {
                yield StreamEvent::error(e.to_string());
                return;
            }
        };

        let mut digests = Vec::new();
        let mut errors = Vec::new();

        for call in calls.iter() {
            let args = match search_args(call) {
                Some(Ok(args)) => args,
                Some(Err(e)) => {
                    errors.push(e.to_string());
                    continue;
                }
                None => continue,
            };

            match search.search(&args.query, args.max_results()).await {
                SearchOutcome::Found(result) => {
                    digests.push(render::search_digest(&result));
                    yield StreamEvent::content(
                        render::searched(&text, &digests),
                        ChatMode::Streaming,
                    );
                }
                SearchOutcome::Failed { error } => errors.push(error),
            }
        }

        if !errors.is_empty() {
            yield StreamEvent::error(errors.join("\n"));
        }
    }
    .boxed()
}

/// The `web_search` arguments of `call`, `None` for any other tool
fn search_args(call: &ToolCallFragment) -> Option<RelayResult<WebSearchArgs>> {
    if call.name != WEB_SEARCH {
        tracing::warn!(tool = %call.name, "Ignoring call to unknown tool");
        return None;
    }
    let args = WebSearchArgs::from_call(call);
    if let Err(e) = &args {
        tracing::warn!("{}", e);
    }
    Some(args)
}

/// Execute the requested searches and ask the model for the diffused final answer.
///
/// A call with bad arguments or a failed search fails on its own, the remaining calls still run.
/// Any failure means the model is not asked again.
fn tool_round(
    provider: Arc<dyn ChatProvider>,
    search: Arc<dyn SearchProvider>,
    mut history: Vec<Message>,
    text: String,
    calls: Vec<ToolCallFragment>,
) -> BoxStream<'static, StreamEvent> {
    async_stream::stream! {
        history.push(Message::assistant_tool_calls(text, calls.clone()));

        let mut digests = Vec::new();
        let mut errors = Vec::new();

        for call in calls.iter() {
            let args = match search_args(call) {
                Some(Ok(args)) => args,
                Some(Err(e)) => {
                    errors.push(e.to_string());
                    continue;
                }
                None => continue,
            };

            yield StreamEvent::content(render::searching_for(&args.query), ChatMode::Diffusing);

            let outcome = search.search(&args.query, args.max_results()).await;
            history.push(Message::tool_result(
                call.id.clone(),
                WEB_SEARCH,
                outcome.to_tool_content(),
            ));

            match &outcome {
                SearchOutcome::Found(result) => digests.push(render::search_digest(result)),
                SearchOutcome::Failed { error } => errors.push(error.clone()),
            }
        }

        if !errors.is_empty() {
            yield StreamEvent::error(errors.join("\n"));
            return;
        }

        yield StreamEvent::content(render::GENERATING_FINAL, ChatMode::Diffusing);
        let mut answer = forward(
            provider.display(history, ChatMode::Diffusing, vec![]),
            render::response_prefix(&digests),
        );
        while let Some(event) = answer.next().await {
            yield event;
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RelayError;
    use crate::models::message::Role;
    use crate::models::search::{SearchHit, SearchResult};
    use crate::providers::base::ProbeOutcome;
    use crate::providers::mock::{MockCall, MockProvider};
    use crate::search::mock::MockSearch;

    fn weather_call() -> ToolCallFragment {
        ToolCallFragment::new("call_1", WEB_SEARCH, r#"{"query":"weather"}"#)
    }

    fn sunny() -> SearchOutcome {
        SearchOutcome::Found(SearchResult {
            answer: Some("Sunny".to_string()),
            results: vec![SearchHit {
                title: "Forecast".to_string(),
                url: "https://weather.example".to_string(),
                content: "Clear skies all day".to_string(),
            }],
            query: "weather".to_string(),
        })
    }

    fn setup(
        provider: MockProvider,
        search: Option<MockSearch>,
    ) -> (Arc<MockProvider>, Option<Arc<MockSearch>>, Orchestrator) {
        let provider = Arc::new(provider);
        let mut orchestrator = Orchestrator::new(provider.clone());
        let search = search.map(Arc::new);
        if let Some(search) = &search {
            orchestrator = orchestrator.with_search(search.clone());
        }
        (provider, search, orchestrator)
    }

    async fn run(orchestrator: &Orchestrator, options: ChatOptions) -> Vec<StreamEvent> {
        orchestrator
            .reply(vec![Message::user("What's the weather?")], options)
            .collect()
            .await
    }

    fn done_count(events: &[StreamEvent]) -> usize {
        events.iter().filter(|e| **e == StreamEvent::Done).count()
    }

    #[tokio::test]
    async fn test_streaming_without_tools_never_searches() {
        let provider = MockProvider::new(
            vec![],
            vec![vec![
                StreamEvent::content("Hi", ChatMode::Streaming),
                StreamEvent::content("Hi there", ChatMode::Streaming),
                StreamEvent::Done,
            ]],
        );
        let (provider, search, orchestrator) = setup(provider, Some(MockSearch::new(vec![sunny()])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Streaming, false)).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::content("Hi", ChatMode::Streaming),
                StreamEvent::content("Hi there", ChatMode::Streaming),
                StreamEvent::Done,
            ]
        );
        assert!(search.unwrap().queries().is_empty());
        assert_eq!(
            provider.calls(),
            vec![MockCall::Display {
                messages: vec![Message::user("What's the weather?")],
                mode: ChatMode::Streaming,
                tools: vec![],
            }]
        );
    }

    #[tokio::test]
    async fn test_tools_need_a_search_provider() {
        let (provider, _, orchestrator) = setup(MockProvider::new(vec![], vec![]), None);

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Diffusing, true)).await;

        assert_eq!(events, vec![StreamEvent::Done]);
        assert!(matches!(
            provider.calls().as_slice(),
            [MockCall::Display { mode: ChatMode::Diffusing, .. }]
        ));
    }

    #[tokio::test]
    async fn test_diffusing_without_tool_calls_uses_original_history() {
        let provider = MockProvider::new(
            vec![Ok(ProbeOutcome {
                text: "It's probably nice".to_string(),
                tool_calls: vec![],
            })],
            vec![vec![
                StreamEvent::content("Itz nic3", ChatMode::Diffusing),
                StreamEvent::content("It's nice", ChatMode::Diffusing),
                StreamEvent::Done,
            ]],
        );
        let (provider, search, orchestrator) = setup(provider, Some(MockSearch::new(vec![])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Diffusing, true)).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::content(render::CHECKING_TOOLS, ChatMode::Diffusing),
                StreamEvent::content(render::NO_TOOLS_NEEDED, ChatMode::Diffusing),
                StreamEvent::content("Itz nic3", ChatMode::Diffusing),
                StreamEvent::content("It's nice", ChatMode::Diffusing),
                StreamEvent::Done,
            ]
        );
        assert!(search.unwrap().queries().is_empty());

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            MockCall::Probe {
                messages: vec![Message::user("What's the weather?")],
                tools: vec![web_search_tool()],
            }
        );
        assert_eq!(
            calls[1],
            MockCall::Display {
                messages: vec![Message::user("What's the weather?")],
                mode: ChatMode::Diffusing,
                tools: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_diffusing_with_search() {
        let provider = MockProvider::new(
            vec![Ok(ProbeOutcome {
                text: String::new(),
                tool_calls: vec![weather_call()],
            })],
            vec![vec![
                StreamEvent::content("Sunny tod4y", ChatMode::Diffusing),
                StreamEvent::content("Sunny today", ChatMode::Diffusing),
                StreamEvent::Done,
            ]],
        );
        let (provider, search, orchestrator) = setup(provider, Some(MockSearch::new(vec![sunny()])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Diffusing, true)).await;

        assert_eq!(search.unwrap().queries(), vec![("weather".to_string(), 3)]);

        let SearchOutcome::Found(result) = sunny() else {
            unreachable!()
        };
        let prefix = format!("{}{}", render::search_digest(&result), render::AI_RESPONSE);
        assert_eq!(
            events,
            vec![
                StreamEvent::content(render::CHECKING_TOOLS, ChatMode::Diffusing),
                StreamEvent::content(render::found_tool_calls(1), ChatMode::Diffusing),
                StreamEvent::content(render::searching_for("weather"), ChatMode::Diffusing),
                StreamEvent::content(render::GENERATING_FINAL, ChatMode::Diffusing),
                StreamEvent::content(format!("{}Sunny tod4y", prefix), ChatMode::Diffusing),
                StreamEvent::content(format!("{}Sunny today", prefix), ChatMode::Diffusing),
                StreamEvent::Done,
            ]
        );

        let calls = provider.calls();
        let MockCall::Display {
            messages,
            mode,
            tools,
        } = &calls[1]
        else {
            panic!("Expected the final display call");
        };
        assert_eq!(*mode, ChatMode::Diffusing);
        assert!(tools.is_empty());
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::user("What's the weather?"));
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].tool_calls, Some(vec![weather_call()]));
        assert_eq!(messages[2].role, Role::Tool);
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(messages[2].name.as_deref(), Some("web_search"));
        assert_eq!(messages[2].content, sunny().to_tool_content());
    }

    #[tokio::test]
    async fn test_search_error_skips_final_phase() {
        let provider = MockProvider::new(
            vec![Ok(ProbeOutcome {
                text: String::new(),
                tool_calls: vec![weather_call()],
            })],
            vec![],
        );
        let (provider, _, orchestrator) = setup(
            provider,
            Some(MockSearch::new(vec![SearchOutcome::failed(
                "Search failed with status: 500",
            )])),
        );

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Diffusing, true)).await;

        assert_eq!(
            &events[events.len() - 2..],
            &[
                StreamEvent::error("Search failed with status: 500"),
                StreamEvent::Done
            ]
        );
        assert!(!provider
            .calls()
            .iter()
            .any(|call| matches!(call, MockCall::Display { .. })));
    }

    #[tokio::test]
    async fn test_bad_arguments_fail_only_their_call() {
        let provider = MockProvider::new(
            vec![Ok(ProbeOutcome {
                text: String::new(),
                tool_calls: vec![
                    ToolCallFragment::new("call_0", WEB_SEARCH, r#"{"query": "#),
                    ToolCallFragment::new("call_1", WEB_SEARCH, r#"{"query":"rust","max_results":5}"#),
                    ToolCallFragment::new("call_2", "calculator", r#"{"x":1}"#),
                ],
            })],
            vec![],
        );
        let (provider, search, orchestrator) = setup(provider, Some(MockSearch::new(vec![sunny()])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Diffusing, true)).await;

        assert_eq!(search.unwrap().queries(), vec![("rust".to_string(), 5)]);
        let errors: Vec<_> = events.iter().filter_map(|e| match e {
            StreamEvent::Error { error } => Some(error.clone()),
            _ => None,
        }).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("call_0"));
        assert_eq!(done_count(&events), 1);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_probe_error_is_surfaced() {
        let provider = MockProvider::new(
            vec![Err(RelayError::UpstreamStatus {
                status: 401,
                body: "unauthorized".to_string(),
            })],
            vec![],
        );
        let (_, _, orchestrator) = setup(provider, Some(MockSearch::new(vec![])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Diffusing, true)).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::content(render::CHECKING_TOOLS, ChatMode::Diffusing),
                StreamEvent::error("API request failed with status 401"),
                StreamEvent::Done,
            ]
        );
    }

    fn content_lengths(events: &[StreamEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Content { content, .. } => Some(content.len()),
                _ => None,
            })
            .collect()
    }

    fn assert_never_shrinks(events: &[StreamEvent]) {
        let lengths = content_lengths(events);
        assert!(
            lengths.windows(2).all(|w| w[0] <= w[1]),
            "snapshot lengths shrank: {:?}",
            lengths
        );
    }

    fn check_then_call(calls: Vec<ToolCallFragment>) -> Vec<StreamEvent> {
        vec![
            StreamEvent::content("Let me", ChatMode::Streaming),
            StreamEvent::content("Let me check.", ChatMode::Streaming),
            StreamEvent::ToolCalls {
                content: "Let me check.".to_string(),
                calls,
            },
        ]
    }

    #[tokio::test]
    async fn test_streaming_with_tool_calls() {
        let provider = MockProvider::new(
            vec![Ok(ProbeOutcome {
                text: String::new(),
                tool_calls: vec![weather_call()],
            })],
            vec![check_then_call(vec![weather_call()])],
        );
        let (provider, search, orchestrator) = setup(provider, Some(MockSearch::new(vec![sunny()])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Streaming, true)).await;

        assert_eq!(search.unwrap().queries(), vec![("weather".to_string(), 3)]);

        let SearchOutcome::Found(result) = sunny() else {
            unreachable!()
        };
        assert_eq!(
            events,
            vec![
                StreamEvent::content("Let me", ChatMode::Streaming),
                StreamEvent::content("Let me check.", ChatMode::Streaming),
                StreamEvent::content(
                    format!("Let me check.{}", render::SEARCHING),
                    ChatMode::Streaming
                ),
                StreamEvent::content(
                    format!("Let me check.\n\n{}", render::search_digest(&result)),
                    ChatMode::Streaming
                ),
                StreamEvent::Done,
            ]
        );
        assert_never_shrinks(&events);

        assert_eq!(
            provider.calls(),
            vec![
                MockCall::Display {
                    messages: vec![Message::user("What's the weather?")],
                    mode: ChatMode::Streaming,
                    tools: vec![web_search_tool()],
                },
                MockCall::Probe {
                    messages: vec![Message::user("What's the weather?")],
                    tools: vec![web_search_tool()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_streaming_unknown_tool_keeps_banner() {
        let calculator = ToolCallFragment::new("call_9", "calculator", r#"{"x":1}"#);
        let provider = MockProvider::new(
            vec![Ok(ProbeOutcome::default())],
            vec![check_then_call(vec![calculator])],
        );
        let (provider, search, orchestrator) = setup(provider, Some(MockSearch::new(vec![])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Streaming, true)).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::content("Let me", ChatMode::Streaming),
                StreamEvent::content("Let me check.", ChatMode::Streaming),
                StreamEvent::content(
                    format!("Let me check.{}", render::SEARCHING),
                    ChatMode::Streaming
                ),
                StreamEvent::Done,
            ]
        );
        assert_never_shrinks(&events);
        assert!(search.unwrap().queries().is_empty());
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_streaming_digests_accumulate() {
        let rust_call = ToolCallFragment::new("call_2", WEB_SEARCH, r#"{"query":"rust"}"#);
        let provider = MockProvider::new(
            vec![Ok(ProbeOutcome {
                text: String::new(),
                tool_calls: vec![weather_call(), rust_call],
            })],
            vec![check_then_call(vec![weather_call()])],
        );
        let (_, search, orchestrator) =
            setup(provider, Some(MockSearch::new(vec![sunny(), sunny()])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Streaming, true)).await;

        assert_eq!(
            search.unwrap().queries(),
            vec![("weather".to_string(), 3), ("rust".to_string(), 3)]
        );
        assert_eq!(content_lengths(&events).len(), 5);
        assert_never_shrinks(&events);
        assert_eq!(done_count(&events), 1);
    }

    #[tokio::test]
    async fn test_streaming_search_error_is_surfaced() {
        let provider = MockProvider::new(
            vec![Ok(ProbeOutcome {
                text: String::new(),
                tool_calls: vec![weather_call()],
            })],
            vec![check_then_call(vec![weather_call()])],
        );
        let (_, _, orchestrator) = setup(
            provider,
            Some(MockSearch::new(vec![SearchOutcome::failed(
                "Search failed with status: 432",
            )])),
        );

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Streaming, true)).await;

        assert_eq!(
            &events[events.len() - 2..],
            &[
                StreamEvent::error("Search failed with status: 432"),
                StreamEvent::Done
            ]
        );
        assert_never_shrinks(&events);
    }

    #[tokio::test]
    async fn test_streaming_with_tools_but_none_requested() {
        let provider = MockProvider::new(
            vec![],
            vec![vec![
                StreamEvent::content("Hello", ChatMode::Streaming),
                StreamEvent::Done,
            ]],
        );
        let (provider, search, orchestrator) = setup(provider, Some(MockSearch::new(vec![])));

        let events = run(&orchestrator, ChatOptions::new(ChatMode::Streaming, true)).await;

        assert_eq!(
            events,
            vec![StreamEvent::content("Hello", ChatMode::Streaming), StreamEvent::Done]
        );
        assert!(search.unwrap().queries().is_empty());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_display_error_ends_exchange_once() {
        let provider = MockProvider::new(
            vec![],
            vec![vec![
                StreamEvent::content("Par", ChatMode::Streaming),
                StreamEvent::error("connection reset"),
                StreamEvent::content("never", ChatMode::Streaming),
                StreamEvent::Done,
            ]],
        );
        let (_, _, orchestrator) = setup(provider, None);

        let events = run(&orchestrator, ChatOptions::default()).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::content("Par", ChatMode::Streaming),
                StreamEvent::error("connection reset"),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_sentinel_still_ends_with_done() {
        let provider = MockProvider::new(
            vec![],
            vec![vec![StreamEvent::content("cut", ChatMode::Streaming)]],
        );
        let (_, _, orchestrator) = setup(provider, None);

        let events = run(&orchestrator, ChatOptions::default()).await;
        assert_eq!(done_count(&events), 1);
        assert_eq!(events.last(), Some(&StreamEvent::Done));
    }
}
