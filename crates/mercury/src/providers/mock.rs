use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use std::sync::Mutex;

use crate::errors::RelayResult;
use crate::models::event::{ChatMode, StreamEvent};
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{ChatProvider, KeyStatus, ProbeOutcome};

/// A request the mock provider received
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Probe {
        messages: Vec<Message>,
        tools: Vec<Tool>,
    },
    Display {
        messages: Vec<Message>,
        mode: ChatMode,
        tools: Vec<Tool>,
    },
}

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    probes: Arc<Mutex<Vec<RelayResult<ProbeOutcome>>>>,
    displays: Arc<Mutex<Vec<Vec<StreamEvent>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of probe results and display scripts
    pub fn new(probes: Vec<RelayResult<ProbeOutcome>>, displays: Vec<Vec<StreamEvent>>) -> Self {
        Self {
            probes: Arc::new(Mutex::new(probes)),
            displays: Arc::new(Mutex::new(displays)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn probe(&self, messages: &[Message], tools: &[Tool]) -> RelayResult<ProbeOutcome> {
        self.calls.lock().unwrap().push(MockCall::Probe {
            messages: messages.to_vec(),
            tools: tools.to_vec(),
        });
        let mut probes = self.probes.lock().unwrap();
        if probes.is_empty() {
            Ok(ProbeOutcome::default())
        } else {
            probes.remove(0)
        }
    }

    fn display(
        &self,
        messages: Vec<Message>,
        mode: ChatMode,
        tools: Vec<Tool>,
    ) -> BoxStream<'static, StreamEvent> {
        self.calls.lock().unwrap().push(MockCall::Display {
            messages,
            mode,
            tools,
        });
        let mut displays = self.displays.lock().unwrap();
        let events = if displays.is_empty() {
            vec![StreamEvent::Done]
        } else {
            displays.remove(0)
        };
        stream::iter(events).boxed()
    }

    async fn validate_key(&self) -> KeyStatus {
        KeyStatus::Valid
    }
}
