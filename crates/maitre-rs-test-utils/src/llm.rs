use async_trait::async_trait;
use maitre_rs_llm::{ChatMessage, ChatProvider, CompletionProvider, LlmError};
use maitre_rs_protocol::{Intent, ModelParams};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Build a classifier verdict JSON string for tests.
pub fn verdict_json(intent: Intent, response: &str) -> String {
    serde_json::json!({
        "intent": intent.as_str(),
        "response": response,
    })
    .to_string()
}

#[derive(Debug, Clone)]
pub struct FixedLLM {
    response: String,
    completion: String,
}

impl FixedLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            completion: "mock completion".to_string(),
        }
    }

    pub fn with_completion(mut self, completion: impl Into<String>) -> Self {
        self.completion = completion.into();
        self
    }
}

#[async_trait]
impl ChatProvider for FixedLLM {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _params: &ModelParams,
    ) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

#[async_trait]
impl CompletionProvider for FixedLLM {
    async fn complete(&self, _prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
        Ok(self.completion.clone())
    }
}

#[derive(Debug, Clone)]
pub struct FailingLLM {
    message: String,
}

impl FailingLLM {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FailingLLM {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _params: &ModelParams,
    ) -> Result<String, LlmError> {
        Err(LlmError::Provider {
            status: 500,
            message: self.message.clone(),
        })
    }
}

#[async_trait]
impl CompletionProvider for FailingLLM {
    async fn complete(&self, _prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
        Err(LlmError::Provider {
            status: 500,
            message: self.message.clone(),
        })
    }
}

/// Completes normally but fails every chat call.
#[derive(Debug, Clone)]
pub struct ChatFailingLLM {
    completion: String,
    message: String,
}

impl ChatFailingLLM {
    pub fn new(completion: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            completion: completion.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for ChatFailingLLM {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _params: &ModelParams,
    ) -> Result<String, LlmError> {
        Err(LlmError::Provider {
            status: 500,
            message: self.message.clone(),
        })
    }
}

#[async_trait]
impl CompletionProvider for ChatFailingLLM {
    async fn complete(&self, _prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
        Ok(self.completion.clone())
    }
}

#[derive(Debug, Clone)]
pub struct RecordingChatLLM {
    response: String,
    completion: Option<String>,
    pub last_messages: Arc<Mutex<Vec<ChatMessage>>>,
    pub last_prompt: Arc<Mutex<String>>,
    pub last_params: Arc<Mutex<Option<ModelParams>>>,
}

impl RecordingChatLLM {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            completion: None,
            last_messages: Arc::new(Mutex::new(Vec::new())),
            last_prompt: Arc::new(Mutex::new(String::new())),
            last_params: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_completion(mut self, completion: impl Into<String>) -> Self {
        self.completion = Some(completion.into());
        self
    }
}

#[async_trait]
impl ChatProvider for RecordingChatLLM {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        params: &ModelParams,
    ) -> Result<String, LlmError> {
        *self.last_messages.lock() = messages.to_vec();
        *self.last_params.lock() = Some(params.clone());
        Ok(self.response.clone())
    }
}

#[async_trait]
impl CompletionProvider for RecordingChatLLM {
    async fn complete(&self, prompt: &str, params: &ModelParams) -> Result<String, LlmError> {
        *self.last_prompt.lock() = prompt.to_string();
        *self.last_params.lock() = Some(params.clone());
        match &self.completion {
            Some(completion) => Ok(completion.clone()),
            None => Err(LlmError::Provider {
                status: 500,
                message: "recording".to_string(),
            }),
        }
    }
}

/// Replays queued completions and chat responses in order.
///
/// Each queue repeats its last entry once drained, so a single-entry queue
/// behaves like [`FixedLLM`].
#[derive(Debug, Clone)]
pub struct ScriptedLLM {
    completions: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLLM {
    pub fn new(completions: Vec<String>, responses: Vec<String>) -> Self {
        Self {
            completions: Arc::new(Mutex::new(completions)),
            responses: Arc::new(Mutex::new(responses)),
        }
    }
}

fn pop_scripted(queue: &Mutex<Vec<String>>, kind: &str) -> Result<String, LlmError> {
    let mut queue = queue.lock();
    match queue.len() {
        0 => Err(LlmError::Provider {
            status: 500,
            message: format!("scripted {kind} queue is empty"),
        }),
        1 => Ok(queue[0].clone()),
        _ => Ok(queue.remove(0)),
    }
}

#[async_trait]
impl ChatProvider for ScriptedLLM {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _params: &ModelParams,
    ) -> Result<String, LlmError> {
        pop_scripted(&self.responses, "chat")
    }
}

#[async_trait]
impl CompletionProvider for ScriptedLLM {
    async fn complete(&self, _prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
        pop_scripted(&self.completions, "completion")
    }
}

/// Responds only after a fixed delay, for timeout coverage.
#[derive(Debug, Clone)]
pub struct SlowLLM {
    response: String,
    delay: Duration,
}

impl SlowLLM {
    pub fn new(response: impl Into<String>, delay: Duration) -> Self {
        Self {
            response: response.into(),
            delay,
        }
    }
}

#[async_trait]
impl ChatProvider for SlowLLM {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _params: &ModelParams,
    ) -> Result<String, LlmError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}

#[async_trait]
impl CompletionProvider for SlowLLM {
    async fn complete(&self, _prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}
