//! The reasoning loop
//!
//! One run owns its conversation. Each step sends the whole conversation and
//! the catalog's declarations to the model, then either finishes with the
//! model's answer or invokes the single operation it asked for and feeds the
//! outcome back as a tool-role message.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::logging::Logger;
use crate::providers::{complete_within, ChatOptions, Provider, ProviderModelConfig};
use crate::tools::{ToolBridge, ToolError};
use crate::types::{ChatMessage, ModelReply, Tool, ToolCall, ToolResult};

use super::decision::{parse_reply, ModelDecision};
use super::error::{AgentError, AgentResult};
use super::state::AgentState;

/// Per-run model and limits
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub model: ProviderModelConfig,
    pub options: ChatOptions,
    /// Maximum model round-trips per run
    pub max_steps: usize,
    /// Sent ahead of the conversation on every step, never stored in it
    pub system_prompt: Option<String>,
    pub generation_timeout: Duration,
}

impl AgentConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model: settings.agent.model.config.clone(),
            options: settings.agent.model.options(),
            max_steps: settings.agent.max_steps,
            system_prompt: settings.agent.system_prompt.clone(),
            generation_timeout: settings.timeouts.generation,
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub answer: String,
    /// Full conversation: user request, model turns and tool results
    pub messages: Vec<ChatMessage>,
    /// Model round-trips taken
    pub steps: usize,
    /// Invocation failures the model was shown along the way
    pub tool_failures: Vec<ToolError>,
}

pub struct Agent {
    provider: Arc<dyn Provider>,
    bridge: Arc<ToolBridge>,
    config: AgentConfig,
    logger: Arc<dyn Logger>,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn Provider>,
        bridge: Arc<ToolBridge>,
        config: AgentConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            bridge,
            config,
            logger,
        }
    }

    /// Drive one request to a final answer
    pub async fn run(&self, request: &str) -> AgentResult<RunOutcome> {
        let tools = self.bridge.catalog().to_llm_tools();
        let mut messages = vec![ChatMessage::user(request)];
        let mut tool_failures = Vec::new();
        let mut steps = 0;
        let mut state = AgentState::AwaitingModel;

        self.logger.info(&format!(
            "[Agent] Run started with {} operation(s) available",
            tools.len()
        ));

        loop {
            self.logger.debug(&format!("[Agent] step {} state {}", steps, state.name()));

            state = match state {
                AgentState::AwaitingModel => {
                    if steps >= self.config.max_steps {
                        self.logger.warn(&format!(
                            "[Agent] Giving up after {} model round-trips",
                            self.config.max_steps
                        ));
                        return Err(AgentError::StepLimitExceeded {
                            limit: self.config.max_steps,
                        });
                    }
                    steps += 1;
                    AgentState::ModelResponded(self.ask_model(&messages, &tools, steps).await?)
                }

                AgentState::ModelResponded(reply) => {
                    let parsed = parse_reply(reply).ok_or(AgentError::EmptyReply { step: steps })?;
                    if !parsed.dropped.is_empty() {
                        let names: Vec<_> = parsed.dropped.iter().map(|c| c.name.as_str()).collect();
                        self.logger.warn(&format!(
                            "[Agent] One operation per step; ignoring [{}]",
                            names.join(", ")
                        ));
                    }

                    match parsed.decision {
                        ModelDecision::Answer(text) => {
                            messages.push(ChatMessage::assistant(text.clone()));
                            AgentState::Done(text)
                        }
                        ModelDecision::CallTool(call) => {
                            messages.push(ChatMessage::assistant_tool_call(&call));
                            AgentState::InvokingTool(call)
                        }
                    }
                }

                AgentState::InvokingTool(call) => {
                    AgentState::ToolResultReceived(self.invoke(&call, &mut tool_failures).await)
                }

                AgentState::ToolResultReceived(result) => {
                    messages.push(ChatMessage::tool_result(&result));
                    AgentState::AwaitingModel
                }

                AgentState::Done(answer) => {
                    self.logger.info(&format!("[Agent] Done after {} step(s)", steps));
                    return Ok(RunOutcome {
                        answer,
                        messages,
                        steps,
                        tool_failures,
                    });
                }
            };
        }
    }

    async fn ask_model(&self, messages: &[ChatMessage], tools: &[Tool], step: usize) -> AgentResult<ModelReply> {
        let mut request = Vec::with_capacity(messages.len() + 1);
        if let Some(prompt) = &self.config.system_prompt {
            request.push(ChatMessage::system(prompt.clone()));
        }
        request.extend_from_slice(messages);

        let mut options = self.config.options.clone();
        if !tools.is_empty() {
            options = options.with_tools(tools.to_vec());
        }

        complete_within(
            self.provider.as_ref(),
            request,
            self.config.model.clone(),
            options,
            self.config.generation_timeout,
        )
        .await
        .map_err(|source| {
            self.logger.error(&format!("[Agent] Generation failed: {}", source));
            AgentError::GenerationFailed { step, source }
        })
    }

    /// Invoke through the bridge; every failure becomes a tool-role error
    async fn invoke(&self, call: &ToolCall, failures: &mut Vec<ToolError>) -> ToolResult {
        match self.bridge.invoke(&call.name, call.input.clone()).await {
            Ok(output) => ToolResult::success(&call.id, output.content),
            Err(err) => {
                self.logger.warn(&format!("[Agent] {}", err));
                let result = ToolResult::error(&call.id, err.to_string());
                failures.push(err);
                result
            }
        }
    }
}
