//! Test-only helpers: scripted prompts and fake databases.

use std::collections::VecDeque;

use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::db::Database;
use crate::io::prompt::{PromptProvider, Validator};

/// One scripted answer for a [`ScriptedPrompt`].
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer a free-text question verbatim.
    Input(&'static str),
    /// Pick the choice with this exact label from a select list.
    Select(&'static str),
    /// Answer a confirm question.
    Confirm(bool),
}

/// Deterministic prompt provider driven by a fixed reply script.
///
/// Replies are consumed in order; a reply of the wrong kind or a select label
/// missing from the offered choices panics (the test script is wrong). An
/// input reply a validator rejects re-asks, consuming the next reply, per the
/// provider contract. An exhausted script returns an error, which is how
/// navigator tests end a session that would otherwise loop forever.
#[derive(Debug)]
pub struct ScriptedPrompt {
    replies: VecDeque<Reply>,
    /// Every question asked, in order, for assertions on the flow.
    pub transcript: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            transcript: Vec::new(),
        }
    }

    fn next_reply(&mut self, message: &str) -> Result<Reply> {
        self.transcript.push(message.to_string());
        self.replies
            .pop_front()
            .ok_or_else(|| anyhow!("prompt script exhausted at '{message}'"))
    }
}

impl PromptProvider for ScriptedPrompt {
    fn input(&mut self, message: &str, validate: Option<Validator<'_>>) -> Result<String> {
        loop {
            match self.next_reply(message)? {
                Reply::Input(answer) => {
                    if let Some(check) = validate
                        && check(answer).is_err()
                    {
                        continue;
                    }
                    return Ok(answer.to_string());
                }
                other => panic!("expected Input reply for '{message}', got {other:?}"),
            }
        }
    }

    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        match self.next_reply(message)? {
            Reply::Select(label) => {
                let index = choices.iter().position(|c| c == label).unwrap_or_else(|| {
                    panic!("choice '{label}' not offered for '{message}': {choices:?}")
                });
                Ok(index)
            }
            other => panic!("expected Select reply for '{message}', got {other:?}"),
        }
    }

    fn confirm(&mut self, message: &str, _default: bool) -> Result<bool> {
        match self.next_reply(message)? {
            Reply::Confirm(answer) => Ok(answer),
            other => panic!("expected Confirm reply for '{message}', got {other:?}"),
        }
    }
}

/// Recorded call against a [`FakeDb`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub op: String,
    pub input: Value,
}

/// In-memory database double recording every call.
///
/// Query results are served from a queue; when the queue is empty, queries
/// return an empty array and runs succeed.
#[derive(Debug, Default)]
pub struct FakeDb {
    pub queries: Vec<RecordedCall>,
    pub runs: Vec<RecordedCall>,
    pub query_results: VecDeque<Result<Value>>,
    pub run_results: VecDeque<Result<()>>,
}

impl FakeDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue up canned query results, served in order.
    pub fn with_query_results(results: impl IntoIterator<Item = Result<Value>>) -> Self {
        Self {
            query_results: results.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Database for FakeDb {
    fn query(&mut self, op: &str, input: &Value) -> Result<Value> {
        self.queries.push(RecordedCall {
            op: op.to_string(),
            input: input.clone(),
        });
        self.query_results
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Array(Vec::new())))
    }

    fn run(&mut self, op: &str, input: &Value) -> Result<()> {
        self.runs.push(RecordedCall {
            op: op.to_string(),
            input: input.clone(),
        });
        self.run_results.pop_front().unwrap_or(Ok(()))
    }
}
