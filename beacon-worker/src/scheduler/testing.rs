//! In-memory collaborators for sweep tests

use async_trait::async_trait;
use beacon_client::{ClientError, Result};
use beacon_core::domain::item::{Extension, NftInfo, TaskDescriptor};
use beacon_core::dto::execute::{ExecuteMsg, TxReceipt};
use beacon_core::ids::TaskId;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::repository::{CompletionEngine, ComputeEngine, Ledger};

/// One registered item: its payload plus the task ids still pending
#[derive(Debug, Clone, Default)]
pub struct FakeItem {
    pub extension: Extension,
    pub remains: Vec<String>,
}

impl FakeItem {
    pub fn new(code: &str) -> Self {
        Self {
            extension: Extension {
                code: code.to_string(),
                ..Default::default()
            },
            remains: Vec::new(),
        }
    }

    /// Adds a pending task
    pub fn task(mut self, tid: &str, input: &str) -> Self {
        self.extension
            .tasks
            .insert(tid.to_string(), TaskDescriptor::new(tid, input));
        self.remains.push(tid.to_string());
        self
    }

    /// Adds a pending task whose id the contract reports as an integer
    pub fn numbered_task(mut self, tid: u64, input: &str) -> Self {
        self.extension
            .tasks
            .insert(tid.to_string(), TaskDescriptor::new(TaskId::Number(tid), input));
        self.remains.push(tid.to_string());
        self
    }

    /// Adds a task that already has a committed output
    pub fn answered(mut self, tid: &str, input: &str) -> Self {
        self.extension
            .tasks
            .insert(tid.to_string(), TaskDescriptor::new(tid, input));
        self
    }

    /// Reports a pending task id that has no descriptor
    pub fn orphan(mut self, tid: &str) -> Self {
        self.remains.push(tid.to_string());
        self
    }

    pub fn described(mut self, title: &str, description: &str) -> Self {
        self.extension.title = Some(title.to_string());
        self.extension.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    items: Vec<FakeItem>,
    commits: Vec<ExecuteMsg>,
    fail_discovery: bool,
    hang_discovery: bool,
    fail_details: bool,
    fail_remains: bool,
    hang_remains: bool,
    reject_commits: bool,
    hang_commits: bool,
}

/// Ledger that applies commits to its own state, like the contract does
#[derive(Debug, Default)]
pub struct FakeLedger {
    state: Mutex<LedgerState>,
}

impl FakeLedger {
    pub fn new(items: Vec<FakeItem>) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                items,
                ..Default::default()
            }),
        }
    }

    pub fn failing_discovery(self) -> Self {
        self.state.lock().unwrap().fail_discovery = true;
        self
    }

    pub fn hanging_discovery(self) -> Self {
        self.state.lock().unwrap().hang_discovery = true;
        self
    }

    pub fn failing_details(self) -> Self {
        self.state.lock().unwrap().fail_details = true;
        self
    }

    pub fn failing_remains(self) -> Self {
        self.state.lock().unwrap().fail_remains = true;
        self
    }

    pub fn hanging_remains(self) -> Self {
        self.state.lock().unwrap().hang_remains = true;
        self
    }

    pub fn hanging_commits(self) -> Self {
        self.state.lock().unwrap().hang_commits = true;
        self
    }

    pub fn rejecting_commits(self) -> Self {
        self.state.lock().unwrap().reject_commits = true;
        self
    }

    pub fn accept_commits(&self) {
        self.state.lock().unwrap().reject_commits = false;
    }

    /// Accepted messages in commit order
    pub fn commits(&self) -> Vec<ExecuteMsg> {
        self.state.lock().unwrap().commits.clone()
    }

    pub fn remains_of(&self, token_id: usize) -> Vec<String> {
        self.state.lock().unwrap().items[token_id].remains.clone()
    }

    pub fn extension_of(&self, token_id: usize) -> Extension {
        self.state.lock().unwrap().items[token_id].extension.clone()
    }

    fn with_item<T>(&self, token_id: &str, f: impl FnOnce(&mut FakeItem) -> T) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        token_id
            .parse::<usize>()
            .ok()
            .and_then(|index| state.items.get_mut(index))
            .map(f)
            .ok_or_else(|| ClientError::api_error(404, format!("token {} not found", token_id)))
    }

    /// Fails or never returns according to the `(fail, hang)` flags picked by `flags`
    async fn gate(&self, flags: impl FnOnce(&LedgerState) -> (bool, bool)) -> Result<()> {
        let (fail, hang) = flags(&self.state.lock().unwrap());
        if hang {
            std::future::pending::<()>().await;
        }
        if fail {
            return Err(ClientError::api_error(503, "gateway unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn num_tokens(&self) -> Result<u64> {
        self.gate(|s| (s.fail_discovery, s.hang_discovery)).await?;
        Ok(self.state.lock().unwrap().items.len() as u64)
    }

    async fn remains(&self, token_id: &str) -> Result<Vec<String>> {
        self.gate(|s| (s.fail_remains, s.hang_remains)).await?;
        self.with_item(token_id, |item| item.remains.clone())
    }

    async fn incomplete_projects(&self) -> Result<Vec<String>> {
        self.gate(|s| (s.fail_discovery, s.hang_discovery)).await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.extension.has_metadata())
            .map(|(index, _)| index.to_string())
            .collect())
    }

    async fn nft_info(&self, token_id: &str) -> Result<NftInfo> {
        if self.state.lock().unwrap().fail_details {
            return Err(ClientError::api_error(500, "query failed"));
        }
        self.with_item(token_id, |item| NftInfo {
            extension: item.extension.clone(),
        })
    }

    async fn execute(&self, msg: &ExecuteMsg) -> Result<TxReceipt> {
        self.gate(|s| (false, s.hang_commits)).await?;
        if self.state.lock().unwrap().reject_commits {
            return Err(ClientError::TxRejected {
                txhash: "REJECTED".to_string(),
                code: 5,
                log: "insufficient funds".to_string(),
            });
        }

        match msg {
            ExecuteMsg::Response {
                token_id, task_id, ..
            } => self.with_item(token_id, |item| {
                let task_id = task_id.to_string();
                item.remains.retain(|tid| *tid != task_id)
            })?,
            ExecuteMsg::Update {
                token_id,
                title,
                description,
            } => self.with_item(token_id, |item| {
                item.extension.title = Some(title.clone());
                item.extension.description = Some(description.clone());
            })?,
        }

        let mut state = self.state.lock().unwrap();
        state.commits.push(msg.clone());
        Ok(TxReceipt {
            transaction_hash: format!("TX{}", state.commits.len()),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ComputeMode {
    /// Answers with the inputs it was given
    Echo,
    /// Fails as if the sandbox were unreachable
    Down,
    /// Never answers
    Hang,
}

/// Sandbox that records every call
#[derive(Debug)]
pub struct FakeCompute {
    mode: ComputeMode,
    calls: Mutex<Vec<(String, JsonValue)>>,
}

impl FakeCompute {
    pub fn new(mode: ComputeMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(code, inputs)` of each call in order
    pub fn calls(&self) -> Vec<(String, JsonValue)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComputeEngine for FakeCompute {
    async fn run(&self, code: &str, inputs: &JsonValue) -> Result<JsonValue> {
        self.calls
            .lock()
            .unwrap()
            .push((code.to_string(), inputs.clone()));

        match self.mode {
            ComputeMode::Echo => Ok(inputs.clone()),
            ComputeMode::Down => Err(ClientError::api_error(502, "sandbox unreachable")),
            ComputeMode::Hang => std::future::pending().await,
        }
    }
}

/// Completion service answering from a script; `None` entries fail
#[derive(Debug)]
pub struct FakeCompletion {
    script: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
    hang: bool,
}

impl FakeCompletion {
    pub fn scripted(answers: Vec<Option<&str>>) -> Self {
        Self {
            script: Mutex::new(
                answers
                    .into_iter()
                    .map(|answer| answer.map(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
            hang: false,
        }
    }

    /// Never answers
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::scripted(Vec::new())
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionEngine for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.hang {
            return std::future::pending().await;
        }

        match self.script.lock().unwrap().pop_front() {
            Some(Some(content)) => Ok(content),
            Some(None) => Err(ClientError::api_error(429, "rate limited")),
            None => Ok("I cannot help with that.".to_string()),
        }
    }
}
