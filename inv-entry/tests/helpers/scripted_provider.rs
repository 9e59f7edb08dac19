//! Scripted suggestion provider
//!
//! Responses are keyed by (level, parent value), where the parent value is
//! the last selected entry of the request context. Keying on the context
//! rather than call order keeps tests deterministic no matter which spawned
//! fetch reaches the provider first.

use async_trait::async_trait;
use inv_entry::{ProviderError, SelectionContext, SuggestionProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted behaviour for one request key
#[derive(Clone)]
pub enum Script {
    Respond(Vec<String>),
    Fail(ProviderError),
    /// Wait for the gate, then respond
    Gated(Arc<Notify>, Vec<String>),
    /// Never complete
    Hang,
}

/// Recorded provider call
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    Options {
        level: String,
        context: SelectionContext,
    },
    Identifier {
        seed: String,
    },
}

#[derive(Default)]
pub struct ScriptedProvider {
    options: HashMap<(String, Option<String>), Script>,
    identifiers: HashMap<String, Script>,
    calls: Mutex<Vec<ProviderCall>>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `level` requests whose parent is `parent` with `options`
    pub fn respond(self, level: &str, parent: Option<&str>, options: &[&str]) -> Self {
        self.script(level, parent, Script::Respond(owned(options)))
    }

    pub fn fail(self, level: &str, parent: Option<&str>, error: ProviderError) -> Self {
        self.script(level, parent, Script::Fail(error))
    }

    pub fn gated(self, level: &str, parent: Option<&str>, gate: Arc<Notify>, options: &[&str]) -> Self {
        self.script(level, parent, Script::Gated(gate, owned(options)))
    }

    pub fn hang(self, level: &str, parent: Option<&str>) -> Self {
        self.script(level, parent, Script::Hang)
    }

    pub fn script(mut self, level: &str, parent: Option<&str>, script: Script) -> Self {
        self.options
            .insert((level.to_string(), parent.map(str::to_string)), script);
        self
    }

    /// Script the identifier call for `seed`
    pub fn identifier(mut self, seed: &str, script: Script) -> Self {
        self.identifiers.insert(seed.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Contexts of every options request for `level`, in call order
    pub fn contexts_for(&self, level: &str) -> Vec<SelectionContext> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Options { level: l, context } if l == level => Some(context),
                _ => None,
            })
            .collect()
    }

    pub fn identifier_seeds(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Identifier { seed } => Some(seed),
                _ => None,
            })
            .collect()
    }

    async fn run(script: Option<Script>, default: Vec<String>) -> Result<Vec<String>, ProviderError> {
        match script {
            None => Ok(default),
            Some(Script::Respond(options)) => Ok(options),
            Some(Script::Fail(error)) => Err(error),
            Some(Script::Gated(gate, options)) => {
                gate.notified().await;
                Ok(options)
            }
            Some(Script::Hang) => std::future::pending().await,
        }
    }
}

#[async_trait]
impl SuggestionProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    async fn fetch_options(
        &self,
        level: &str,
        context: &SelectionContext,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls.lock().unwrap().push(ProviderCall::Options {
            level: level.to_string(),
            context: context.clone(),
        });

        let parent = context.selected().last().map(|(_, value)| value.to_string());
        let script = self.options.get(&(level.to_string(), parent)).cloned();
        Self::run(script, vec![format!("{}-1", level), format!("{}-2", level)]).await
    }

    async fn fetch_identifier(&self, seed: &str) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(ProviderCall::Identifier {
            seed: seed.to_string(),
        });

        let script = self.identifiers.get(seed).cloned();
        let options = Self::run(script, vec![format!("ID-{}", seed)]).await?;
        options
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("empty identifier script".to_string()))
    }
}
