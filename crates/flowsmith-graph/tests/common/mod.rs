//! Shared test doubles for engine tests

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use flowsmith_graph::nodes::CONDITION_SYSTEM_INSTRUCTION;
use flowsmith_graph::TextGenerator;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Transform { system: String, user: String },
    Condition { user: String },
}

type Reply = dyn Fn(&Call) -> Result<String> + Send + Sync;

/// Generator whose replies come from a closure; every call is logged
pub struct ScriptedGenerator {
    reply: Box<Reply>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGenerator {
    pub fn new(reply: impl Fn(&Call) -> Result<String> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn transform_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Transform { .. }))
            .count()
    }

    pub fn condition_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Condition { .. }))
            .count()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, system_instruction: &str, user_message: &str) -> Result<String> {
        let call = if system_instruction == CONDITION_SYSTEM_INSTRUCTION {
            Call::Condition { user: user_message.to_string() }
        } else {
            Call::Transform {
                system: system_instruction.to_string(),
                user: user_message.to_string(),
            }
        };
        self.calls.lock().unwrap().push(call.clone());
        (self.reply)(&call)
    }
}

/// Transforms answer with a fixed text, conditions always with `verdict`
pub fn fixed(transform_reply: &'static str, verdict: &'static str) -> Arc<ScriptedGenerator> {
    ScriptedGenerator::new(move |call| match call {
        Call::Transform { .. } => Ok(transform_reply.to_string()),
        Call::Condition { .. } => Ok(verdict.to_string()),
    })
}

/// Transforms echo their rendered system instruction
pub fn echo_prompt(verdict: &'static str) -> Arc<ScriptedGenerator> {
    ScriptedGenerator::new(move |call| match call {
        Call::Transform { system, .. } => Ok(system.clone()),
        Call::Condition { .. } => Ok(verdict.to_string()),
    })
}
