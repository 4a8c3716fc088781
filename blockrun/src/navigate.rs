//! Interactive session navigator.
//!
//! A cooperative state machine walking namespaces, block lists, synthesized
//! forms, execution, and the post-run menu. The only suspension points are
//! prompt calls and block operations; everything in between is synchronous,
//! so the whole session is one plain loop over an explicit state value.
//!
//! There is no quit menu item: the session ends when the registry is empty,
//! or when a prompt becomes unanswerable (closed input stream), which
//! unwinds as an error to the binary edge.

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::namespace::Namespace;
use crate::core::registry::{Block, Registry, first_by_name};
use crate::db::Database;
use crate::error::EngineError;
use crate::form::run_form;
use crate::io::prompt::PromptProvider;
use crate::io::render::render_result;

const RERUN_SAME: &str = "Re-run (same input)";
const RERUN_NEW: &str = "Re-run (new input)";
const RERUN: &str = "Re-run";
const BACK_TO_NAMESPACE: &str = "Go back to namespace";
const MAIN_MENU: &str = "Main menu";

/// Why a session ended on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The registry is empty; there is nothing to navigate.
    NoBlocks,
}

enum State {
    MainMenu { announce: bool },
    NamespaceList,
    EnterNamespace(usize),
    BlockList { namespace: Option<usize> },
    RunBlock {
        block: Block,
        input: Option<Value>,
        namespace: Option<usize>,
    },
}

/// Top-level REPL over a finished registry and its derived namespaces.
pub struct Navigator<'a> {
    registry: &'a Registry,
    namespaces: &'a [Namespace],
    db: &'a mut dyn Database,
    prompt: &'a mut dyn PromptProvider,
    page_size: usize,
}

impl<'a> Navigator<'a> {
    pub fn new(
        registry: &'a Registry,
        namespaces: &'a [Namespace],
        db: &'a mut dyn Database,
        prompt: &'a mut dyn PromptProvider,
        page_size: usize,
    ) -> Self {
        Self {
            registry,
            namespaces,
            db,
            prompt,
            page_size,
        }
    }

    /// Drive the session until it ends on its own or a prompt fails.
    pub fn run(&mut self) -> Result<SessionEnd> {
        let mut state = State::MainMenu { announce: true };
        loop {
            state = match state {
                State::MainMenu { announce } => {
                    if self.registry.is_empty() {
                        println!("No blocks loaded.");
                        return Ok(SessionEnd::NoBlocks);
                    }
                    match self.namespaces.len() {
                        0 => {
                            if announce {
                                println!(
                                    "{} blocks loaded. No namespaces loaded.\n",
                                    self.registry.len()
                                );
                            }
                            State::BlockList { namespace: None }
                        }
                        1 => {
                            if announce {
                                println!("1 namespace loaded.\n");
                            }
                            State::EnterNamespace(0)
                        }
                        count => {
                            if announce {
                                println!(
                                    "{} blocks loaded. {count} namespaces loaded.\n",
                                    self.registry.len()
                                );
                            }
                            State::NamespaceList
                        }
                    }
                }

                State::NamespaceList => {
                    let names: Vec<String> =
                        self.namespaces.iter().map(|n| n.name.clone()).collect();
                    let chosen = self.prompt.select("Select a namespace to open", &names)?;
                    // First match by name, mirroring the registry's
                    // duplicate-name policy.
                    let index = self
                        .namespaces
                        .iter()
                        .position(|n| n.name == names[chosen])
                        .unwrap_or(chosen);
                    State::EnterNamespace(index)
                }

                State::EnterNamespace(index) => {
                    let namespace = &self.namespaces[index];
                    println!(
                        "Opening namespace: {} ({} blocks)\n",
                        namespace.name,
                        namespace.blocks.len()
                    );
                    State::BlockList {
                        namespace: Some(index),
                    }
                }

                State::BlockList { namespace } => {
                    let scoped: Vec<Block> = match namespace {
                        Some(index) => self.namespaces[index].blocks.clone(),
                        None => self.registry.all(),
                    };
                    let names: Vec<String> = scoped.iter().map(|b| b.name.clone()).collect();
                    let chosen = self.prompt.select("Select a block to run", &names)?;
                    let block = first_by_name(&scoped, &names[chosen])
                        .ok_or_else(|| EngineError::BlockNotFound(names[chosen].clone()))?
                        .clone();
                    State::RunBlock {
                        block,
                        input: None,
                        namespace,
                    }
                }

                State::RunBlock {
                    block,
                    input,
                    namespace,
                } => {
                    let input = match input {
                        Some(value) => Some(value),
                        None => match &block.schema {
                            Some(schema) => run_form(self.prompt, schema)?,
                            None => Some(Value::Object(Map::new())),
                        },
                    };
                    match input {
                        // Unsupported field kind unwound the form: back to
                        // the scoped block list.
                        None => State::BlockList { namespace },
                        Some(input) => {
                            if block.danger
                                && !self
                                    .prompt
                                    .confirm("Are you sure you want to run this block?", false)?
                            {
                                println!("Block execution cancelled.");
                                State::BlockList { namespace }
                            } else {
                                self.execute(&block, &input);
                                println!();
                                self.post_run(block, input, namespace)?
                            }
                        }
                    }
                }
            };
        }
    }

    /// Invoke the block's operations, printing failures instead of
    /// propagating them: a failed operation never aborts the session.
    fn execute(&mut self, block: &Block, input: &Value) {
        debug!(block = %block.name, "executing block");
        if let Err(err) = self.invoke(block, input) {
            eprintln!("error running block:\n{err:#}");
        }
    }

    fn invoke(&mut self, block: &Block, input: &Value) -> Result<()> {
        if let Some(op) = &block.query {
            let result = self.db.query(op, input)?;
            render_result(self.prompt, &result, self.page_size)?;
        }
        if let Some(op) = &block.run {
            self.db.run(op, input)?;
            println!("Block executed successfully.");
        }
        Ok(())
    }

    fn post_run(
        &mut self,
        block: Block,
        input: Value,
        namespace: Option<usize>,
    ) -> Result<State> {
        let mut choices = Vec::new();
        if block.schema.is_some() {
            choices.push(RERUN_SAME.to_string());
            choices.push(RERUN_NEW.to_string());
        } else {
            choices.push(RERUN.to_string());
        }
        if namespace.is_some() {
            choices.push(BACK_TO_NAMESPACE.to_string());
        }
        choices.push(MAIN_MENU.to_string());

        let chosen = self.prompt.select("Choose an action:", &choices)?;
        let next = match (choices[chosen].as_str(), namespace) {
            (RERUN_SAME | RERUN, _) => State::RunBlock {
                block,
                input: Some(input),
                namespace,
            },
            (RERUN_NEW, _) => State::RunBlock {
                block,
                input: None,
                namespace,
            },
            (BACK_TO_NAMESPACE, Some(index)) => State::EnterNamespace(index),
            _ => State::MainMenu { announce: false },
        };
        Ok(next)
    }
}
