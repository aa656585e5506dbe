// src/dag/references.rs

//! Symbol table used to turn task names and file names into task identifiers.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::dag::error::GraphError;
use crate::dag::node::TaskId;

/// Anything a task can refer to.
///
/// Identifiers and textual names live in separate namespaces, so a task named
/// `dv_3` can never be confused with the task whose identifier is `dv_3`.
/// Task names and file names share the textual namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Task(TaskId),
    Name(String),
}

impl Symbol {
    pub fn name(name: impl Into<String>) -> Self {
        Symbol::Name(name.into())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Task(id) => write!(f, "{id}"),
            Symbol::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Maps every known symbol to the symbol it stands for.
///
/// A task identifier always maps to itself; that self-mapping is where
/// resolution stops. Names map to the identifier of the task that *is* or
/// *produces* them.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    refs: HashMap<Symbol, Symbol>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the self-mapping for a task identifier.
    pub fn register_task(&mut self, id: TaskId) {
        self.refs.insert(Symbol::Task(id), Symbol::Task(id));
    }

    /// Register `name -> id`.
    ///
    /// Fails with the symbol the name is already bound to, leaving the table
    /// untouched.
    pub fn register_name(&mut self, name: &str, id: TaskId) -> Result<(), Symbol> {
        match self.refs.entry(Symbol::name(name)) {
            Entry::Occupied(existing) => Err(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(Symbol::Task(id));
                Ok(())
            }
        }
    }

    /// Bind a name to an arbitrary symbol, replacing any previous binding.
    ///
    /// Registration only ever binds names to identifiers; chains and loops
    /// exist only in tables built this way.
    #[cfg(test)]
    fn alias(&mut self, name: impl Into<String>, target: Symbol) {
        self.refs.insert(Symbol::Name(name.into()), target);
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Chase `symbol` through the table until it reaches a task identifier.
    ///
    /// Returns `Ok(None)` when the chain leaves the table (the symbol is
    /// external to the workflow), and [`GraphError::ReferenceCycle`] when a
    /// symbol is revisited before reaching an identifier.
    pub fn resolve(&self, symbol: &Symbol) -> Result<Option<TaskId>, GraphError> {
        let mut current = symbol;
        let mut visited: Vec<&Symbol> = Vec::new();

        loop {
            let Some(next) = self.refs.get(current) else {
                return Ok(None);
            };

            if let Symbol::Task(id) = current {
                if next == current {
                    return Ok(Some(*id));
                }
            }

            if visited.contains(&current) {
                return Err(GraphError::ReferenceCycle {
                    symbol: symbol.to_string(),
                    visited: visited.iter().map(|s| s.to_string()).collect(),
                });
            }

            visited.push(current);
            current = next;
        }
    }
}
