// The scope stack: each `scope_of` pushes an end-of-scope regex that makes
// `at_eos` true once the cursor reaches it, so inner `list_of`/`sequence_of`
// calls terminate cleanly at the closer instead of running past it.

use regex::Regex;

#[derive(Default)]
pub struct ScopeStack {
    entries: Vec<Regex>,
}

impl ScopeStack {
    pub fn push(&mut self, stop: Regex) {
        self.entries.push(stop);
    }

    pub fn pop(&mut self) {
        self.entries.pop().expect("scope popped without a matching push");
    }

    /// The innermost active end-of-scope pattern, if any scope is open.
    pub fn current(&self) -> Option<&Regex> {
        self.entries.last()
    }

    /// Number of active nested scopes, excluding the implicit root.
    pub fn level(&self) -> usize {
        self.entries.len()
    }
}
