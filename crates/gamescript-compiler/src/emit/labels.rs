//! Unique block labels.

use rustc_hash::FxHashMap;

use crate::bytecode::Label;

/// Name of the first block of every script. Never suffixed.
pub const ENTRY: &str = "entry";

/// Produces `name_N` labels with a counter per base name.
#[derive(Debug, Default)]
pub struct LabelGenerator {
    counters: FxHashMap<String, u32>,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, name: &str) -> Label {
        let counter = self.counters.entry(name.to_string()).or_insert(0);
        let label = Label::new(&format!("{name}_{counter}"));
        *counter += 1;
        label
    }

    /// Forget all counters. Called at the start of every script.
    pub fn reset(&mut self) {
        self.counters.clear();
    }
}
