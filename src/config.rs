//! Compiler configuration.

use std::fmt;
use std::rc::Rc;

use gamescript_compiler::{DynamicCommandHandler, DynamicCommands};
use gamescript_core::CommandPointers;

/// Options for a [`Compiler`](crate::Compiler).
///
/// ```ignore
/// let config = CompilerConfig::new()
///     .with_line_numbers(false)
///     .with_command_pointers(pointers)
///     .with_dynamic_command("queue", Rc::new(ArgumentTypeTrailer::new(2)));
/// ```
#[derive(Clone)]
pub struct CompilerConfig {
    /// Emit `LineNumber` markers.
    pub line_numbers: bool,
    /// Run the pointer analysis after emission.
    pub pointer_checks: bool,
    pub command_pointers: CommandPointers,
    pub dynamic_commands: DynamicCommands,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            pointer_checks: true,
            command_pointers: CommandPointers::new(),
            dynamic_commands: DynamicCommands::default(),
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    pub fn with_pointer_checks(mut self, enabled: bool) -> Self {
        self.pointer_checks = enabled;
        self
    }

    pub fn with_command_pointers(mut self, pointers: CommandPointers) -> Self {
        self.command_pointers = pointers;
        self
    }

    /// Replace code generation for every call of `command`.
    pub fn with_dynamic_command(
        mut self,
        command: impl Into<String>,
        handler: Rc<dyn DynamicCommandHandler>,
    ) -> Self {
        self.dynamic_commands.insert(command.into(), handler);
        self
    }
}

impl fmt::Debug for CompilerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dynamic: Vec<_> = self.dynamic_commands.keys().collect();
        dynamic.sort();
        f.debug_struct("CompilerConfig")
            .field("line_numbers", &self.line_numbers)
            .field("pointer_checks", &self.pointer_checks)
            .field("command_pointers", &self.command_pointers.len())
            .field("dynamic_commands", &dynamic)
            .finish()
    }
}
