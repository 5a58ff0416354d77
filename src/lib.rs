//! gamescript
//!
//! Compiler back end for server-side game scripts. Takes type-resolved
//! script trees, emits labeled bytecode blocks and checks that engine
//! pointers (active player, active npc, ...) are never left corrupted when a
//! script exits.
//!
//! The pipeline runs in phases. Each phase accumulates [`Diagnostics`]; a
//! phase that reports an error stops the pipeline before the next one.
//!
//! ```ignore
//! let compiler = Compiler::new(CompilerConfig::new().with_command_pointers(pointers));
//! let output = compiler.compile(&[file], &symbols);
//! for diagnostic in &output.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! ```

mod config;

use std::fmt;

use gamescript_analysis::PointerChecker;
use gamescript_ast::ScriptFile;
use gamescript_compiler::{CodeGenerator, CompiledScript};
use gamescript_core::{Diagnostics, SymbolTable};
use thiserror::Error;
use tracing::{debug, info};

pub use config::CompilerConfig;

/// A stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Emission,
    PointerAnalysis,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Emission => "emission",
            Phase::PointerAnalysis => "pointer analysis",
        })
    }
}

/// Compilation stopped with errors.
#[derive(Debug, Error)]
#[error("{phase} failed with {errors} error(s)")]
pub struct CompilationFailed {
    pub phase: Phase,
    pub errors: usize,
    pub diagnostics: Diagnostics,
}

/// Everything a compilation run produced.
#[derive(Debug, Default)]
pub struct CompilationOutput {
    /// Every script emitted without error, in file then declaration order.
    pub scripts: Vec<CompiledScript>,
    pub diagnostics: Diagnostics,
    /// The phase that reported errors, if any.
    pub failed_phase: Option<Phase>,
}

impl CompilationOutput {
    pub fn is_success(&self) -> bool {
        self.failed_phase.is_none()
    }

    pub fn script(&self, name: &str) -> Option<&CompiledScript> {
        self.scripts.iter().find(|s| s.symbol.name == name)
    }

    /// The scripts, or the diagnostics of the failing phase.
    pub fn into_result(self) -> Result<Vec<CompiledScript>, CompilationFailed> {
        match self.failed_phase {
            None => Ok(self.scripts),
            Some(phase) => Err(CompilationFailed {
                phase,
                errors: self.diagnostics.error_count(),
                diagnostics: self.diagnostics,
            }),
        }
    }
}

/// Runs emission and then pointer analysis over a set of files.
#[derive(Debug, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `files` as one unit: calls between scripts of different files
    /// are analyzed with each other's effects.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, files: &[ScriptFile<'_>], symbols: &SymbolTable) -> CompilationOutput {
        let mut output = CompilationOutput::default();

        let mut generator = CodeGenerator::new(symbols)
            .with_line_numbers(self.config.line_numbers)
            .with_dynamic_commands(self.config.dynamic_commands.clone());
        for file in files {
            let result = generator.generate(file);
            debug!(
                file = file.name,
                scripts = result.scripts.len(),
                errors = result.diagnostics.error_count(),
                "emitted file"
            );
            output.scripts.extend(result.scripts);
            output.diagnostics.extend(result.diagnostics);
        }

        if output.diagnostics.has_errors() {
            info!(
                errors = output.diagnostics.error_count(),
                "emission failed, skipping pointer analysis"
            );
            output.failed_phase = Some(Phase::Emission);
            return output;
        }

        if self.config.pointer_checks {
            let diagnostics = self.check_pointers(&output.scripts);
            if diagnostics.has_errors() {
                output.failed_phase = Some(Phase::PointerAnalysis);
            }
            output.diagnostics.extend(diagnostics);
        }

        info!(
            scripts = output.scripts.len(),
            success = output.is_success(),
            "compilation finished"
        );
        output
    }

    /// Run only the pointer analysis over already emitted scripts.
    pub fn check_pointers(&self, scripts: &[CompiledScript]) -> Diagnostics {
        let mut checker = PointerChecker::new(&self.config.command_pointers);
        checker.add_scripts(scripts);
        checker.check_all()
    }
}
