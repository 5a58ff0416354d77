//! Shared helpers for the integration tests: symbol shorthands, a compile
//! wrapper and a small interpreter that runs emitted instructions.

#![allow(dead_code)]

use std::rc::Rc;

use gamescript_ast::ScriptDecl;
use gamescript_compiler::bytecode::Constant;
use gamescript_compiler::{CodeGenerator, CompiledScript, Instruction, Opcode, Operand};
use gamescript_core::{BaseVarType, CommandSymbol, ScriptSymbol, SymbolTable, Trigger, Type};
use rustc_hash::FxHashMap;

pub fn command(name: &str, parameters: Vec<Type>, returns: Vec<Type>) -> Rc<CommandSymbol> {
    Rc::new(CommandSymbol::new(name, parameters, returns))
}

pub fn proc(name: &str, parameters: Vec<Type>, returns: Vec<Type>) -> Rc<ScriptSymbol> {
    Rc::new(ScriptSymbol::new(Trigger::Proc, name, parameters, returns))
}

/// Compile one script without line markers.
pub fn compile(decl: &ScriptDecl<'_>) -> CompiledScript {
    let symbols = SymbolTable::new();
    let mut generator = CodeGenerator::new(&symbols).with_line_numbers(false);
    generator.generate_script(decl).unwrap()
}

/// `label:` lines followed by that block's instructions.
pub fn layout(script: &CompiledScript) -> Vec<String> {
    let mut lines = Vec::new();
    for block in &script.blocks {
        lines.push(format!("{}:", block.label));
        lines.extend(block.instructions.iter().map(|i| i.to_string()));
    }
    lines
}

/// What a run of [`Interpreter`] observed.
#[derive(Debug, Default)]
pub struct Run {
    /// Commands and calls in execution order, e.g. `mes(hello)`.
    pub trace: Vec<String>,
    pub ints: Vec<i32>,
    pub strings: Vec<String>,
    pub longs: Vec<i64>,
    pub int_locals: FxHashMap<String, i32>,
    pub arrays: FxHashMap<String, Vec<i32>>,
    pub vars: FxHashMap<String, i32>,
}

impl Run {
    pub fn called(&self, name: &str) -> bool {
        self.trace
            .iter()
            .any(|entry| entry == name || entry.starts_with(&format!("{name}(")))
    }
}

/// Executes a single compiled script.
///
/// Commands are recorded in the trace and return the value configured with
/// [`with_result`](Self::with_result), or zero. Calls to other scripts are
/// recorded and produce default values.
pub struct Interpreter<'s> {
    script: &'s CompiledScript,
    code: Vec<&'s Instruction>,
    labels: FxHashMap<String, usize>,
    results: FxHashMap<String, i32>,
    run: Run,
}

const STEP_LIMIT: usize = 10_000;

impl<'s> Interpreter<'s> {
    pub fn new(script: &'s CompiledScript) -> Self {
        let mut code = Vec::new();
        let mut labels = FxHashMap::default();
        for block in &script.blocks {
            labels.insert(block.label.name().to_string(), code.len());
            code.extend(block.instructions.iter());
        }
        Self {
            script,
            code,
            labels,
            results: FxHashMap::default(),
            run: Run::default(),
        }
    }

    pub fn with_result(mut self, command: &str, value: i32) -> Self {
        self.results.insert(command.to_string(), value);
        self
    }

    pub fn with_local(mut self, name: &str, value: i32) -> Self {
        self.run.int_locals.insert(name.to_string(), value);
        self
    }

    pub fn run(mut self) -> Run {
        let mut pc = 0;
        for _ in 0..STEP_LIMIT {
            let Some(&instruction) = self.code.get(pc) else {
                panic!("ran off the end of {}", self.script.symbol);
            };
            pc += 1;
            match self.step(instruction) {
                Flow::Next => {}
                Flow::Goto(target) => pc = target,
                Flow::Stop => return self.run,
            }
        }
        panic!("{} did not finish within {STEP_LIMIT} steps", self.script.symbol);
    }

    fn target(&self, instruction: &Instruction) -> usize {
        let label = instruction.label().expect("branch without label");
        self.labels[label.name()]
    }

    fn int(&mut self) -> i32 {
        self.run.ints.pop().expect("int stack underflow")
    }

    fn string(&mut self) -> String {
        self.run.strings.pop().expect("string stack underflow")
    }

    fn long(&mut self) -> i64 {
        self.run.longs.pop().expect("long stack underflow")
    }

    fn push_default(&mut self, ty: Type, command: &str) {
        match ty.base_type() {
            Some(BaseVarType::Integer) => {
                let value = self.results.get(command).copied().unwrap_or(0);
                self.run.ints.push(value);
            }
            Some(BaseVarType::String) => self.run.strings.push(String::new()),
            Some(BaseVarType::Long) => self.run.longs.push(0),
            None => {}
        }
    }

    fn call(&mut self, name: &str, parameters: &[Type], returns: &[Type]) {
        let mut args = Vec::new();
        for ty in parameters.iter().rev() {
            match ty.base_type() {
                Some(BaseVarType::Integer) => args.push(self.int().to_string()),
                Some(BaseVarType::String) => args.push(self.string()),
                Some(BaseVarType::Long) => args.push(self.long().to_string()),
                None => {}
            }
        }
        args.reverse();

        if args.is_empty() {
            self.run.trace.push(name.to_string());
        } else {
            self.run.trace.push(format!("{name}({})", args.join(",")));
        }
        for ty in returns {
            self.push_default(*ty, name);
        }
    }

    fn step(&mut self, instruction: &'s Instruction) -> Flow {
        use Opcode::*;

        let symbol = instruction.symbol();
        let name = symbol.map(|s| s.name().to_string()).unwrap_or_default();

        match instruction.opcode {
            PushConstantInt => self.run.ints.push(instruction.int().expect("int operand")),
            PushConstantString => match &instruction.operand {
                Operand::String(s) => self.run.strings.push(s.clone()),
                other => panic!("bad string operand {other:?}"),
            },
            PushConstantLong => match instruction.operand {
                Operand::Long(v) => self.run.longs.push(v),
                ref other => panic!("bad long operand {other:?}"),
            },
            PushConstantSymbol => self.run.ints.push(0),

            PushLocal => match symbol.and_then(|s| s.as_local()).map(|l| l.base_type()) {
                Some(BaseVarType::Integer) => {
                    let value = self.run.int_locals.get(&name).copied().unwrap_or(0);
                    self.run.ints.push(value);
                }
                Some(BaseVarType::String) => self.run.strings.push(String::new()),
                Some(BaseVarType::Long) => self.run.longs.push(0),
                None => panic!("PushLocal without local"),
            },
            PopLocal => match symbol.and_then(|s| s.as_local()).map(|l| l.base_type()) {
                Some(BaseVarType::Integer) => {
                    let value = self.int();
                    self.run.int_locals.insert(name, value);
                }
                Some(BaseVarType::String) => {
                    self.string();
                }
                Some(BaseVarType::Long) => {
                    self.long();
                }
                None => panic!("PopLocal without local"),
            },
            DefineArray => {
                let size = self.int();
                self.run.arrays.insert(name, vec![0; size.max(0) as usize]);
            }
            PushArrayInt => {
                let index = self.int() as usize;
                let value = self.run.arrays.get(&name).and_then(|a| a.get(index)).copied();
                self.run.ints.push(value.unwrap_or(0));
            }
            PopArrayInt => {
                let value = self.int();
                let index = self.int() as usize;
                let array = self.run.arrays.entry(name).or_default();
                if array.len() <= index {
                    array.resize(index + 1, 0);
                }
                array[index] = value;
            }

            PushVar | PushVar2 => {
                let value = self.run.vars.get(&name).copied().unwrap_or(0);
                self.run.ints.push(value);
            }
            PopVar | PopVar2 => {
                let value = self.int();
                self.run.vars.insert(name, value);
            }

            Branch => return Flow::Goto(self.target(instruction)),
            BranchNot | BranchEquals | BranchLessThan | BranchGreaterThan
            | BranchLessThanOrEquals | BranchGreaterThanOrEquals => {
                let right = self.int();
                let left = self.int();
                let taken = match instruction.opcode {
                    BranchNot => left != right,
                    BranchEquals => left == right,
                    BranchLessThan => left < right,
                    BranchGreaterThan => left > right,
                    BranchLessThanOrEquals => left <= right,
                    _ => left >= right,
                };
                if taken {
                    return Flow::Goto(self.target(instruction));
                }
            }
            LongBranchNot | LongBranchEquals | LongBranchLessThan | LongBranchGreaterThan
            | LongBranchLessThanOrEquals | LongBranchGreaterThanOrEquals => {
                let right = self.long();
                let left = self.long();
                let taken = match instruction.opcode {
                    LongBranchNot => left != right,
                    LongBranchEquals => left == right,
                    LongBranchLessThan => left < right,
                    LongBranchGreaterThan => left > right,
                    LongBranchLessThanOrEquals => left <= right,
                    _ => left >= right,
                };
                if taken {
                    return Flow::Goto(self.target(instruction));
                }
            }
            ObjBranchNot | ObjBranchEquals => {
                let right = self.string();
                let left = self.string();
                if (left == right) == (instruction.opcode == ObjBranchEquals) {
                    return Flow::Goto(self.target(instruction));
                }
            }

            Switch => {
                let key = self.int();
                let id = instruction.switch_table().expect("switch operand");
                let table = self.script.switch_table(id).expect("switch table");
                if let Some(case) = table.find(&Constant::Int(key)) {
                    return Flow::Goto(self.labels[case.label.name()]);
                }
            }
            Gosub | Jump => {
                let script = symbol.and_then(|s| s.as_script()).expect("script operand");
                self.call(&script.name, &script.parameters, &script.returns);
                if instruction.opcode == Jump {
                    return Flow::Stop;
                }
            }
            Command => {
                let command = symbol.and_then(|s| s.as_command()).expect("command operand");
                self.call(&command.name, &command.parameters, &command.returns);
            }
            Return => return Flow::Stop,

            JoinString => {
                let Operand::Count(n) = instruction.operand else {
                    panic!("JoinString without count");
                };
                let mut parts: Vec<String> = (0..n).map(|_| self.string()).collect();
                parts.reverse();
                self.run.strings.push(parts.concat());
            }
            Discard => match instruction.operand {
                Operand::BaseType(BaseVarType::Integer) => {
                    self.int();
                }
                Operand::BaseType(BaseVarType::String) => {
                    self.string();
                }
                Operand::BaseType(BaseVarType::Long) => {
                    self.long();
                }
                ref other => panic!("bad discard operand {other:?}"),
            },

            Add | Sub | Multiply | Divide | Modulo | And | Or => {
                let right = self.int();
                let left = self.int();
                self.run.ints.push(match instruction.opcode {
                    Add => left + right,
                    Sub => left - right,
                    Multiply => left * right,
                    Divide => left / right,
                    Modulo => left % right,
                    And => left & right,
                    _ => left | right,
                });
            }
            LongAdd | LongSub | LongMultiply | LongDivide | LongModulo | LongAnd | LongOr => {
                let right = self.long();
                let left = self.long();
                self.run.longs.push(match instruction.opcode {
                    LongAdd => left + right,
                    LongSub => left - right,
                    LongMultiply => left * right,
                    LongDivide => left / right,
                    LongModulo => left % right,
                    LongAnd => left & right,
                    _ => left | right,
                });
            }

            LineNumber => {}
        }
        Flow::Next
    }
}

enum Flow {
    Next,
    Goto(usize),
    Stop,
}
