//! Control-flow graphs over compiled scripts.
//!
//! Every real instruction becomes a node; line markers are skipped. Edges
//! follow fallthrough, branch targets and switch cases. A command whose
//! pointer effect only holds when it reports success gets a synthetic
//! [`CfgNode::PointerSet`] spliced onto the edge of its success outcome.

mod path;

use std::fmt;
use std::rc::Rc;

use gamescript_compiler::{CompiledScript, Instruction, Label, Opcode};
use gamescript_core::{CommandPointers, PointerSet, Span, SymbolHash};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{CfgError, Result};

pub use path::find_edge_path;

/// Position of an instruction inside a script's block layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstructionLocation {
    pub block: usize,
    pub index: usize,
}

impl fmt::Display for InstructionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.block, self.index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CfgNode {
    /// Where execution starts.
    Entry,
    Instruction {
        location: InstructionLocation,
        instruction: Instruction,
    },
    /// Pointers that became valid on the incoming edge only.
    PointerSet(PointerSet),
}

impl CfgNode {
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            CfgNode::Instruction { instruction, .. } => Some(instruction),
            _ => None,
        }
    }

    pub fn opcode(&self) -> Option<Opcode> {
        self.instruction().map(|i| i.opcode)
    }

    pub fn span(&self) -> Option<Span> {
        self.instruction().and_then(|i| i.span)
    }
}

impl fmt::Display for CfgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfgNode::Entry => f.write_str("entry"),
            CfgNode::Instruction { instruction, .. } => write!(f, "{instruction}"),
            CfgNode::PointerSet(set) => write!(f, "set {set}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfgEdge {
    Entry,
    Fallthrough,
    Branch,
    SwitchCase,
    /// Leaves a synthetic pointer-set node.
    Conditional,
}

/// The graph of one script.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    graph: DiGraph<CfgNode, CfgEdge>,
    entry: NodeIndex,
    nodes: FxHashMap<InstructionLocation, NodeIndex>,
}

impl ControlFlowGraph {
    pub fn graph(&self) -> &DiGraph<CfgNode, CfgEdge> {
        &self.graph
    }

    pub fn entry(&self) -> NodeIndex {
        self.entry
    }

    pub fn node(&self, index: NodeIndex) -> &CfgNode {
        &self.graph[index]
    }

    /// The node of the instruction at `location`, if it is a real instruction.
    pub fn node_at(&self, location: InstructionLocation) -> Option<NodeIndex> {
        self.nodes.get(&location).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, CfgEdge)> + '_ {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.target(), *edge.weight()))
    }

    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    /// Nodes whose instruction has `opcode`.
    pub fn nodes_with(&self, opcode: Opcode) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(move |&n| self.graph[n].opcode() == Some(opcode))
    }
}

/// Idiom found at a compare-and-branch: which outcome means success.
#[derive(Debug, Clone, Copy)]
struct ConditionalSet {
    pointers: PointerSet,
    on_branch: bool,
}

/// Builds a [`ControlFlowGraph`] for one script.
pub struct CfgBuilder<'a> {
    script: &'a CompiledScript,
    commands: &'a CommandPointers,
    /// Real instructions in layout order.
    sequence: Vec<(InstructionLocation, &'a Instruction)>,
    /// Per block, the sequence index of its first real instruction, looking
    /// through empty blocks that fall into it.
    block_starts: Vec<Option<usize>>,
    graph: DiGraph<CfgNode, CfgEdge>,
    nodes: Vec<NodeIndex>,
}

impl<'a> CfgBuilder<'a> {
    pub fn new(script: &'a CompiledScript, commands: &'a CommandPointers) -> Self {
        let mut sequence = Vec::new();
        let mut block_starts = Vec::with_capacity(script.blocks.len());

        for (block, contents) in script.blocks.iter().enumerate() {
            let first = sequence.len();
            for (index, instruction) in contents.instructions.iter().enumerate() {
                if !instruction.opcode.is_marker() {
                    sequence.push((InstructionLocation { block, index }, instruction));
                }
            }
            block_starts.push((sequence.len() > first).then_some(first));
        }

        // Empty blocks fall into the next block that has an instruction.
        let mut next = None;
        for start in block_starts.iter_mut().rev() {
            if start.is_some() {
                next = *start;
            } else {
                *start = next;
            }
        }

        Self {
            script,
            commands,
            sequence,
            block_starts,
            graph: DiGraph::new(),
            nodes: Vec::new(),
        }
    }

    /// Build the graph of `script`.
    pub fn build(script: &'a CompiledScript, commands: &'a CommandPointers) -> Result<ControlFlowGraph> {
        Self::new(script, commands).finish()
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn finish(mut self) -> Result<ControlFlowGraph> {
        let entry = self.graph.add_node(CfgNode::Entry);
        for &(location, instruction) in &self.sequence {
            let node = self.graph.add_node(CfgNode::Instruction {
                location,
                instruction: instruction.clone(),
            });
            self.nodes.push(node);
        }

        if let Some(&first) = self.nodes.first() {
            self.graph.add_edge(entry, first, CfgEdge::Entry);
        }

        for position in 0..self.sequence.len() {
            self.add_edges(position)?;
        }

        let nodes = self
            .sequence
            .iter()
            .zip(&self.nodes)
            .map(|((location, _), node)| (*location, *node))
            .collect();

        Ok(ControlFlowGraph {
            graph: self.graph,
            entry,
            nodes,
        })
    }

    fn add_edges(&mut self, position: usize) -> Result<()> {
        let (_, instruction) = self.sequence[position];
        let from = self.nodes[position];
        let idiom = self.conditional_set_at(position);

        if !instruction.opcode.is_terminal()
            && let Some(&to) = self.nodes.get(position + 1)
        {
            let via = idiom.filter(|c| !c.on_branch).map(|c| c.pointers);
            self.connect(from, to, CfgEdge::Fallthrough, via);
        }

        if instruction.opcode.is_branch() {
            let label = instruction.label().ok_or_else(|| malformed(instruction, "label"))?;
            if let Some(to) = self.target(label, instruction)? {
                let via = idiom.filter(|c| c.on_branch).map(|c| c.pointers);
                self.connect(from, to, CfgEdge::Branch, via);
            }
        } else if instruction.opcode == Opcode::Switch {
            let id = instruction
                .switch_table()
                .ok_or_else(|| malformed(instruction, "switch table"))?;
            let script = self.script;
            let table = script
                .switch_table(id)
                .ok_or_else(|| CfgError::MissingSwitchTable {
                    table: id.0,
                    span: instruction.span.unwrap_or_default(),
                })?;
            for case in table.cases.iter().filter(|c| !c.keys.is_empty()) {
                if let Some(to) = self.target(&case.label, instruction)? {
                    self.graph.add_edge(from, to, CfgEdge::SwitchCase);
                }
            }
        }

        Ok(())
    }

    /// The node control reaches when branching to `label`.
    fn target(
        &self,
        label: &Label,
        instruction: &Instruction,
    ) -> Result<Option<NodeIndex>> {
        let block = self
            .script
            .block_index(label)
            .ok_or_else(|| CfgError::MissingLabel {
                label: label.to_string(),
                span: instruction.span.unwrap_or_default(),
            })?;
        Ok(self.block_starts[block].map(|position| self.nodes[position]))
    }

    fn connect(&mut self, from: NodeIndex, to: NodeIndex, kind: CfgEdge, via: Option<PointerSet>) {
        match via {
            Some(pointers) => {
                let set = self.graph.add_node(CfgNode::PointerSet(pointers));
                self.graph.add_edge(from, set, kind);
                self.graph.add_edge(set, to, CfgEdge::Conditional);
            }
            None => {
                self.graph.add_edge(from, to, kind);
            }
        }
    }

    /// Detects `Command`(conditional) `PushConstantInt 0|1` `BranchEquals|BranchNot`
    /// ending at `position`.
    fn conditional_set_at(&self, position: usize) -> Option<ConditionalSet> {
        let window = self.sequence.get(position.checked_sub(2)?..=position)?;
        let [(_, command), (_, constant), (_, branch)] = window else {
            return None;
        };

        if command.opcode != Opcode::Command {
            return None;
        }
        let name = command.symbol()?.as_command()?.name.as_str();
        let effects = self.commands.get(name);
        if !effects.conditional_set || effects.set.is_empty() {
            return None;
        }

        let value = match constant.opcode {
            Opcode::PushConstantInt => constant.int()?,
            _ => return None,
        };
        let on_branch = match (branch.opcode, value) {
            (Opcode::BranchEquals, 1) | (Opcode::BranchNot, 0) => true,
            (Opcode::BranchEquals, 0) | (Opcode::BranchNot, 1) => false,
            _ => return None,
        };

        trace!(
            command = name,
            pointers = %effects.set,
            on_branch,
            "conditional pointer set"
        );
        Some(ConditionalSet {
            pointers: effects.set,
            on_branch,
        })
    }
}

fn malformed(instruction: &Instruction, expected: &'static str) -> CfgError {
    CfgError::MalformedOperand {
        opcode: instruction.opcode,
        expected,
        span: instruction.span.unwrap_or_default(),
    }
}

/// Graphs by script, built on first use.
#[derive(Debug, Default)]
pub struct CfgCache {
    graphs: FxHashMap<SymbolHash, Rc<ControlFlowGraph>>,
}

impl CfgCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &mut self,
        script: &CompiledScript,
        commands: &CommandPointers,
    ) -> Result<Rc<ControlFlowGraph>> {
        if let Some(graph) = self.graphs.get(&script.hash()) {
            return Ok(graph.clone());
        }
        let graph = Rc::new(CfgBuilder::build(script, commands)?);
        self.graphs.insert(script.hash(), graph.clone());
        Ok(graph)
    }

    pub fn get(&self, hash: SymbolHash) -> Option<&Rc<ControlFlowGraph>> {
        self.graphs.get(&hash)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn clear(&mut self) {
        self.graphs.clear();
    }
}
