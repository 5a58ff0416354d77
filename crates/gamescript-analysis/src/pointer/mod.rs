//! Pointer effect analysis.
//!
//! Every script gets a [`PointerEffects`] summary computed from its control
//! flow graph: what it requires, what it always sets and which pointers it
//! may leave corrupted on exit. Calls use the callee's summary, so the
//! analysis recurses through the call graph. A script whose summary is still
//! being computed reads as [`PointerEffects::EMPTY`], which breaks cycles at
//! the cost of ignoring the recursive call's contribution.

mod rules;

use std::rc::Rc;

use gamescript_compiler::{CompiledScript, Opcode};
use gamescript_core::{
    CommandPointers, Diagnostic, Diagnostics, PointerEffects, PointerSet, ScriptSymbol, Span,
    SymbolHash,
};
use petgraph::graph::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::cfg::{CfgCache, CfgNode, ControlFlowGraph, find_edge_path};
use crate::error::Result;

pub use rules::instruction_effects;

/// A way for a script to exit with `pointer` corrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptionPath {
    pub pointer: PointerSet,
    /// From the corrupting node to the last node before the exit.
    pub nodes: Vec<NodeIndex>,
    /// The `Return` or `Jump` the path leaves through.
    pub exit: NodeIndex,
}

impl CorruptionPath {
    pub fn corrupting_node(&self) -> NodeIndex {
        self.nodes[0]
    }
}

/// The nodes of a script that read or set one pointer.
///
/// This is an enumeration only: it does not decide whether every path to a
/// requiring node passes a setting node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerSites {
    pub requiring: Vec<NodeIndex>,
    pub setting: Vec<NodeIndex>,
    /// The script's trigger provides the pointer at entry.
    pub provided_at_entry: bool,
}

/// Computes and checks pointer effects for a set of compiled scripts.
pub struct PointerChecker<'a> {
    commands: &'a CommandPointers,
    scripts: FxHashMap<SymbolHash, &'a CompiledScript>,
    order: Vec<SymbolHash>,
    graphs: CfgCache,
    effects: FxHashMap<SymbolHash, PointerEffects>,
    pending: FxHashSet<SymbolHash>,
}

impl<'a> PointerChecker<'a> {
    pub fn new(commands: &'a CommandPointers) -> Self {
        Self {
            commands,
            scripts: FxHashMap::default(),
            order: Vec::new(),
            graphs: CfgCache::new(),
            effects: FxHashMap::default(),
            pending: FxHashSet::default(),
        }
    }

    /// Make a script visible to the analysis, both as a subject and as a callee.
    pub fn add_script(&mut self, script: &'a CompiledScript) {
        if self.scripts.insert(script.hash(), script).is_none() {
            self.order.push(script.hash());
        }
    }

    pub fn add_scripts(&mut self, scripts: impl IntoIterator<Item = &'a CompiledScript>) {
        for script in scripts {
            self.add_script(script);
        }
    }

    pub fn script(&self, hash: SymbolHash) -> Option<&'a CompiledScript> {
        self.scripts.get(&hash).copied()
    }

    /// The control-flow graph of a known script.
    pub fn graph(&mut self, hash: SymbolHash) -> Option<Result<Rc<ControlFlowGraph>>> {
        let script = self.script(hash)?;
        Some(self.graphs.get_or_build(script, self.commands))
    }

    /// The pointer summary of `symbol`.
    ///
    /// Only definite sets count towards `set`; a conditional set never
    /// reaches callers.
    ///
    /// Unknown scripts, scripts whose graph cannot be built and scripts
    /// currently being summarized have no effects.
    pub fn effects(&mut self, symbol: &ScriptSymbol) -> PointerEffects {
        let hash = symbol.hash();
        if let Some(effects) = self.effects.get(&hash) {
            return *effects;
        }
        if self.pending.contains(&hash) {
            trace!(script = %symbol, "recursive call, using empty effects");
            return PointerEffects::EMPTY;
        }

        let graph = match self.graph(hash) {
            Some(Ok(graph)) => graph,
            Some(Err(error)) => {
                debug!(script = %symbol, %error, "no graph, using empty effects");
                return PointerEffects::EMPTY;
            }
            None => {
                trace!(script = %symbol, "unknown script, using empty effects");
                return PointerEffects::EMPTY;
            }
        };

        self.pending.insert(hash);
        let effects = self.summarize(&graph);
        self.pending.remove(&hash);

        debug!(
            script = %symbol,
            required = %effects.required,
            set = %effects.set,
            corrupted = %effects.corrupted,
            "computed pointer effects"
        );
        self.effects.insert(hash, effects);
        effects
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn summarize(&mut self, graph: &ControlFlowGraph) -> PointerEffects {
        let table = self.node_table(graph);

        let mut summary = PointerEffects::new();
        let mut corrupted = PointerSet::empty();
        for (node, effects) in graph.node_indices().zip(&table) {
            summary.required |= effects.required;
            if !matches!(graph.node(node), CfgNode::PointerSet(_)) {
                summary.set |= effects.definite_set();
            }
            corrupted |= effects.corrupted;
        }

        for pointer in corrupted.pointers() {
            if corruption_path(graph, &table, pointer).is_some() {
                summary.corrupted |= pointer;
            }
        }
        summary
    }

    /// Effects of one node.
    pub fn node_effects(&mut self, node: &CfgNode) -> PointerEffects {
        match node {
            CfgNode::Entry => PointerEffects::EMPTY,
            CfgNode::PointerSet(pointers) => PointerEffects::new().sets(*pointers),
            CfgNode::Instruction { instruction, .. } => {
                let commands = self.commands;
                instruction_effects(instruction, commands, |callee| self.effects(callee))
            }
        }
    }

    /// Effects of every node, indexed by node.
    fn node_table(&mut self, graph: &ControlFlowGraph) -> Vec<PointerEffects> {
        graph
            .node_indices()
            .map(|node| self.node_effects(graph.node(node)))
            .collect()
    }

    /// Whether the script can exit with `pointer` corrupted, and how.
    pub fn corrupts_pointer(
        &mut self,
        symbol: &ScriptSymbol,
        pointer: PointerSet,
    ) -> Result<Option<CorruptionPath>> {
        let Some(graph) = self.graph(symbol.hash()).transpose()? else {
            return Ok(None);
        };
        let table = self.node_table(&graph);
        Ok(corruption_path(&graph, &table, pointer))
    }

    /// The nodes of a script that require or set `pointer`.
    pub fn validate_pointer(
        &mut self,
        symbol: &ScriptSymbol,
        pointer: PointerSet,
    ) -> Result<PointerSites> {
        let Some(graph) = self.graph(symbol.hash()).transpose()? else {
            return Ok(PointerSites::default());
        };
        let table = self.node_table(&graph);

        let mut sites = PointerSites {
            provided_at_entry: symbol.trigger.entry_pointers().contains(pointer),
            ..PointerSites::default()
        };
        for (node, effects) in graph.node_indices().zip(&table) {
            if effects.required.contains(pointer) {
                sites.requiring.push(node);
            }
            if effects.definite_set().contains(pointer) {
                sites.setting.push(node);
            }
        }
        Ok(sites)
    }

    /// Report every pointer a script can exit with corrupted.
    pub fn check_script(&mut self, symbol: &ScriptSymbol) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let graph = match self.graph(symbol.hash()) {
            Some(Ok(graph)) => graph,
            Some(Err(error)) => {
                diagnostics.push(Diagnostic::from(error));
                return diagnostics;
            }
            None => return diagnostics,
        };

        let table = self.node_table(&graph);
        let candidates = table
            .iter()
            .fold(PointerSet::empty(), |acc, e| acc | e.corrupted);

        for pointer in candidates.pointers() {
            let Some(path) = corruption_path(&graph, &table, pointer) else {
                continue;
            };
            let name = pointer.pointer_name().unwrap_or("pointer");
            let site = graph.node(path.corrupting_node());
            let exit = graph.node(path.exit);
            let fallback = Span::default();

            diagnostics.push(Diagnostic::error(
                site.span().unwrap_or(fallback),
                format!("{name} is corrupted by '{site}' and not set again before {symbol} exits"),
            ));
            diagnostics.push(Diagnostic::info(
                exit.span().unwrap_or(fallback),
                format!("{symbol} exits here with {name} corrupted"),
            ));
        }

        debug!(
            script = %symbol,
            findings = diagnostics.error_count(),
            "checked pointers"
        );
        diagnostics
    }

    /// Check every added script, in the order they were added.
    pub fn check_all(&mut self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for hash in self.order.clone() {
            if let Some(script) = self.script(hash) {
                diagnostics.extend(self.check_script(&script.symbol));
            }
        }
        diagnostics
    }
}

/// Search backwards from every exit for a node that corrupts `pointer`
/// without a node that restores it in between.
///
/// Exits are `Return` and `Jump`. A jump's own effect is the callee's, which
/// the callee reports itself, so the jump is never the corrupting node.
fn corruption_path(
    graph: &ControlFlowGraph,
    table: &[PointerEffects],
    pointer: PointerSet,
) -> Option<CorruptionPath> {
    let restores = |node: NodeIndex| table[node.index()].restores(pointer);
    let corrupts = |node: NodeIndex| table[node.index()].corrupted.contains(pointer);

    // Seed -> the exit it leads to.
    let mut exits: FxHashMap<NodeIndex, NodeIndex> = FxHashMap::default();
    let mut seeds = Vec::new();
    let returns = graph.nodes_with(Opcode::Return);
    // A jump to a script that sets the pointer again leaves it valid.
    let jumps = graph.nodes_with(Opcode::Jump).filter(|&jump| !restores(jump));
    for exit in returns.chain(jumps) {
        for pred in graph.predecessors(exit) {
            if !restores(pred) && !exits.contains_key(&pred) {
                exits.insert(pred, exit);
                seeds.push(pred);
            }
        }
    }
    seeds.sort();

    let nodes = find_edge_path(graph.graph(), seeds, corrupts, restores)?;
    let last = *nodes.last()?;
    let exit = exits.get(&last).copied()?;
    Some(CorruptionPath {
        pointer,
        nodes,
        exit,
    })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use gamescript_compiler::Instruction;
    use gamescript_core::{DiagnosticKind, Trigger};

    use super::*;
    use crate::cfg::test_support::*;

    fn commands() -> CommandPointers {
        CommandPointers::new()
            .with(
                "p_delay",
                PointerEffects::new()
                    .requires(PointerSet::P_ACTIVE_PLAYER)
                    .corrupts(PointerSet::P_ACTIVE_PLAYER),
            )
            .with("p_restore", PointerEffects::new().sets(PointerSet::P_ACTIVE_PLAYER))
            .with(
                "npc_find",
                PointerEffects::new().sets_conditionally(PointerSet::ACTIVE_NPC),
            )
            .with("npc_say", PointerEffects::new().requires(PointerSet::ACTIVE_NPC))
    }

    #[test]
    fn mutually_recursive_procs_terminate() {
        let a = proc("ping");
        let b = proc("pong");
        let ping = script(
            &a,
            vec![("entry", vec![command("npc_say"), call(Opcode::Gosub, &b), ret()])],
            vec![],
        );
        let pong = script(
            &b,
            vec![("entry", vec![command("p_restore"), call(Opcode::Gosub, &a), ret()])],
            vec![],
        );

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_scripts([&ping, &pong]);

        let ping_effects = checker.effects(&a);
        assert_eq!(ping_effects.required, PointerSet::ACTIVE_NPC);
        assert_eq!(ping_effects.set, PointerSet::P_ACTIVE_PLAYER);

        // pong was summarized while ping was pending, so ping's requirement
        // is missing from it.
        let pong_effects = checker.effects(&b);
        assert_eq!(pong_effects.required, PointerSet::empty());
        assert_eq!(pong_effects.set, PointerSet::P_ACTIVE_PLAYER);
    }

    #[test]
    fn self_recursion_terminates() {
        let a = proc("loop");
        let looping = script(
            &a,
            vec![("entry", vec![command("p_delay"), call(Opcode::Gosub, &a), ret()])],
            vec![],
        );
        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_script(&looping);

        let effects = checker.effects(&a);
        assert_eq!(effects.corrupted, PointerSet::P_ACTIVE_PLAYER);
    }

    #[test]
    fn unknown_callee_has_no_effects() {
        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        assert_eq!(checker.effects(&proc("missing")), PointerEffects::EMPTY);
    }

    #[test]
    fn corruption_before_return_is_reported() {
        let symbol = Rc::new(gamescript_core::ScriptSymbol::new(
            Trigger::Queue,
            "walk",
            vec![],
            vec![],
        ));
        let span = Span::line(4);
        let corrupting = script(
            &symbol,
            vec![(
                "entry",
                vec![command("p_delay").with_span(span), ret().with_span(Span::line(5))],
            )],
            vec![],
        );

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_script(&corrupting);

        let path = checker
            .corrupts_pointer(&symbol, PointerSet::P_ACTIVE_PLAYER)
            .unwrap()
            .unwrap();
        assert_eq!(path.nodes.len(), 1);

        let diagnostics = checker.check_script(&symbol);
        let all: Vec<_> = diagnostics.iter().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, DiagnosticKind::Error);
        assert_eq!(all[0].span, span);
        assert!(all[0].message.contains("p_active_player"));
        assert_eq!(all[1].kind, DiagnosticKind::Info);
        assert_eq!(all[1].span.line, 5);
    }

    #[test]
    fn setting_before_return_clears_the_finding() {
        let symbol = proc("walk");
        let restored = script(
            &symbol,
            vec![(
                "entry",
                vec![command("p_delay"), command("p_restore"), ret()],
            )],
            vec![],
        );

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_script(&restored);

        assert_eq!(
            checker
                .corrupts_pointer(&symbol, PointerSet::P_ACTIVE_PLAYER)
                .unwrap(),
            None
        );
        assert!(checker.check_script(&symbol).is_empty());
    }

    #[test]
    fn corruption_on_one_branch_is_found() {
        let symbol = proc("maybe");
        let branchy = script(
            &symbol,
            vec![
                (
                    "entry",
                    vec![
                        Instruction::push_int(1),
                        Instruction::push_int(1),
                        branch(Opcode::BranchEquals, "if_true_0"),
                        branch(Opcode::Branch, "if_end_0"),
                    ],
                ),
                (
                    "if_true_0",
                    vec![command("p_delay"), branch(Opcode::Branch, "if_end_0")],
                ),
                ("if_end_0", vec![ret()]),
            ],
            vec![],
        );

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_script(&branchy);

        let path = checker
            .corrupts_pointer(&symbol, PointerSet::P_ACTIVE_PLAYER)
            .unwrap()
            .unwrap();
        let graph = checker.graph(symbol.hash()).unwrap().unwrap();
        assert_eq!(
            graph.node(path.corrupting_node()).to_string(),
            "Command p_delay"
        );
        assert_eq!(graph.node(path.exit).opcode(), Some(Opcode::Return));
    }

    #[test]
    fn corruption_through_callee() {
        let callee = proc("wait");
        let caller = proc("caller");
        let wait = script(&callee, vec![("entry", vec![command("p_delay"), ret()])], vec![]);
        let calling = script(
            &caller,
            vec![("entry", vec![call(Opcode::Gosub, &callee), ret()])],
            vec![],
        );

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_scripts([&wait, &calling]);

        let diagnostics = checker.check_all();
        assert_eq!(diagnostics.error_count(), 2);
        assert!(
            diagnostics
                .errors()
                .any(|d| d.message.contains("'Gosub [proc,wait]'"))
        );
    }

    fn label(name: &str) -> Rc<ScriptSymbol> {
        Rc::new(ScriptSymbol::new(Trigger::Label, name, vec![], vec![]))
    }

    #[test]
    fn jumping_to_a_corrupting_label_is_reported_once() {
        let bank = label("bank");
        let caller = proc("caller");
        let banking = script(&bank, vec![("entry", vec![command("p_delay"), ret()])], vec![]);
        let jumping = script(&caller, vec![("entry", vec![call(Opcode::Jump, &bank)])], vec![]);

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_scripts([&banking, &jumping]);

        let diagnostics = checker.check_all();
        assert_eq!(diagnostics.error_count(), 1);
        assert!(
            diagnostics
                .errors()
                .all(|d| d.message.contains("'Command p_delay'") && d.message.contains("[label,bank]"))
        );
        assert!(checker.check_script(&caller).is_empty());
    }

    #[test]
    fn corruption_before_a_jump_is_reported_at_the_jump() {
        let idle = label("idle");
        let caller = proc("caller");
        let idling = script(&idle, vec![("entry", vec![ret()])], vec![]);
        let jumping = script(
            &caller,
            vec![("entry", vec![command("p_delay"), call(Opcode::Jump, &idle)])],
            vec![],
        );

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_scripts([&idling, &jumping]);

        let path = checker
            .corrupts_pointer(&caller, PointerSet::P_ACTIVE_PLAYER)
            .unwrap()
            .unwrap();
        let graph = checker.graph(caller.hash()).unwrap().unwrap();
        assert_eq!(graph.node(path.corrupting_node()).to_string(), "Command p_delay");
        assert_eq!(graph.node(path.exit).opcode(), Some(Opcode::Jump));
        assert_eq!(checker.check_all().error_count(), 1);
    }

    #[test]
    fn jumping_to_a_restoring_label_clears_the_finding() {
        let login = label("relogin");
        let caller = proc("caller");
        let restoring = script(&login, vec![("entry", vec![command("p_restore"), ret()])], vec![]);
        let jumping = script(
            &caller,
            vec![("entry", vec![command("p_delay"), call(Opcode::Jump, &login)])],
            vec![],
        );

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_scripts([&restoring, &jumping]);

        assert_eq!(
            checker
                .corrupts_pointer(&caller, PointerSet::P_ACTIVE_PLAYER)
                .unwrap(),
            None
        );
        assert!(checker.check_all().is_empty());
    }

    #[test]
    fn validate_pointer_enumerates_sites() {
        let symbol = Rc::new(gamescript_core::ScriptSymbol::new(
            Trigger::OpNpc(1),
            "talk",
            vec![],
            vec![],
        ));
        let talk = script(
            &symbol,
            vec![
                (
                    "entry",
                    vec![
                        command("npc_say"),
                        command("npc_find"),
                        Instruction::push_int(1),
                        branch(Opcode::BranchEquals, "if_true_0"),
                        branch(Opcode::Branch, "if_end_0"),
                    ],
                ),
                ("if_true_0", vec![command("npc_say")]),
                ("if_end_0", vec![ret()]),
            ],
            vec![],
        );

        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_script(&talk);

        let sites = checker
            .validate_pointer(&symbol, PointerSet::ACTIVE_NPC)
            .unwrap();
        assert!(sites.provided_at_entry);
        assert_eq!(sites.requiring.len(), 2);
        assert_eq!(sites.setting.len(), 1);

        let graph = checker.graph(symbol.hash()).unwrap().unwrap();
        assert_eq!(
            graph.node(sites.setting[0]),
            &CfgNode::PointerSet(PointerSet::ACTIVE_NPC)
        );

        // Conditional sets do not count towards the script's own set.
        assert!(checker.effects(&symbol).set.is_empty());
    }

    #[test]
    fn broken_graph_is_reported_once() {
        let symbol = proc("broken");
        let broken = script(
            &symbol,
            vec![("entry", vec![branch(Opcode::Branch, "nowhere_0")])],
            vec![],
        );
        let commands = commands();
        let mut checker = PointerChecker::new(&commands);
        checker.add_script(&broken);

        let diagnostics = checker.check_all();
        assert_eq!(diagnostics.error_count(), 1);
        let message = &diagnostics.iter().next().unwrap().message;
        assert!(message.starts_with("internal compiler error: "));
        assert_eq!(checker.effects(&symbol), PointerEffects::EMPTY);
    }
}
