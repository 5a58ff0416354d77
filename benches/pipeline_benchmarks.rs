//! Benchmarks for the emit and analyze pipeline.
//!
//! Scripts are generated in memory: each one mixes a short-circuit `if`, a
//! counting `while`, a `switch` and a call into the previous script, so the
//! analyzer has a call chain to follow.
//!
//! ```bash
//! cargo bench --bench pipeline_benchmarks
//! cargo bench --features profile-with-puffin --bench pipeline_benchmarks
//! ```

use std::hint::black_box;
use std::rc::Rc;

use bumpalo::Bump;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gamescript::{Compiler, CompilerConfig};
use gamescript_ast::{ArithmeticOp, BinaryOp, ScriptDecl, ScriptFile, Stmt, TreeBuilder};
use gamescript_core::{
    CommandPointers, CommandSymbol, LocalVariableSymbol, PointerEffects, PointerSet,
    ScriptSymbol, SymbolTable, Trigger, Type,
};

struct Commands {
    npc_find: Rc<CommandSymbol>,
    npc_say: Rc<CommandSymbol>,
    p_delay: Rc<CommandSymbol>,
    p_finduid: Rc<CommandSymbol>,
}

impl Commands {
    fn new() -> Self {
        Self {
            npc_find: Rc::new(CommandSymbol::new("npc_find", vec![], vec![Type::BOOLEAN])),
            npc_say: Rc::new(CommandSymbol::new("npc_say", vec![Type::STRING], vec![])),
            p_delay: Rc::new(CommandSymbol::new("p_delay", vec![Type::INT], vec![])),
            p_finduid: Rc::new(CommandSymbol::new("p_finduid", vec![Type::INT], vec![Type::BOOLEAN])),
        }
    }

    fn pointers() -> CommandPointers {
        CommandPointers::new()
            .with(
                "npc_find",
                PointerEffects::new().sets_conditionally(PointerSet::ACTIVE_NPC),
            )
            .with("npc_say", PointerEffects::new().requires(PointerSet::ACTIVE_NPC))
            .with(
                "p_delay",
                PointerEffects::new()
                    .requires(PointerSet::P_ACTIVE_PLAYER)
                    .corrupts(PointerSet::P_ACTIVE_PLAYER),
            )
            .with(
                "p_finduid",
                PointerEffects::new().sets(PointerSet::ACTIVE_PLAYER | PointerSet::P_ACTIVE_PLAYER),
            )
    }
}

fn build_script<'ast>(
    b: &TreeBuilder<'ast>,
    commands: &Commands,
    symbol: &Rc<ScriptSymbol>,
    previous: Option<&Rc<ScriptSymbol>>,
) -> ScriptDecl<'ast> {
    let i = Rc::new(LocalVariableSymbol::new("i", Type::INT));

    let found = b.equals(b.command(&commands.npc_find, &[]), b.boolean(true));
    let small = b.binary(b.local(&i), BinaryOp::LessThan, b.int(5));
    let mut body: Vec<Stmt<'ast>> = vec![
        b.at(2).declare(&i, Some(b.int(0))),
        b.at(3).if_stmt(
            b.and(found, b.paren(b.or(small, b.equals(b.local(&i), b.int(9))))),
            b.expr_stmt(b.command(&commands.npc_say, &[b.string("hello")])),
            None,
        ),
        b.at(4).while_stmt(
            b.binary(b.local(&i), BinaryOp::LessThan, b.int(3)),
            b.block(&[
                b.at(5).expr_stmt(b.command(&commands.p_delay, &[b.local(&i)])),
                b.at(6).assign(
                    &[b.local(&i)],
                    &[b.calc(b.arithmetic(b.local(&i), ArithmeticOp::Add, b.int(1)))],
                ),
            ]),
        ),
        b.at(7).switch(
            Type::INT,
            b.local(&i),
            &[
                b.case(&[b.int(1), b.int(2)], &[b.expr_stmt(b.command(&commands.npc_say, &[b.string("a")]))]),
                b.case(&[b.int(3)], &[b.expr_stmt(b.command(&commands.npc_say, &[b.string("b")]))]),
                b.default_case(&[]),
            ],
        ),
        b.at(8).expr_stmt(b.command(&commands.p_finduid, &[b.int(1)])),
    ];
    if let Some(previous) = previous {
        body.push(b.at(9).expr_stmt(b.proc(previous, &[])));
    }
    b.at(1).script(symbol, &[], &body)
}

fn build_file<'ast>(b: &TreeBuilder<'ast>, commands: &Commands, scripts: usize) -> ScriptFile<'ast> {
    let symbols: Vec<_> = (0..scripts)
        .map(|n| Rc::new(ScriptSymbol::new(Trigger::Proc, format!("script_{n}"), vec![], vec![])))
        .collect();
    let decls: Vec<_> = symbols
        .iter()
        .enumerate()
        .map(|(n, symbol)| build_script(b, commands, symbol, n.checked_sub(1).map(|p| &symbols[p])))
        .collect();
    b.file("bench.gs", &decls)
}

#[cfg(feature = "profile-with-puffin")]
fn start_profiler() {
    puffin::set_scopes_on(true);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn start_profiler() {}

fn bench_pipeline(c: &mut Criterion) {
    start_profiler();
    let commands = Commands::new();
    let symbols = SymbolTable::new();
    let mut group = c.benchmark_group("pipeline");

    for scripts in [10usize, 100, 500] {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let file = build_file(&b, &commands, scripts);
        group.throughput(Throughput::Elements(scripts as u64));

        let emit_only = Compiler::new(CompilerConfig::new().with_pointer_checks(false));
        group.bench_with_input(BenchmarkId::new("emit", scripts), &file, |bench, file| {
            bench.iter(|| black_box(emit_only.compile(std::slice::from_ref(file), &symbols)))
        });

        let full = Compiler::new(CompilerConfig::new().with_command_pointers(Commands::pointers()));
        group.bench_with_input(BenchmarkId::new("emit_and_analyze", scripts), &file, |bench, file| {
            bench.iter(|| {
                let output = black_box(full.compile(std::slice::from_ref(file), &symbols));
                #[cfg(feature = "profiling")]
                profiling::finish_frame!();
                output
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
