//! Per-opcode pointer rules.

use gamescript_compiler::{Instruction, Opcode};
use gamescript_core::{
    CommandPointers, GameVarKind, GameVariableSymbol, PointerEffects, PointerSet, ScriptSymbol,
};

/// Effects of a single instruction.
///
/// `callee` supplies the summary of a called script.
pub fn instruction_effects(
    instruction: &Instruction,
    commands: &CommandPointers,
    mut callee: impl FnMut(&ScriptSymbol) -> PointerEffects,
) -> PointerEffects {
    let symbol = instruction.symbol();
    match instruction.opcode {
        Opcode::Command => symbol
            .and_then(|s| s.as_command())
            .map_or(PointerEffects::EMPTY, |command| commands.get(&command.name)),
        Opcode::Gosub | Opcode::Jump => symbol
            .and_then(|s| s.as_script())
            .map_or(PointerEffects::EMPTY, |script| callee(script.as_ref())),
        Opcode::PushVar | Opcode::PushVar2 | Opcode::PopVar | Opcode::PopVar2 => symbol
            .and_then(|s| s.as_game_variable())
            .map_or(PointerEffects::EMPTY, |var| {
                PointerEffects::new().requires(variable_pointer(instruction.opcode, var))
            }),
        _ => PointerEffects::EMPTY,
    }
}

/// The pointer a variable access goes through.
fn variable_pointer(opcode: Opcode, var: &GameVariableSymbol) -> PointerSet {
    let secondary = matches!(opcode, Opcode::PushVar2 | Opcode::PopVar2);
    let write = matches!(opcode, Opcode::PopVar | Opcode::PopVar2);

    match (var.kind, write && var.protected, secondary) {
        (GameVarKind::Player | GameVarKind::Bit, true, false) => PointerSet::P_ACTIVE_PLAYER,
        (GameVarKind::Player | GameVarKind::Bit, true, true) => PointerSet::P_ACTIVE_PLAYER2,
        (GameVarKind::Player | GameVarKind::Bit, false, false) => PointerSet::ACTIVE_PLAYER,
        (GameVarKind::Player | GameVarKind::Bit, false, true) => PointerSet::ACTIVE_PLAYER2,
        (GameVarKind::Npc, _, false) => PointerSet::ACTIVE_NPC,
        (GameVarKind::Npc, _, true) => PointerSet::ACTIVE_NPC2,
    }
}
