//! Engine-managed pointers and the effects operations have on them.
//!
//! A pointer is an engine handle such as "the active player" that commands
//! implicitly read. Every command declares which pointers it requires, which
//! it sets and which it corrupts; the analyzer checks scripts against these
//! contracts.

use std::fmt;

use bitflags::bitflags;
use rustc_hash::FxHashMap;

bitflags! {
    /// A set of engine pointers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerSet: u32 {
        const ACTIVE_PLAYER = 1 << 0;
        const ACTIVE_PLAYER2 = 1 << 1;
        /// Protected access to the active player.
        const P_ACTIVE_PLAYER = 1 << 2;
        const P_ACTIVE_PLAYER2 = 1 << 3;
        const ACTIVE_NPC = 1 << 4;
        const ACTIVE_NPC2 = 1 << 5;
        const ACTIVE_LOC = 1 << 6;
        const ACTIVE_LOC2 = 1 << 7;
        const ACTIVE_OBJ = 1 << 8;
        const ACTIVE_OBJ2 = 1 << 9;
        const FIND_PLAYER = 1 << 10;
        const FIND_NPC = 1 << 11;
        const FIND_LOC = 1 << 12;
        const FIND_OBJ = 1 << 13;
        const LAST_COM = 1 << 14;
    }
}

const POINTER_NAMES: [(PointerSet, &str); 15] = [
    (PointerSet::ACTIVE_PLAYER, "active_player"),
    (PointerSet::ACTIVE_PLAYER2, "active_player2"),
    (PointerSet::P_ACTIVE_PLAYER, "p_active_player"),
    (PointerSet::P_ACTIVE_PLAYER2, "p_active_player2"),
    (PointerSet::ACTIVE_NPC, "active_npc"),
    (PointerSet::ACTIVE_NPC2, "active_npc2"),
    (PointerSet::ACTIVE_LOC, "active_loc"),
    (PointerSet::ACTIVE_LOC2, "active_loc2"),
    (PointerSet::ACTIVE_OBJ, "active_obj"),
    (PointerSet::ACTIVE_OBJ2, "active_obj2"),
    (PointerSet::FIND_PLAYER, "find_player"),
    (PointerSet::FIND_NPC, "find_npc"),
    (PointerSet::FIND_LOC, "find_loc"),
    (PointerSet::FIND_OBJ, "find_obj"),
    (PointerSet::LAST_COM, "last_com"),
];

impl PointerSet {
    /// The script-facing name of a single pointer.
    ///
    /// Returns `None` for the empty set or a set with several members.
    pub fn pointer_name(self) -> Option<&'static str> {
        POINTER_NAMES
            .iter()
            .find(|(pointer, _)| *pointer == self)
            .map(|(_, name)| *name)
    }

    /// Looks a single pointer up by its script-facing name.
    pub fn from_pointer_name(name: &str) -> Option<PointerSet> {
        POINTER_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(pointer, _)| *pointer)
    }

    /// Iterates the single-pointer members of this set.
    pub fn pointers(self) -> impl Iterator<Item = PointerSet> {
        self.iter()
    }
}

impl fmt::Display for PointerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        f.write_str("{")?;
        for pointer in self.pointers() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            f.write_str(pointer.pointer_name().unwrap_or("?"))?;
        }
        f.write_str("}")
    }
}

/// The pointer contract of a command or a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerEffects {
    /// Pointers that must be valid before the operation runs.
    pub required: PointerSet,
    /// Pointers that are valid after the operation.
    pub set: PointerSet,
    /// `set` only holds along the true outcome of the operation's result.
    pub conditional_set: bool,
    /// Pointers invalidated by the operation.
    pub corrupted: PointerSet,
}

impl PointerEffects {
    /// No requirements and no effects.
    pub const EMPTY: PointerEffects = PointerEffects {
        required: PointerSet::empty(),
        set: PointerSet::empty(),
        conditional_set: false,
        corrupted: PointerSet::empty(),
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn requires(mut self, pointers: PointerSet) -> Self {
        self.required |= pointers;
        self
    }

    pub fn sets(mut self, pointers: PointerSet) -> Self {
        self.set |= pointers;
        self
    }

    /// Marks `pointers` as set only when the operation reports success.
    pub fn sets_conditionally(mut self, pointers: PointerSet) -> Self {
        self.set |= pointers;
        self.conditional_set = true;
        self
    }

    pub fn corrupts(mut self, pointers: PointerSet) -> Self {
        self.corrupted |= pointers;
        self
    }

    /// Pointers set on every outcome of the operation.
    pub fn definite_set(&self) -> PointerSet {
        if self.conditional_set {
            PointerSet::empty()
        } else {
            self.set
        }
    }

    /// Whether the operation leaves `pointer` valid, even if it was corrupted
    /// earlier in the same operation.
    pub fn restores(&self, pointer: PointerSet) -> bool {
        self.definite_set().contains(pointer) && !self.corrupted.contains(pointer)
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.set.is_empty() && self.corrupted.is_empty()
    }
}

/// Per-command pointer metadata supplied by the engine's command listing.
#[derive(Debug, Clone, Default)]
pub struct CommandPointers {
    commands: FxHashMap<String, PointerEffects>,
}

impl CommandPointers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the contract of a command, replacing any previous one.
    pub fn insert(&mut self, command: impl Into<String>, effects: PointerEffects) {
        self.commands.insert(command.into(), effects);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, command: impl Into<String>, effects: PointerEffects) -> Self {
        self.insert(command, effects);
        self
    }

    /// The contract of a command. Unknown commands have no effects.
    pub fn get(&self, command: &str) -> PointerEffects {
        self.commands
            .get(command)
            .copied()
            .unwrap_or(PointerEffects::EMPTY)
    }

    pub fn contains(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_names_round_trip() {
        for pointer in PointerSet::all().pointers() {
            let name = pointer.pointer_name().unwrap();
            assert_eq!(PointerSet::from_pointer_name(name), Some(pointer));
        }
        assert_eq!(PointerSet::from_pointer_name("nothing"), None);
    }

    #[test]
    fn multi_member_set_has_no_name() {
        let set = PointerSet::ACTIVE_PLAYER | PointerSet::ACTIVE_NPC;
        assert_eq!(set.pointer_name(), None);
        assert_eq!(set.to_string(), "{active_player, active_npc}");
    }

    #[test]
    fn unknown_command_has_no_effects() {
        let commands = CommandPointers::new().with(
            "npc_find",
            PointerEffects::new().sets_conditionally(PointerSet::ACTIVE_NPC),
        );
        assert!(commands.get("npc_find").conditional_set);
        assert_eq!(commands.get("mes"), PointerEffects::EMPTY);
    }

    #[test]
    fn conditional_set_is_not_definite() {
        let find = PointerEffects::new().sets_conditionally(PointerSet::ACTIVE_NPC);
        assert!(find.definite_set().is_empty());
        assert!(!find.restores(PointerSet::ACTIVE_NPC));

        let set = PointerEffects::new().sets(PointerSet::ACTIVE_NPC);
        assert!(set.restores(PointerSet::ACTIVE_NPC));
        assert!(!set.corrupts(PointerSet::ACTIVE_NPC).restores(PointerSet::ACTIVE_NPC));
    }
}
