//! Resolved symbols.
//!
//! The type checker binds every identifier, call and variable reference of
//! the tree to one of these. Symbols are shared (`Rc`) between the tree, the
//! emitted instructions and the analyzer caches.

use std::fmt;
use std::rc::Rc;

use xxhash_rust::xxh64::xxh64;

use crate::{BaseVarType, Trigger, Type};

/// Stable identity of a script, derived from its trigger and name.
///
/// Used as the key of every per-script cache so that two `Rc`s of the same
/// declaration (or a forward reference built before the declaration) agree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolHash(pub u64);

impl SymbolHash {
    const SEED: u64 = 0x5ea77ffbcdf5f302;

    pub fn of_script(trigger: Trigger, name: &str) -> Self {
        let key = format!("[{trigger},{name}]");
        SymbolHash(xxh64(key.as_bytes(), Self::SEED))
    }
}

impl fmt::Debug for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolHash({:#018x})", self.0)
    }
}

/// A script declaration `[trigger,name](params)(returns)`.
#[derive(Debug, Clone)]
pub struct ScriptSymbol {
    pub trigger: Trigger,
    pub name: String,
    pub parameters: Vec<Type>,
    pub returns: Vec<Type>,
    hash: SymbolHash,
}

impl ScriptSymbol {
    pub fn new(
        trigger: Trigger,
        name: impl Into<String>,
        parameters: Vec<Type>,
        returns: Vec<Type>,
    ) -> Self {
        let name = name.into();
        let hash = SymbolHash::of_script(trigger, &name);
        Self {
            trigger,
            name,
            parameters,
            returns,
            hash,
        }
    }

    pub fn hash(&self) -> SymbolHash {
        self.hash
    }
}

impl PartialEq for ScriptSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for ScriptSymbol {}

impl fmt::Display for ScriptSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.trigger, self.name)
    }
}

/// An engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSymbol {
    pub name: String,
    pub parameters: Vec<Type>,
    pub returns: Vec<Type>,
}

impl CommandSymbol {
    pub fn new(name: impl Into<String>, parameters: Vec<Type>, returns: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            parameters,
            returns,
        }
    }
}

/// A script-local variable or parameter (`$name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariableSymbol {
    pub name: String,
    pub ty: Type,
}

impl LocalVariableSymbol {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Which local slot space the variable lives in.
    ///
    /// Arrays are always integer arrays.
    pub fn base_type(&self) -> BaseVarType {
        match self.ty {
            Type::Primitive(p) => p.base_type(),
            Type::Array(_) | Type::Unit => BaseVarType::Integer,
        }
    }
}

/// Which engine entity stores a game variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameVarKind {
    /// Player variable (`%name`).
    Player,
    /// Bit-packed player variable.
    Bit,
    /// Npc variable.
    Npc,
}

/// A variable stored by the engine on a player or npc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameVariableSymbol {
    pub name: String,
    pub kind: GameVarKind,
    pub ty: Type,
    /// Writing requires protected access to the owner.
    pub protected: bool,
}

impl GameVariableSymbol {
    pub fn new(name: impl Into<String>, kind: GameVarKind, ty: Type) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            protected: false,
        }
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }
}

/// A named constant (`^name`) and its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantSymbol {
    pub name: String,
    pub value: String,
}

/// A named config entry, e.g. an obj or npc type referenced by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSymbol {
    pub name: String,
    pub ty: Type,
}

impl ConfigSymbol {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Any resolved symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Script(Rc<ScriptSymbol>),
    Command(Rc<CommandSymbol>),
    Local(Rc<LocalVariableSymbol>),
    Game(Rc<GameVariableSymbol>),
    Constant(Rc<ConstantSymbol>),
    Config(Rc<ConfigSymbol>),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Script(s) => &s.name,
            Symbol::Command(s) => &s.name,
            Symbol::Local(s) => &s.name,
            Symbol::Game(s) => &s.name,
            Symbol::Constant(s) => &s.name,
            Symbol::Config(s) => &s.name,
        }
    }

    pub fn as_script(&self) -> Option<&Rc<ScriptSymbol>> {
        match self {
            Symbol::Script(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&Rc<CommandSymbol>> {
        match self {
            Symbol::Command(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_game_variable(&self) -> Option<&Rc<GameVariableSymbol>> {
        match self {
            Symbol::Game(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_local(&self) -> Option<&Rc<LocalVariableSymbol>> {
        match self {
            Symbol::Local(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Script(s) => write!(f, "{s}"),
            Symbol::Command(s) => f.write_str(&s.name),
            Symbol::Local(s) => write!(f, "${}", s.name),
            Symbol::Game(s) => write!(f, "%{}", s.name),
            Symbol::Constant(s) => write!(f, "^{}", s.name),
            Symbol::Config(s) => f.write_str(&s.name),
        }
    }
}
