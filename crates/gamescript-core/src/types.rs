//! Script types.
//!
//! Every value type lowers to one of three stack representations
//! ([`BaseVarType`]); the emitter picks opcodes by that representation.

use std::fmt;

/// How a value is represented on the interpreter stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseVarType {
    /// 32-bit integer stack. Config references and booleans live here too.
    Integer,
    /// String stack.
    String,
    /// 64-bit integer stack.
    Long,
}

impl fmt::Display for BaseVarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BaseVarType::Integer => "integer",
            BaseVarType::String => "string",
            BaseVarType::Long => "long",
        })
    }
}

/// Scalar types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Boolean,
    Char,
    Coord,
    Long,
    String,
    Obj,
    NamedObj,
    Npc,
    Loc,
    Inv,
    Stat,
    Enum,
    Component,
    Seq,
    Spotanim,
    Category,
    Param,
    Struct,
    Synth,
}

impl PrimitiveType {
    /// The stack representation of this type.
    pub fn base_type(self) -> BaseVarType {
        match self {
            PrimitiveType::Long => BaseVarType::Long,
            PrimitiveType::String => BaseVarType::String,
            _ => BaseVarType::Integer,
        }
    }

    /// Single character code used in argument-type strings.
    pub fn code(self) -> char {
        match self {
            PrimitiveType::Int => 'i',
            PrimitiveType::Boolean => '1',
            PrimitiveType::Char => 'z',
            PrimitiveType::Coord => 'c',
            PrimitiveType::Long => 'Ï',
            PrimitiveType::String => 's',
            PrimitiveType::Obj => 'o',
            PrimitiveType::NamedObj => 'O',
            PrimitiveType::Npc => 'n',
            PrimitiveType::Loc => 'l',
            PrimitiveType::Inv => 'v',
            PrimitiveType::Stat => 'S',
            PrimitiveType::Enum => 'g',
            PrimitiveType::Component => 'I',
            PrimitiveType::Seq => 'A',
            PrimitiveType::Spotanim => 't',
            PrimitiveType::Category => 'y',
            PrimitiveType::Param => '\u{e0}',
            PrimitiveType::Struct => 'J',
            PrimitiveType::Synth => 'P',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Char => "char",
            PrimitiveType::Coord => "coord",
            PrimitiveType::Long => "long",
            PrimitiveType::String => "string",
            PrimitiveType::Obj => "obj",
            PrimitiveType::NamedObj => "namedobj",
            PrimitiveType::Npc => "npc",
            PrimitiveType::Loc => "loc",
            PrimitiveType::Inv => "inv",
            PrimitiveType::Stat => "stat",
            PrimitiveType::Enum => "enum",
            PrimitiveType::Component => "component",
            PrimitiveType::Seq => "seq",
            PrimitiveType::Spotanim => "spotanim",
            PrimitiveType::Category => "category",
            PrimitiveType::Param => "param",
            PrimitiveType::Struct => "struct",
            PrimitiveType::Synth => "synth",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved type attached to an expression, variable or signature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    /// A local array of a primitive element type.
    Array(PrimitiveType),
    /// No value.
    Unit,
}

impl Type {
    pub const INT: Type = Type::Primitive(PrimitiveType::Int);
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveType::Boolean);
    pub const STRING: Type = Type::Primitive(PrimitiveType::String);
    pub const LONG: Type = Type::Primitive(PrimitiveType::Long);
    pub const COORD: Type = Type::Primitive(PrimitiveType::Coord);

    /// Stack representation, if the type has a single one.
    ///
    /// Arrays are addressed element-wise and unit has no value, so neither
    /// has a base type.
    pub fn base_type(self) -> Option<BaseVarType> {
        match self {
            Type::Primitive(p) => Some(p.base_type()),
            Type::Array(_) | Type::Unit => None,
        }
    }

    pub fn as_primitive(self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(self, Type::Array(_))
    }
}

impl From<PrimitiveType> for Type {
    fn from(p: PrimitiveType) -> Self {
        Type::Primitive(p)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Array(p) => write!(f, "{p}array"),
            Type::Unit => f.write_str("unit"),
        }
    }
}
