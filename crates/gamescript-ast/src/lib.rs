//! Type-resolved syntax tree consumed by the gamescript back end.
//!
//! The tree is produced by the parser and decorated by the type checker;
//! both live upstream. Every node is arena-allocated in a [`bumpalo::Bump`]
//! and borrowed for `'ast`, so nodes are `Copy` and cheap to pass around.
//!
//! By the time a tree reaches the back end:
//! - every expression carries its resolved [`Type`](gamescript_core::Type),
//! - every call, variable and identifier that names something carries its
//!   resolved [`Symbol`](gamescript_core::Symbol) (or `None` if resolution
//!   failed, which the emitter reports as an internal error).
//!
//! [`TreeBuilder`] wraps an arena with constructors for every node kind.

pub mod builder;
pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use builder::TreeBuilder;
pub use decl::{ScriptDecl, ScriptFile};
pub use expr::*;
pub use ops::{ArithmeticOp, BinaryOp, CallKind};
pub use stmt::*;
