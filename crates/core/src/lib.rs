//! solscope-core: Solidity declaration and type resolution engine.
//!
//! Extracts a machine-usable interface description from raw Solidity-like
//! source text without running a compiler or building a full AST: every
//! public state variable and every `view`/`pure` function is turned into a
//! typed declaration paired with a canonical ABI item, and anything that
//! cannot be resolved is reported as a diagnostic rather than guessed at.
//!
//! The engine is a pure function of its input string -- no I/O, no shared
//! state, trivially safe to call concurrently.
//!
//! # Public API
//!
//! Key entry points are re-exported at the crate root:
//!
//! - [`extract()`] -- full pipeline: source text to [`ParseResult`]
//! - [`TypeTable`] -- struct/enum/alias tables with recursive resolution
//! - [`abi_item()`] / [`signature()`] -- canonical ABI rendering
//!
//! The scanning primitives ([`strip`], [`scan`], [`mapping`], [`clause`])
//! are public as well; they are small, independently testable pieces the
//! extractor composes, honest about their limits -- a best-effort grammar,
//! not a block-scoped parser.

pub mod abi;
pub mod clause;
pub mod extract;
pub mod mapping;
pub mod resolve;
pub mod scan;
pub mod strip;
pub mod types;

// ── Convenience re-exports: key types ────────────────────────────────

pub use abi::{AbiItem, AbiParam};
pub use resolve::TypeTable;
pub use types::{
    Component, Declaration, Diagnostic, Mutability, Param, ParseResult, TypeDescriptor,
};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use abi::{abi_item, signature};
pub use extract::extract;
pub use strip::strip_comments;
