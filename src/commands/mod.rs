//! Per-program shell command policies and the collaborator queries they use.
//!
//! `bash-guard` splits a command line into segments and hands each one to
//! the `CommandSpec` registered for its program. Programs without a spec
//! are allowed.

/// bd (beads issue tracker): create validation and close/epic checks.
pub mod bd;
/// gh (GitHub CLI): merged pull request lookup.
pub mod gh;
/// git: hook-bypass detection and branch/remote queries.
pub mod git;

use crate::eval::{CommandContext, Outcome};
use crate::external::Tools;

/// Trait for per-program command policies.
///
/// Each implementation knows how to evaluate one program's command lines
/// and returns an `Outcome`: `Allow` to let the segment through, or a
/// `Deny` carrying the reason.
pub trait CommandSpec: Send + Sync {
    /// Evaluate the command in the given context.
    fn evaluate(&self, ctx: &CommandContext, tools: &dyn Tools) -> Outcome;
}
