//! Engine error taxonomy.
//!
//! Every failure is terminal for the current command invocation and carries
//! enough context (which step, which symbol, the host's own diagnostic) for
//! the operator to retry by hand. Nothing is auto-retried: a failed
//! evaluation against a given halted-process state is deterministic.

use thiserror::Error;

/// Errors produced by parsing, resolution, and runtime queries.
#[derive(Debug, Error)]
pub enum ObjcError {
    /// Malformed reference or pattern; reported before any process access
    #[error("{0}")]
    Syntax(String),

    /// The target was not verified stopped; no evaluator calls were made
    #[error("Process must be running and stopped")]
    ProcessNotStopped,

    /// Step 1 of the resolution protocol failed
    #[error("Class '{name}' not found: {detail}")]
    ClassNotFound { name: String, detail: String },

    /// Step 2 of the resolution protocol failed
    #[error("Selector '{name}' not found: {detail}")]
    SelectorNotFound { name: String, detail: String },

    /// Step 3 (class methods only) failed
    #[error("Failed to get metaclass of {name}: {detail}")]
    MetaclassResolutionFailed { name: String, detail: String },

    /// Step 4 failed: the (class, selector) pair has no implementation
    #[error("Method implementation not found for {method}: {detail}")]
    ImplementationNotFound { method: String, detail: String },

    /// A runtime table enumeration failed mid-query
    #[error("Runtime query failed ({what}): {detail}")]
    QueryFailed { what: String, detail: String },

    /// More inline arguments than the target convention passes in registers
    #[error("Too many arguments: {given} given, {max} register slots on {arch}")]
    TooManyArguments {
        given: usize,
        max: usize,
        arch: &'static str,
    },

    /// The receiver or the invocation expression itself failed in the target
    #[error("Method call failed: {0}")]
    CallFailed(String),

    /// The host rejected a breakpoint/watchpoint request
    #[error("Failed to create {what} at 0x{address:x}: {detail}")]
    SinkFailure {
        what: &'static str,
        address: u64,
        detail: String,
    },
}
