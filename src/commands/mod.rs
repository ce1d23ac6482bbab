//! Operator command surfaces.
//!
//! Each command is thin glue over the engine: parse the argument line, check
//! the halted-process precondition, run the resolution or query, and render
//! text for the host to print. The host registers the commands under its own
//! names (obrk, osel, ocls, ocall, owatch, oprotos) and routes the argument
//! line here.

pub mod breakpoint;
pub mod call;
pub mod classes;
pub mod protos;
pub mod selectors;
pub mod watch;

use anyhow::anyhow;

use crate::engine::error::ObjcError;
use crate::host::{Evaluator, EventSink, ProcessContext};

/// Borrowed host capabilities for one command invocation.
///
/// Nothing is retained across invocations; every command gets a fresh view
/// of the (possibly resumed and re-stopped) target.
pub struct CommandContext<'a> {
    pub process: &'a dyn ProcessContext,
    pub eval: &'a mut dyn Evaluator,
    pub sink: &'a mut dyn EventSink,
}

impl<'a> CommandContext<'a> {
    /// Fail before any evaluator traffic if the target is not stopped.
    pub fn ensure_halted(&self) -> Result<(), ObjcError> {
        if self.process.is_halted() {
            Ok(())
        } else {
            Err(ObjcError::ProcessNotStopped)
        }
    }
}

/// Route one command line from the host to the matching surface.
///
/// Hosts that register the six commands individually can call the `run`
/// functions directly; this is the single entry point for hosts that route
/// by name.
pub fn dispatch(ctx: &mut CommandContext, command: &str, line: &str) -> anyhow::Result<String> {
    let result = match command {
        "obrk" => breakpoint::run(ctx, line),
        "osel" => selectors::run(ctx, line),
        "ocls" => classes::run(ctx, line),
        "ocall" => call::run(ctx, line),
        "owatch" => watch::run(ctx, line),
        "oprotos" => protos::run(ctx, line),
        other => return Err(anyhow!("Unknown command: {}", other)),
    };
    result.map_err(Into::into)
}

/// Strip a leading `--verbose` / `-v` flag from an argument line.
pub fn split_verbose(line: &str) -> (bool, &str) {
    let trimmed = line.trim_start();
    for flag in ["--verbose", "-v"] {
        if let Some(rest) = trimmed.strip_prefix(flag) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return (true, rest.trim_start());
            }
        }
    }
    (false, trimmed)
}

/// Prefix a syntax error with the command's usage line.
fn with_usage(usage: &str, err: ObjcError) -> ObjcError {
    match err {
        ObjcError::Syntax(msg) => ObjcError::Syntax(format!("{}\n{}", usage, msg)),
        other => other,
    }
}
