//! `obrk` - set a breakpoint on an Objective-C method, including methods of
//! private classes, by resolving the implementation at runtime.

use crate::commands::{with_usage, CommandContext};
use crate::engine::error::ObjcError;
use crate::engine::resolve::Resolver;
use crate::engine::signature::parse_signature;

const USAGE: &str = "Usage: obrk -[ClassName selector:] or obrk +[ClassName classMethod:]";

/// Resolve a method reference and create a breakpoint at its IMP.
pub fn run(ctx: &mut CommandContext, line: &str) -> Result<String, ObjcError> {
    ctx.ensure_halted()?;

    let sig = parse_signature(line).map_err(|e| with_usage(USAGE, e))?;

    let mut out = format!("Resolving {} method: {}\n", sig.kind.describe(), sig);

    // The resolution chain is always shown, so a failed step is easy to
    // place even without re-running verbose
    let mut resolver = Resolver::new(&mut *ctx.eval).verbose(true);
    let resolved = resolver.resolve(&sig)?;
    for trace_line in resolver.trace() {
        out.push_str(trace_line);
        out.push('\n');
    }

    let label = sig.to_string();
    let id = ctx
        .sink
        .create_breakpoint(resolved.imp_addr, &label)
        .map_err(|detail| ObjcError::SinkFailure {
            what: "breakpoint",
            address: resolved.imp_addr,
            detail,
        })?;

    out.push_str(&format!("\nBreakpoint #{} set at {}\n", id, label));
    Ok(out)
}
