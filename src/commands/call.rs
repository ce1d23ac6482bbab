//! `ocall` - invoke an Objective-C method in the halted process and show
//! the returned value.

use crate::commands::{split_verbose, with_usage, CommandContext};
use crate::engine::error::ObjcError;
use crate::engine::invoke::MethodCall;
use crate::engine::registers::ArgRegisters;
use crate::engine::signature::parse_call;

const USAGE: &str =
    "Usage: ocall [--verbose] -[receiver selector args...] or ocall +[ClassName selector args...]";

/// Parse and perform one invocation.
///
/// Receiver forms: a class name (`+[NSDate date]`), an address literal
/// (`-[0x600001234560 description]`), or a `$`-prefixed register or
/// expression variable (`-[$x0 description]`).
pub fn run(ctx: &mut CommandContext, line: &str) -> Result<String, ObjcError> {
    let (verbose, rest) = split_verbose(line);
    ctx.ensure_halted()?;

    let call = parse_call(rest).map_err(|e| with_usage(USAGE, e))?;
    let regs = ArgRegisters::for_triple(&ctx.process.triple());

    let outcome = MethodCall::new(&call, regs).perform(&mut *ctx.eval, verbose)?;

    let mut out = String::new();
    if verbose {
        out.push_str(&format!("Resolving {} method: {}\n", call.kind.describe(), call));
        for trace_line in &outcome.trace {
            out.push_str(trace_line);
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(&format!("{} returned: {}\n", call, outcome.rendered));
    Ok(out)
}
