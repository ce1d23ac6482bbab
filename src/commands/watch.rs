//! `owatch` - watch an Objective-C method's entry point.
//!
//! Resolves the method like `obrk`, asks the host for a watch on the IMP,
//! and prints which registers will hold the receiver, the selector, and the
//! declared arguments when the method is entered on this target.

use crate::commands::{split_verbose, with_usage, CommandContext};
use crate::engine::error::ObjcError;
use crate::engine::registers::ArgRegisters;
use crate::engine::resolve::Resolver;
use crate::engine::signature::parse_signature;

const USAGE: &str = "Usage: owatch [--verbose] -[ClassName selector:] or owatch +[ClassName classMethod:]";

/// Resolve a method reference and create a watch at its IMP.
pub fn run(ctx: &mut CommandContext, line: &str) -> Result<String, ObjcError> {
    let (verbose, rest) = split_verbose(line);
    ctx.ensure_halted()?;

    let sig = parse_signature(rest).map_err(|e| with_usage(USAGE, e))?;

    let mut out = String::new();
    let mut resolver = Resolver::new(&mut *ctx.eval).verbose(verbose);
    let resolved = resolver.resolve(&sig)?;
    for trace_line in resolver.trace() {
        out.push_str(trace_line);
        out.push('\n');
    }

    let label = sig.to_string();
    let id = ctx
        .sink
        .create_watchpoint(resolved.imp_addr, &label)
        .map_err(|detail| ObjcError::SinkFailure {
            what: "watchpoint",
            address: resolved.imp_addr,
            detail,
        })?;

    out.push_str(&format!(
        "Watch #{} set at {} (IMP 0x{:x})\n",
        id, label, resolved.imp_addr
    ));

    let regs = ArgRegisters::for_triple(&ctx.process.triple());
    out.push_str(&render_entry_plan(&sig.selector, regs));
    Ok(out)
}

/// Describe where the method's values live at entry.
fn render_entry_plan(selector: &str, regs: ArgRegisters) -> String {
    let arg_count = selector.matches(':').count();
    if arg_count == 0 {
        return format!("At entry: self in {}, _cmd in {}\n", regs.self_reg, regs.cmd_reg);
    }

    let in_regs: Vec<&str> = regs.arg_regs.iter().take(arg_count).copied().collect();
    let mut plan = format!(
        "At entry: self in {}, _cmd in {}, arguments in {}\n",
        regs.self_reg,
        regs.cmd_reg,
        in_regs.join(", ")
    );
    if arg_count > regs.max_args() {
        plan.push_str(&format!(
            "({} further arguments passed on the stack)\n",
            arg_count - regs.max_args()
        ));
    }
    plan
}
