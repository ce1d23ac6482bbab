//! `oprotos` - protocol conformances of a class.

use crate::commands::CommandContext;
use crate::engine::error::ObjcError;
use crate::engine::query::RuntimeQuery;
use crate::engine::resolve::Resolver;

const USAGE: &str = "Usage: oprotos <ClassName>";

/// List the protocols a class adopts itself, then the conformances it
/// inherits, grouped per superclass-chain ancestor.
pub fn run(ctx: &mut CommandContext, line: &str) -> Result<String, ObjcError> {
    ctx.ensure_halted()?;

    let mut tokens = line.split_whitespace();
    let class_name = match (tokens.next(), tokens.next()) {
        (Some(name), None) => name,
        _ => return Err(ObjcError::Syntax(USAGE.to_string())),
    };

    let class_ptr = Resolver::new(&mut *ctx.eval).class_by_name(class_name)?;

    let mut query = RuntimeQuery::new(&mut *ctx.eval);
    let own = query.protocols_of(class_ptr)?;

    let mut out = format!("Protocols adopted by {}:\n", class_name);
    if own.is_empty() {
        out.push_str("  (none)\n");
    }
    for protocol in &own {
        out.push_str(&format!("  {}\n", protocol));
    }

    for ancestor in query.ancestors(class_ptr)? {
        let inherited = query.protocols_of(ancestor.ptr)?;
        if inherited.is_empty() {
            continue;
        }
        out.push_str(&format!("\nInherited from {}:\n", ancestor.name));
        for protocol in &inherited {
            out.push_str(&format!("  {}\n", protocol));
        }
    }

    Ok(out)
}
