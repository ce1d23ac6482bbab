//! `osel` - search the selectors of one class and its superclass chain.

use crate::commands::CommandContext;
use crate::engine::error::ObjcError;
use crate::engine::pattern::NamePattern;
use crate::engine::query::RuntimeQuery;
use crate::engine::resolve::Resolver;

const USAGE: &str = "Usage: osel <ClassName> [selector-pattern]";

/// List selectors of a class, optionally filtered by a pattern, with
/// inherited matches grouped per ancestor.
pub fn run(ctx: &mut CommandContext, line: &str) -> Result<String, ObjcError> {
    ctx.ensure_halted()?;

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (class_name, pattern) = match tokens.as_slice() {
        [class_name] => (*class_name, None),
        [class_name, pattern_token] => (*class_name, Some(NamePattern::parse(pattern_token))),
        _ => return Err(ObjcError::Syntax(USAGE.to_string())),
    };

    let class_ptr = Resolver::new(&mut *ctx.eval).class_by_name(class_name)?;

    let mut query = RuntimeQuery::new(&mut *ctx.eval);
    let own: Vec<String> = query
        .selectors_of(class_ptr)?
        .into_iter()
        .filter(|sel| pattern.as_ref().map_or(true, |p| p.matches(sel)))
        .collect();

    let mut out = match &pattern {
        Some(p) => format!("Selectors in {} matching '{}':\n", class_name, p.raw()),
        None => format!("Selectors in {}:\n", class_name),
    };
    if own.is_empty() {
        out.push_str("  (none)\n");
    }
    for selector in &own {
        out.push_str(&format!("  {}\n", selector));
    }
    let mut total = own.len();

    // Inherited matches, grouped per ancestor so the operator can see where
    // each method actually lives
    for ancestor in query.ancestors(class_ptr)? {
        let inherited: Vec<String> = query
            .selectors_of(ancestor.ptr)?
            .into_iter()
            .filter(|sel| pattern.as_ref().map_or(true, |p| p.matches(sel)))
            .collect();
        if inherited.is_empty() {
            continue;
        }
        out.push_str(&format!("\nInherited from {}:\n", ancestor.name));
        for selector in &inherited {
            out.push_str(&format!("  {}\n", selector));
        }
        total += inherited.len();
    }

    out.push_str(&format!(
        "\nFound {} {}\n",
        total,
        if total == 1 { "selector" } else { "selectors" }
    ));
    Ok(out)
}
