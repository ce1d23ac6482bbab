//! `ocls` - search the live class namespace and show inheritance.
//!
//! Output tier follows the match count: a unique match gets the full
//! hierarchy view (plus the ivar layout when verbose), 2 to 20 matches get
//! one compact chain line each, and larger result sets get a flat name list
//! so a broad pattern does not trigger hundreds of hierarchy walks against
//! the live process.

use crate::commands::{split_verbose, CommandContext};
use crate::engine::error::ObjcError;
use crate::engine::pattern::NamePattern;
use crate::engine::query::{MatchTier, RuntimeQuery};

const USAGE: &str = "Usage: ocls [--verbose] <class-pattern>";

/// Enumerate classes matching a pattern and render them by tier.
pub fn run(ctx: &mut CommandContext, line: &str) -> Result<String, ObjcError> {
    let (verbose, rest) = split_verbose(line);
    ctx.ensure_halted()?;

    let mut tokens = rest.split_whitespace();
    let pattern_token = match (tokens.next(), tokens.next()) {
        (Some(token), None) => token,
        _ => return Err(ObjcError::Syntax(USAGE.to_string())),
    };
    let pattern = NamePattern::parse(pattern_token);

    let mut query = RuntimeQuery::new(&mut *ctx.eval);
    let mut matches = query.classes_matching(&pattern)?;
    if matches.is_empty() {
        return Ok(format!("No classes matching '{}'\n", pattern_token));
    }
    matches.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = format!(
        "Found {} {} matching '{}':\n",
        matches.len(),
        if matches.len() == 1 { "class" } else { "classes" },
        pattern_token
    );

    match MatchTier::for_count(matches.len()) {
        MatchTier::Single => {
            let class = &matches[0];
            let chain = query.hierarchy(&class.name, class.ptr)?;
            out.push('\n');
            out.push_str(&chain[0]);
            out.push('\n');
            for link in &chain[1..] {
                out.push_str(&format!("  → {}\n", link));
            }
            if verbose {
                render_layout(&mut query, class.ptr, &mut out)?;
            }
        }
        MatchTier::Compact => {
            for class in &matches {
                let chain = query.hierarchy(&class.name, class.ptr)?;
                out.push_str(&format!("  {}\n", chain.join(" → ")));
            }
        }
        MatchTier::List => {
            for class in &matches {
                out.push_str(&format!("  {}\n", class.name));
            }
        }
    }

    Ok(out)
}

/// Append the instance layout of a uniquely matched class.
fn render_layout(
    query: &mut RuntimeQuery,
    class_ptr: u64,
    out: &mut String,
) -> Result<(), ObjcError> {
    let size = query.instance_size(class_ptr)?;
    let ivars = query.ivars_of(class_ptr)?;

    out.push_str(&format!("\nInstance size: {} bytes\n", size));
    if ivars.is_empty() {
        out.push_str("No instance variables\n");
        return Ok(());
    }
    for ivar in &ivars {
        out.push_str(&format!(
            "  +0x{:04x} {} ({})\n",
            ivar.offset, ivar.name, ivar.type_encoding
        ));
    }
    Ok(())
}
