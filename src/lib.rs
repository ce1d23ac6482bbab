//! OBJCAT - Objective-C runtime symbol resolution for native debuggers
//!
//! This library turns symbolic Objective-C references (`-[NSString length]`,
//! `+[NSDate date]`, wildcard class and selector patterns) into concrete
//! runtime addresses by issuing ordered expression sequences against a halted
//! process, and renders the operator commands built on top of that engine
//! (obrk, osel, ocls, ocall, owatch, oprotos).
//!
//! The host debugger owns process control, command registration, and
//! breakpoint storage; it hands objcat an expression evaluator, process
//! state, and a breakpoint/watchpoint sink through the traits in [`host`].

pub mod commands;
pub mod engine;
pub mod host;

/// Re-export key types for easier access in hosts and tests
pub use engine::error::ObjcError;
pub use engine::pattern::NamePattern;
pub use engine::query::{MatchTier, RuntimeQuery, COMPACT_MAX, MAX_SUPERCLASS_DEPTH};
pub use engine::registers::ArgRegisters;
pub use engine::resolve::{ResolvedMethod, Resolver};
pub use engine::signature::{CallExpr, CallTarget, MethodKind, MethodSignature};
pub use host::{EvalResult, Evaluator, EventSink, ProcessContext};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize the logging system
pub fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .filter_module("objcat", level)
        .format_timestamp_secs()
        .init();
}
