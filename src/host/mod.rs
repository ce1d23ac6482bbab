//! Host debugger capability seam.
//!
//! Everything effectful the engine does goes through the narrow traits in
//! this module: expression evaluation in the halted process, process state
//! introspection, and breakpoint/watchpoint creation. The engine itself
//! never touches the target directly, so it can be exercised end-to-end
//! with scripted evaluators in tests.

use log::debug;

use crate::engine::error::ObjcError;

/// Result of evaluating one expression in the halted process.
///
/// On success, `message` carries the host's textual rendering of the value
/// (hex for pointers, the quoted C string for `const char *` results, an
/// object summary for `id` results). On failure it carries the diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalResult {
    /// Raw numeric result; pointers and integers are both carried here
    pub value: u64,
    /// Did the host evaluate the expression successfully?
    pub ok: bool,
    /// Rendering of the value on success, diagnostic on failure
    pub message: String,
}

impl EvalResult {
    /// A successful evaluation
    pub fn success(value: u64, message: impl Into<String>) -> Self {
        Self {
            value,
            ok: true,
            message: message.into(),
        }
    }

    /// A failed evaluation with the host's diagnostic
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            value: 0,
            ok: false,
            message: message.into(),
        }
    }
}

/// Evaluates C-like expressions against the selected frame of the halted
/// process. One blocking round-trip per call; the adapter owns timeouts.
#[cfg_attr(test, mockall::automock)]
pub trait Evaluator {
    /// Evaluate a single expression and return its scalar result
    fn evaluate(&mut self, expression: &str) -> EvalResult;
}

/// Read-only view of the target process state.
pub trait ProcessContext {
    /// Is the target verified to be stopped?
    fn is_halted(&self) -> bool;

    /// Target architecture triple, e.g. "arm64-apple-macosx14.0.0"
    fn triple(&self) -> String;
}

/// Receives breakpoint and watchpoint requests for resolved addresses.
///
/// The label is the human-readable method name (`-[NSString length]`);
/// the return value is the host's opaque identifier for the new stop.
pub trait EventSink {
    /// Create a breakpoint at an implementation address
    fn create_breakpoint(&mut self, address: u64, label: &str) -> Result<u32, String>;

    /// Create a watch on an implementation address
    fn create_watchpoint(&mut self, address: u64, label: &str) -> Result<u32, String>;
}

/// What a non-zero evaluator result is about to be interpreted as.
///
/// The tag is chosen by the call site, so a zero or failed result maps to
/// the error for that step instead of leaking an untyped null downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A `Class` pointer looked up by name
    ClassPointer,
    /// A `SEL` looked up by name
    SelectorPointer,
    /// The metaclass (or dynamic class) of an object
    Metaclass,
    /// A method implementation entry point
    ImpAddress,
    /// A runtime-allocated buffer (copied list, count cell)
    Buffer,
}

/// Collapse "host reported failure" and "host reported success with a null
/// result" into the same typed error for the step described by `kind`.
///
/// The runtime reports success with a null result for lookups of names that
/// do not exist, so both paths must be caught here; a zero pointer is never
/// propagated as a valid address.
pub fn require_nonzero(result: &EvalResult, kind: ValueKind, subject: &str) -> Result<u64, ObjcError> {
    let detail = if result.ok {
        if result.value != 0 {
            return Ok(result.value);
        }
        debug!("{:?} lookup for '{}' returned null", kind, subject);
        "runtime lookup returned null".to_string()
    } else {
        debug!("{:?} lookup for '{}' failed: {}", kind, subject, result.message);
        result.message.clone()
    };

    Err(match kind {
        ValueKind::ClassPointer => ObjcError::ClassNotFound {
            name: subject.to_string(),
            detail,
        },
        ValueKind::SelectorPointer => ObjcError::SelectorNotFound {
            name: subject.to_string(),
            detail,
        },
        ValueKind::Metaclass => ObjcError::MetaclassResolutionFailed {
            name: subject.to_string(),
            detail,
        },
        ValueKind::ImpAddress => ObjcError::ImplementationNotFound {
            method: subject.to_string(),
            detail,
        },
        ValueKind::Buffer => ObjcError::QueryFailed {
            what: subject.to_string(),
            detail,
        },
    })
}

/// Remove exactly one pair of double quotes and unescape interior `\"`.
///
/// Hosts render `const char *` results as quoted strings, and type encodings
/// can themselves contain escaped quotes (`"@\"NSString\""`). Stripping all
/// consecutive quotes would corrupt those, so exactly one pair comes off.
pub fn unquote(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].replace("\\\"", "\"")
    } else {
        s.to_string()
    }
}
