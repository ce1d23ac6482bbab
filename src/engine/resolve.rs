//! The method resolution protocol.
//!
//! Turns one parsed reference into concrete runtime pointers through a
//! strictly ordered pipeline of expression evaluations:
//!
//! 1. `NSClassFromString` - class name to `Class` pointer
//! 2. `NSSelectorFromString` - selector text to `SEL`
//! 3. `object_getClass` - metaclass, for class methods only
//! 4. `class_getMethodImplementation` - `(Class, SEL)` to IMP
//!
//! Each step embeds the previous step's pointer as a hex literal in the next
//! expression, so the steps cannot be reordered and the first failure is
//! terminal. A successful evaluation that returns null is a failure too: the
//! runtime answers name lookups for missing symbols with nil, not an error.

use log::debug;

use crate::engine::error::ObjcError;
use crate::engine::signature::{MethodKind, MethodSignature};
use crate::host::{require_nonzero, EvalResult, Evaluator, ValueKind};

/// A fully resolved method. Every pointer is non-zero by construction;
/// partial progress is reported through [`ObjcError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMethod {
    /// The class named in the reference
    pub class_ptr: u64,
    /// The selector
    pub sel_ptr: u64,
    /// The pointer implementation lookup ran against: the class itself for
    /// instance methods, its metaclass for class methods
    pub lookup_class_ptr: u64,
    /// Implementation entry point
    pub imp_addr: u64,
}

/// Drives the resolution pipeline against the host evaluator.
///
/// Never cached: class and selector identity is a snapshot of the currently
/// stopped process and is not assumed stable across resumes.
pub struct Resolver<'a> {
    eval: &'a mut dyn Evaluator,
    verbose: bool,
    trace: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(eval: &'a mut dyn Evaluator) -> Self {
        Self {
            eval,
            verbose: false,
            trace: Vec::new(),
        }
    }

    /// Collect human-readable per-step lines for the operator
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Per-step lines collected so far (empty unless verbose)
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Consume the resolver, keeping its trace
    pub fn into_trace(self) -> Vec<String> {
        self.trace
    }

    /// Resolve a full method reference to its implementation address.
    pub fn resolve(&mut self, sig: &MethodSignature) -> Result<ResolvedMethod, ObjcError> {
        // Step 1: class by name
        let class_ptr = self.class_by_name(&sig.class_name)?;

        // Step 2: selector by name
        let sel_ptr = self.selector_by_name(&sig.selector)?;

        // Step 3: class methods are implemented on the metaclass, so the
        // implementation lookup must run against it; instance methods use
        // the class pointer as-is
        let lookup_class_ptr = match sig.kind {
            MethodKind::Instance => class_ptr,
            MethodKind::Class => self.metaclass_of(class_ptr, &sig.class_name)?,
        };

        // Step 4: implementation address
        let imp_addr = self.implementation(lookup_class_ptr, sel_ptr, &sig.to_string())?;

        Ok(ResolvedMethod {
            class_ptr,
            sel_ptr,
            lookup_class_ptr,
            imp_addr,
        })
    }

    /// Step 1: resolve a class name to a `Class` pointer.
    pub fn class_by_name(&mut self, name: &str) -> Result<u64, ObjcError> {
        let expr = format!("(Class)NSClassFromString(@\"{}\")", name);
        let result = self.eval.evaluate(&expr);
        self.note("Class", &result);
        require_nonzero(&result, ValueKind::ClassPointer, name)
    }

    /// Step 2: resolve selector text to a `SEL`.
    pub fn selector_by_name(&mut self, selector: &str) -> Result<u64, ObjcError> {
        let expr = format!("(SEL)NSSelectorFromString(@\"{}\")", selector);
        let result = self.eval.evaluate(&expr);
        self.note("SEL", &result);
        require_nonzero(&result, ValueKind::SelectorPointer, selector)
    }

    /// Step 3: the metaclass of a class pointer. Also the dynamic class of
    /// an arbitrary object, which is what receiver-based calls need.
    pub fn metaclass_of(&mut self, object_ptr: u64, subject: &str) -> Result<u64, ObjcError> {
        let expr = format!("(Class)object_getClass((id)0x{:x})", object_ptr);
        let result = self.eval.evaluate(&expr);
        debug!("object_getClass(0x{:x}) -> 0x{:x}", object_ptr, result.value);
        require_nonzero(&result, ValueKind::Metaclass, subject)
    }

    /// Evaluate a `$`-prefixed receiver token (a register like `$x0` or an
    /// expression variable like `$obj`) in the frame.
    pub fn eval_receiver_token(&mut self, token: &str) -> EvalResult {
        let expr = format!("(id)({})", token);
        let result = self.eval.evaluate(&expr);
        debug!("receiver {} -> 0x{:x} (ok={})", token, result.value, result.ok);
        result
    }

    /// Step 4: implementation address for a `(Class, SEL)` pair.
    pub fn implementation(
        &mut self,
        lookup_class_ptr: u64,
        sel_ptr: u64,
        method: &str,
    ) -> Result<u64, ObjcError> {
        let expr = format!(
            "(void *)class_getMethodImplementation((Class)0x{:x}, (SEL)0x{:x})",
            lookup_class_ptr, sel_ptr
        );
        let result = self.eval.evaluate(&expr);
        self.note("IMP", &result);
        require_nonzero(&result, ValueKind::ImpAddress, method)
    }

    fn note(&mut self, label: &str, result: &EvalResult) {
        debug!("{}: 0x{:x} (ok={})", label, result.value, result.ok);
        if self.verbose && result.ok {
            let rendered = if result.message.is_empty() {
                format!("0x{:x}", result.value)
            } else {
                result.message.clone()
            };
            self.trace.push(format!("  {}: {}", label, rendered));
        }
    }
}
