//! Method invocation in the halted process.
//!
//! An invocation resolves its receiver and selector the same way breakpoint
//! resolution does, then casts the implementation address to a function
//! pointer and applies it. The lookup class is always
//! `object_getClass(receiver)`: for an instance that is its class, for a
//! class object it is the metaclass, so class methods need no special case.

use log::debug;

use crate::engine::error::ObjcError;
use crate::engine::registers::ArgRegisters;
use crate::engine::resolve::Resolver;
use crate::engine::signature::{CallExpr, CallTarget};
use crate::host::Evaluator;

/// Result of a performed call.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    /// Raw returned value
    pub value: u64,
    /// Host rendering of the returned value
    pub rendered: String,
    /// The implementation that was invoked
    pub imp_addr: u64,
    /// Resolution trace lines (empty unless verbose)
    pub trace: Vec<String>,
}

/// Marshals and performs one invocation.
pub struct MethodCall<'a> {
    call: &'a CallExpr,
    regs: ArgRegisters,
}

impl<'a> MethodCall<'a> {
    pub fn new(call: &'a CallExpr, regs: ArgRegisters) -> Self {
        Self { call, regs }
    }

    /// Reject calls whose inline arguments exceed the register-passed
    /// slots of the target convention, before any evaluator traffic.
    pub fn check_arity(&self) -> Result<(), ObjcError> {
        let given = self.call.args.len();
        let max = self.regs.max_args();
        if given > max {
            return Err(ObjcError::TooManyArguments {
                given,
                max,
                arch: self.regs.arch,
            });
        }
        Ok(())
    }

    /// Resolve the receiver, selector, and implementation, then perform
    /// the call and return the host's rendering of the result.
    pub fn perform(
        &self,
        eval: &mut dyn Evaluator,
        verbose: bool,
    ) -> Result<CallOutcome, ObjcError> {
        self.check_arity()?;

        let mut resolver = Resolver::new(&mut *eval).verbose(verbose);

        // Receiver first: its concrete pointer feeds every later step
        let receiver_label = self.call.target.to_string();
        let receiver = match &self.call.target {
            CallTarget::Class(name) => resolver.class_by_name(name)?,
            CallTarget::Address(addr) => *addr,
            CallTarget::Token(token) => {
                let result = resolver.eval_receiver_token(token);
                if !result.ok {
                    return Err(ObjcError::CallFailed(format!(
                        "failed to evaluate receiver '{}': {}",
                        token, result.message
                    )));
                }
                if result.value == 0 {
                    return Err(ObjcError::CallFailed(format!("receiver '{}' is nil", token)));
                }
                result.value
            }
        };

        let sel_ptr = resolver.selector_by_name(&self.call.selector)?;
        let lookup_class_ptr = resolver.metaclass_of(receiver, &receiver_label)?;
        let imp_addr =
            resolver.implementation(lookup_class_ptr, sel_ptr, &self.call.to_string())?;
        let trace = resolver.into_trace();

        let expr = self.call_expression(imp_addr, receiver, sel_ptr);
        debug!("invoking {}: {}", self.call, expr);
        let result = eval.evaluate(&expr);
        if !result.ok {
            return Err(ObjcError::CallFailed(result.message));
        }

        let rendered = if result.message.is_empty() {
            format!("0x{:x}", result.value)
        } else {
            result.message.clone()
        };
        Ok(CallOutcome {
            value: result.value,
            rendered,
            imp_addr,
            trace,
        })
    }

    /// Cast the IMP to a variadic function pointer and apply it.
    fn call_expression(&self, imp_addr: u64, receiver: u64, sel_ptr: u64) -> String {
        let mut expr = format!(
            "((id (*)(id, SEL, ...))0x{:x})((id)0x{:x}, (SEL)0x{:x}",
            imp_addr, receiver, sel_ptr
        );
        for arg in &self.call.args {
            expr.push_str(", ");
            expr.push_str(arg);
        }
        expr.push(')');
        expr
    }
}
