//! Calling-convention register names for Objective-C method entry.
//!
//! For method calls:
//! - ARM64: x0=self, x1=_cmd, x2-x7=args
//! - x86_64: rdi=self, rsi=_cmd, rdx, rcx, r8, r9=args

use log::warn;

/// Register assignments for receiver, selector, and arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgRegisters {
    /// Convention name, for messages
    pub arch: &'static str,
    /// Register holding the receiver (`self`)
    pub self_reg: &'static str,
    /// Register holding the selector (`_cmd`)
    pub cmd_reg: &'static str,
    /// Registers carrying the declared arguments, in order
    pub arg_regs: &'static [&'static str],
}

/// 64-bit ARM convention
pub const ARM64: ArgRegisters = ArgRegisters {
    arch: "arm64",
    self_reg: "x0",
    cmd_reg: "x1",
    arg_regs: &["x2", "x3", "x4", "x5", "x6", "x7"],
};

/// x86-64 System V convention
pub const X86_64: ArgRegisters = ArgRegisters {
    arch: "x86_64",
    self_reg: "rdi",
    cmd_reg: "rsi",
    arg_regs: &["rdx", "rcx", "r8", "r9"],
};

impl ArgRegisters {
    /// Select the convention for a target triple.
    ///
    /// Triples that are neither ARM64 nor x86-64 fall back to the x86-64
    /// convention; the fallback is logged so the assumption is visible.
    pub fn for_triple(triple: &str) -> Self {
        if triple.contains("arm64") || triple.contains("aarch64") {
            ARM64
        } else {
            if !triple.contains("x86_64") {
                warn!(
                    "unrecognized architecture triple '{}', assuming x86_64 registers",
                    triple
                );
            }
            X86_64
        }
    }

    /// How many arguments the convention passes in registers
    pub fn max_args(&self) -> usize {
        self.arg_regs.len()
    }
}
