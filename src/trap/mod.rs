//! Trap Invoker
//!
//! The lowest layer of the runtime: stages a syscall number and six
//! argument words into a register image and fires the trap instruction.
//!
//! # Calling Convention
//! - aarch64: number in x8, arguments in x0-x5, `svc #0`, result in x0
//! - x86_64: number in rax, arguments in rdi, rsi, rdx, r10, r8, r9,
//!   `syscall`, result in rax
//!
//! # Security Considerations
//! - Only the native gates execute inline assembly
//! - The result word is returned verbatim, never interpreted here
//! - Argument validation belongs to the kernel, not to this layer

mod native;

pub use native::*;

/// Number of argument registers in the trap calling convention.
pub const ARG_REGS: usize = 6;

/// Register image loaded immediately before the trap fires.
///
/// Every slot is a plain machine word. Whether a word is an integer, a
/// boolean or a user address is decided by the typed facade, not here.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterImage {
    /// Syscall number register (x8 / rax)
    pub number: usize,
    /// Argument registers in calling-convention order
    pub args: [usize; ARG_REGS],
}

impl RegisterImage {
    /// Stage a syscall number and its six argument words.
    #[inline]
    pub const fn stage(number: usize, args: [usize; ARG_REGS]) -> Self {
        Self { number, args }
    }
}

/// A mechanism that can fire a staged register image at the kernel.
///
/// User programs use [`NativeGate`]. Tests substitute a recording or
/// stub-kernel gate to observe exactly what would reach the registers.
pub trait TrapGate {
    /// Load `regs` into the trap registers, trap, and return the result
    /// register.
    ///
    /// # Safety
    /// Argument words may be addresses the kernel reads from or writes to.
    /// The caller must ensure every address word refers to memory that is
    /// valid for the access the syscall performs, for the whole call.
    unsafe fn fire(&self, regs: &RegisterImage) -> usize;
}

impl<G: TrapGate + ?Sized> TrapGate for &G {
    #[inline]
    unsafe fn fire(&self, regs: &RegisterImage) -> usize {
        // SAFETY: forwarded contract
        unsafe { (**self).fire(regs) }
    }
}

/// Invoke syscall `number` with exactly six argument words.
///
/// Callers needing fewer arguments pass zero for the rest.
///
/// # Safety
/// See [`TrapGate::fire`].
#[inline]
pub unsafe fn invoke<G: TrapGate>(gate: &G, number: usize, args: [usize; ARG_REGS]) -> usize {
    let regs = RegisterImage::stage(number, args);
    // SAFETY: caller upholds the address contract for `args`
    unsafe { gate.fire(&regs) }
}
