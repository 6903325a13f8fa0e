//! Native trap gates
//!
//! Each register is its own asm operand, so the compiler emits the staging
//! moves and no argument can overwrite another that aliases it.
//!
//! Memory is not marked `nomem`: the kernel reads and writes
//! the buffers whose addresses are passed.

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
use core::arch::asm;

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
use super::{RegisterImage, TrapGate};

/// `svc #0` gate for AArch64 (EL0 → EL1).
#[cfg(target_arch = "aarch64")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Svc;

#[cfg(target_arch = "aarch64")]
impl TrapGate for Svc {
    #[inline(always)]
    unsafe fn fire(&self, regs: &RegisterImage) -> usize {
        let ret: usize;
        // SAFETY: SVC transfers to the kernel's lower-EL sync handler,
        // which saves and restores every register except x0.
        // Address validity is the caller's contract.
        unsafe {
            asm!(
                "svc #0",
                in("x8") regs.number,
                inlateout("x0") regs.args[0] => ret,
                in("x1") regs.args[1],
                in("x2") regs.args[2],
                in("x3") regs.args[3],
                in("x4") regs.args[4],
                in("x5") regs.args[5],
                options(nostack),
            );
        }
        ret
    }
}

/// `syscall` gate for x86_64 (ring 3 → ring 0).
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SyscallInsn;

#[cfg(target_arch = "x86_64")]
impl TrapGate for SyscallInsn {
    #[inline(always)]
    unsafe fn fire(&self, regs: &RegisterImage) -> usize {
        let ret: usize;
        // SAFETY: SYSCALL clobbers rcx (return rip) and r11 (rflags),
        // both declared below. Address validity is the caller's contract.
        unsafe {
            asm!(
                "syscall",
                inlateout("rax") regs.number => ret,
                in("rdi") regs.args[0],
                in("rsi") regs.args[1],
                in("rdx") regs.args[2],
                in("r10") regs.args[3],
                in("r8") regs.args[4],
                in("r9") regs.args[5],
                out("rcx") _,
                out("r11") _,
                options(nostack),
            );
        }
        ret
    }
}

/// Trap gate of the architecture being compiled for.
#[cfg(target_arch = "aarch64")]
pub type NativeGate = Svc;

/// Trap gate of the architecture being compiled for.
#[cfg(target_arch = "x86_64")]
pub type NativeGate = SyscallInsn;
