//! PantherOS user-space runtime
//!
//! What a user program links against to talk to the kernel.
//!
//! # Layers
//! - [`trap`]: stages a syscall number and six words into registers and traps
//! - [`syscall`]: one typed operation per kernel syscall
//! - [`io`]: buffered console, `uprint!`/`uprintln!`, `log` backend
//! - [`entry`]: `_start` glue that runs `main` and exits with its status
//! - [`fixed`]: 17.14 fixed-point arithmetic
//!
//! # Security Features
//! - Inline assembly is confined to the native trap gates
//! - Buffers cross the boundary as borrowed slices, never as raw lengths
//! - Syscalls that cannot return are typed `-> !`
//!
//! # Architecture
//! - AArch64: `svc #0`, number in x8, arguments in x0-x5
//! - x86_64: `syscall`, number in rax, arguments in rdi, rsi, rdx, r10, r8, r9

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod entry;
pub mod fixed;
pub mod io;
pub mod syscall;
pub mod trap;

pub use fixed::Fixed;
pub use syscall::{Fd, MapId, Pid, SyscallError, SyscallNumber, Syscalls};
pub use trap::{RegisterImage, TrapGate};

/// Runtime version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
