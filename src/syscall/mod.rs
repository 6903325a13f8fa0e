//! System Call Interface
//!
//! Typed user-space access to the kernel's syscalls.
//!
//! # Layers
//! - [`number`]: the syscall number table shared with the kernel
//! - [`Syscalls`]: typed facade over any [`TrapGate`](crate::trap::TrapGate)
//! - [`sys`]: free functions over the native gate for user programs
//!
//! # Current Syscalls
//! - Process: halt, exit, fork, exec, wait
//! - Files: create, remove, open, filesize, read, write, seek, tell, close
//! - Memory: mmap, munmap
//! - Directories: chdir, mkdir, readdir, isdir, inumber

mod facade;
pub mod number;
mod types;

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
pub mod sys;

pub use facade::Syscalls;
pub use number::{NumberError, SyscallFlags, SyscallNumber};
pub use types::{Fd, MapId, Pid, SyscallError, READDIR_MAX_LEN};
