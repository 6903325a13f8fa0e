//! System Call Numbers
//!
//! The numeric contract shared with the kernel's syscall dispatcher.
//! Any change to this table is a protocol-breaking change.

use bitflags::bitflags;
use core::fmt;

/// Kernel operations reachable through the trap gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum SyscallNumber {
    Halt = 0,
    Exit = 1,
    Fork = 2,
    Exec = 3,
    Wait = 4,
    Create = 5,
    Remove = 6,
    Open = 7,
    Filesize = 8,
    Read = 9,
    Write = 10,
    Seek = 11,
    Tell = 12,
    Close = 13,
    Mmap = 14,
    Munmap = 15,
    Chdir = 16,
    Mkdir = 17,
    Readdir = 18,
    Isdir = 19,
    Inumber = 20,
}

bitflags! {
    /// How a syscall treats its arguments and its caller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyscallFlags: u8 {
        /// Control never returns to the caller.
        const NORETURN = 1 << 0;
        /// Argument 0 is the address of a NUL-terminated string.
        const USER_STR = 1 << 1;
        /// The kernel reads a caller buffer.
        const USER_BUF_IN = 1 << 2;
        /// The kernel writes a caller buffer.
        const USER_BUF_OUT = 1 << 3;
    }
}

/// Error decoding a raw syscall number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberError(pub usize);

impl fmt::Display for NumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown syscall number {}", self.0)
    }
}

impl SyscallNumber {
    /// Every syscall, in numeric order.
    pub const ALL: [SyscallNumber; 21] = [
        Self::Halt,
        Self::Exit,
        Self::Fork,
        Self::Exec,
        Self::Wait,
        Self::Create,
        Self::Remove,
        Self::Open,
        Self::Filesize,
        Self::Read,
        Self::Write,
        Self::Seek,
        Self::Tell,
        Self::Close,
        Self::Mmap,
        Self::Munmap,
        Self::Chdir,
        Self::Mkdir,
        Self::Readdir,
        Self::Isdir,
        Self::Inumber,
    ];

    /// Raw number loaded into the syscall number register.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    /// Number of argument words the kernel reads for this call.
    pub const fn arity(self) -> usize {
        match self {
            Self::Halt => 0,
            Self::Exit
            | Self::Fork
            | Self::Exec
            | Self::Wait
            | Self::Remove
            | Self::Open
            | Self::Filesize
            | Self::Tell
            | Self::Close
            | Self::Munmap
            | Self::Chdir
            | Self::Mkdir
            | Self::Isdir
            | Self::Inumber => 1,
            Self::Create | Self::Seek | Self::Mmap | Self::Readdir => 2,
            Self::Read | Self::Write => 3,
        }
    }

    /// Argument and control-flow contract of this call.
    pub const fn flags(self) -> SyscallFlags {
        match self {
            Self::Halt | Self::Exit => SyscallFlags::NORETURN,
            Self::Fork
            | Self::Exec
            | Self::Create
            | Self::Remove
            | Self::Open
            | Self::Chdir
            | Self::Mkdir => SyscallFlags::USER_STR,
            Self::Write => SyscallFlags::USER_BUF_IN,
            Self::Read | Self::Readdir => SyscallFlags::USER_BUF_OUT,
            _ => SyscallFlags::empty(),
        }
    }

    /// Lowercase name as used in kernel logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Halt => "halt",
            Self::Exit => "exit",
            Self::Fork => "fork",
            Self::Exec => "exec",
            Self::Wait => "wait",
            Self::Create => "create",
            Self::Remove => "remove",
            Self::Open => "open",
            Self::Filesize => "filesize",
            Self::Read => "read",
            Self::Write => "write",
            Self::Seek => "seek",
            Self::Tell => "tell",
            Self::Close => "close",
            Self::Mmap => "mmap",
            Self::Munmap => "munmap",
            Self::Chdir => "chdir",
            Self::Mkdir => "mkdir",
            Self::Readdir => "readdir",
            Self::Isdir => "isdir",
            Self::Inumber => "inumber",
        }
    }
}

impl TryFrom<usize> for SyscallNumber {
    type Error = NumberError;

    fn try_from(raw: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(raw).copied().ok_or(NumberError(raw))
    }
}

impl From<SyscallNumber> for usize {
    fn from(nr: SyscallNumber) -> usize {
        nr.as_usize()
    }
}

impl fmt::Display for SyscallNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
