//! Handle and error types returned by the syscall facade.

use core::fmt;

/// Maximum length of a directory entry name, excluding the NUL.
pub const READDIR_MAX_LEN: usize = 14;

/// System call error
///
/// The kernel signals failure with a negative result word. The facade
/// decodes it here instead of handing out a sentinel-valued handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    /// The kernel returned a negative result word.
    Failed(isize),
}

impl SyscallError {
    /// Raw negative word returned by the kernel.
    #[inline]
    pub const fn code(self) -> isize {
        match self {
            Self::Failed(code) => code,
        }
    }
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(code) => write!(f, "syscall failed ({})", code),
        }
    }
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw kernel handle.
            #[inline]
            pub const fn from_raw(raw: i32) -> Self {
                Self(raw)
            }

            /// Get the raw handle value.
            #[inline]
            pub const fn raw(self) -> i32 {
                self.0
            }

            /// Encode as an argument word (sign-extended).
            #[inline]
            pub(crate) const fn word(self) -> usize {
                self.0 as isize as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

handle!(
    /// Process identifier.
    Pid
);

handle!(
    /// Open file descriptor.
    Fd
);

handle!(
    /// Memory mapping identifier returned by `mmap`.
    MapId
);

impl Fd {
    /// Console input.
    pub const STDIN: Self = Self(0);
    /// Console output.
    pub const STDOUT: Self = Self(1);
}

/// Interpret a result word as a signed kernel return value.
#[inline]
pub(crate) const fn signed(word: usize) -> isize {
    word as isize
}

/// Decode a non-negative byte count, or the kernel's negative sentinel.
#[inline]
pub(crate) fn count(word: usize) -> Result<usize, SyscallError> {
    handle(word).map(|n| n as usize)
}

/// Decode a handle returned in the low 32 bits of the result word.
///
/// The kernel returns 32-bit signed values, so only the low half is meaningful
/// once the sign has been checked on the full word.
#[inline]
pub(crate) fn handle(word: usize) -> Result<i32, SyscallError> {
    let n = signed(word);
    if n < 0 || (word as i32) < 0 {
        return Err(SyscallError::Failed(n.min(-1)));
    }
    Ok(word as i32)
}

/// Nonzero result words are true.
#[inline]
pub(crate) const fn truth(word: usize) -> bool {
    word != 0
}
