//! Typed Syscall Facade
//!
//! One method per kernel syscall. Each method turns its typed arguments
//! into argument words, fires the trap through the gate, and decodes the
//! result word into the operation's return type.
//!
//! # Conventions
//! - Buffers and strings are passed by address; the caller keeps ownership
//! - Boolean results: any nonzero word is `true`
//! - Handle and count results: a negative word is `Err(SyscallError)`
//! - `halt` and `exit` return `!`; a trap that comes back is fatal

use core::ffi::CStr;

use super::number::{SyscallFlags, SyscallNumber};
use super::types::{self, Fd, MapId, Pid, SyscallError, READDIR_MAX_LEN};
use crate::trap::{self, TrapGate, ARG_REGS};

/// Typed syscall interface over a trap gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Syscalls<G: TrapGate> {
    gate: G,
}

impl<G: TrapGate> Syscalls<G> {
    /// Create a facade firing through `gate`.
    pub const fn new(gate: G) -> Self {
        Self { gate }
    }

    /// The underlying trap gate.
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Fire `nr` with exactly its arity of argument words.
    ///
    /// # Safety
    /// Address words in `args` must be valid for the access `nr` performs.
    unsafe fn call(&self, nr: SyscallNumber, args: &[usize]) -> usize {
        debug_assert_eq!(args.len(), nr.arity(), "{}: wrong argument count", nr);

        let mut words = [0usize; ARG_REGS];
        words[..args.len()].copy_from_slice(args);

        // SAFETY: forwarded contract
        unsafe { trap::invoke(&self.gate, nr.as_usize(), words) }
    }

    /// Fire a call that must not return.
    fn call_noreturn(&self, nr: SyscallNumber, args: &[usize]) -> ! {
        debug_assert!(nr.flags().contains(SyscallFlags::NORETURN));

        // SAFETY: halt and exit take no addresses
        let ret = unsafe { self.call(nr, args) };
        unreachable!("{} returned {:#x} from the kernel", nr, ret);
    }

    // ------------------------------------------------------------------
    // Process control
    // ------------------------------------------------------------------

    /// Power off the machine.
    pub fn halt(&self) -> ! {
        log::info!("[PROCESS] halt");
        self.call_noreturn(SyscallNumber::Halt, &[])
    }

    /// Terminate the current process with `status`.
    pub fn exit(&self, status: i32) -> ! {
        log::debug!("[PROCESS] exit({})", status);
        self.call_noreturn(SyscallNumber::Exit, &[status as isize as usize])
    }

    /// Clone the current process. The child is named `name`.
    ///
    /// Returns the child's pid in the parent and 0 in the child.
    pub fn fork(&self, name: &CStr) -> Result<Pid, SyscallError> {
        // SAFETY: `name` is NUL-terminated and outlives the call
        let word = unsafe { self.call(SyscallNumber::Fork, &[name.as_ptr() as usize]) };
        types::handle(word).map(Pid::from_raw).inspect_err(|e| {
            log::debug!("[PROCESS] fork({:?}): {}", name, e);
        })
    }

    /// Replace the current process image with `file`.
    ///
    /// Only returns on failure in practice; a successful exec does not
    /// come back to this image.
    pub fn exec(&self, file: &CStr) -> Result<Pid, SyscallError> {
        // SAFETY: `file` is NUL-terminated and outlives the call
        let word = unsafe { self.call(SyscallNumber::Exec, &[file.as_ptr() as usize]) };
        types::handle(word).map(Pid::from_raw).inspect_err(|e| {
            log::debug!("[PROCESS] exec({:?}): {}", file, e);
        })
    }

    /// Wait for child `pid` and return its exit status.
    ///
    /// The kernel reports -1 for a child that was killed or is not a
    /// direct child of the caller.
    pub fn wait(&self, pid: Pid) -> i32 {
        // SAFETY: no addresses
        let word = unsafe { self.call(SyscallNumber::Wait, &[pid.word()]) };
        word as i32
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Create `file` with `initial_size` bytes.
    pub fn create(&self, file: &CStr, initial_size: u32) -> bool {
        // SAFETY: `file` is NUL-terminated and outlives the call
        let word = unsafe {
            self.call(
                SyscallNumber::Create,
                &[file.as_ptr() as usize, initial_size as usize],
            )
        };
        types::truth(word)
    }

    /// Delete `file`.
    pub fn remove(&self, file: &CStr) -> bool {
        // SAFETY: `file` is NUL-terminated and outlives the call
        let word = unsafe { self.call(SyscallNumber::Remove, &[file.as_ptr() as usize]) };
        types::truth(word)
    }

    /// Open `file` and return a new descriptor.
    pub fn open(&self, file: &CStr) -> Result<Fd, SyscallError> {
        // SAFETY: `file` is NUL-terminated and outlives the call
        let word = unsafe { self.call(SyscallNumber::Open, &[file.as_ptr() as usize]) };
        types::handle(word).map(Fd::from_raw)
    }

    /// Size in bytes of the file open as `fd`.
    pub fn filesize(&self, fd: Fd) -> Result<usize, SyscallError> {
        // SAFETY: no addresses
        let word = unsafe { self.call(SyscallNumber::Filesize, &[fd.word()]) };
        types::count(word)
    }

    /// Read up to `buf.len()` bytes from `fd` into `buf`.
    pub fn read(&self, fd: Fd, buf: &mut [u8]) -> Result<usize, SyscallError> {
        // SAFETY: `buf` is writable for `buf.len()` bytes for the whole call
        let word = unsafe {
            self.call(
                SyscallNumber::Read,
                &[fd.word(), buf.as_mut_ptr() as usize, buf.len()],
            )
        };
        types::count(word)
    }

    /// Write `buf` to `fd`. A zero-length write still traps.
    pub fn write(&self, fd: Fd, buf: &[u8]) -> Result<usize, SyscallError> {
        // SAFETY: `buf` is readable for `buf.len()` bytes for the whole call
        let word = unsafe {
            self.call(
                SyscallNumber::Write,
                &[fd.word(), buf.as_ptr() as usize, buf.len()],
            )
        };
        types::count(word)
    }

    /// Move the file position of `fd` to `position`.
    pub fn seek(&self, fd: Fd, position: u32) {
        // SAFETY: no addresses
        unsafe { self.call(SyscallNumber::Seek, &[fd.word(), position as usize]) };
    }

    /// Current file position of `fd`.
    pub fn tell(&self, fd: Fd) -> u32 {
        // SAFETY: no addresses
        let word = unsafe { self.call(SyscallNumber::Tell, &[fd.word()]) };
        word as u32
    }

    /// Close `fd`. Later use of `fd` fails in the kernel.
    pub fn close(&self, fd: Fd) {
        // SAFETY: no addresses
        unsafe { self.call(SyscallNumber::Close, &[fd.word()]) };
    }

    // ------------------------------------------------------------------
    // Memory mapping
    // ------------------------------------------------------------------

    /// Map the file open as `fd` at the page-aligned user address `addr`.
    ///
    /// The kernel rejects unaligned, null or already-mapped addresses.
    pub fn mmap(&self, fd: Fd, addr: *mut u8) -> Result<MapId, SyscallError> {
        // SAFETY: the kernel only installs new pages at `addr` and refuses
        // ranges that overlap existing mappings
        let word = unsafe { self.call(SyscallNumber::Mmap, &[fd.word(), addr as usize]) };
        types::handle(word).map(MapId::from_raw).inspect_err(|e| {
            log::debug!("[MM] mmap({}, {:p}): {}", fd, addr, e);
        })
    }

    /// Remove mapping `mapid`, writing back dirty pages.
    pub fn munmap(&self, mapid: MapId) {
        // SAFETY: no addresses
        unsafe { self.call(SyscallNumber::Munmap, &[mapid.word()]) };
    }

    // ------------------------------------------------------------------
    // Directories
    // ------------------------------------------------------------------

    /// Change the working directory to `dir`.
    pub fn chdir(&self, dir: &CStr) -> bool {
        // SAFETY: `dir` is NUL-terminated and outlives the call
        let word = unsafe { self.call(SyscallNumber::Chdir, &[dir.as_ptr() as usize]) };
        types::truth(word)
    }

    /// Create directory `dir`.
    pub fn mkdir(&self, dir: &CStr) -> bool {
        // SAFETY: `dir` is NUL-terminated and outlives the call
        let word = unsafe { self.call(SyscallNumber::Mkdir, &[dir.as_ptr() as usize]) };
        types::truth(word)
    }

    /// Read the next entry of directory `fd` into `name` as a
    /// NUL-terminated string. Returns `false` when no entries are left.
    pub fn readdir(&self, fd: Fd, name: &mut [u8; READDIR_MAX_LEN + 1]) -> bool {
        // SAFETY: `name` is writable for READDIR_MAX_LEN + 1 bytes
        let word = unsafe {
            self.call(
                SyscallNumber::Readdir,
                &[fd.word(), name.as_mut_ptr() as usize],
            )
        };
        types::truth(word)
    }

    /// Whether `fd` refers to a directory.
    pub fn isdir(&self, fd: Fd) -> bool {
        // SAFETY: no addresses
        let word = unsafe { self.call(SyscallNumber::Isdir, &[fd.word()]) };
        types::truth(word)
    }

    /// Inode number of the file or directory open as `fd`.
    pub fn inumber(&self, fd: Fd) -> Result<u32, SyscallError> {
        // SAFETY: no addresses
        let word = unsafe { self.call(SyscallNumber::Inumber, &[fd.word()]) };
        types::handle(word).map(|n| n as u32)
    }
}
