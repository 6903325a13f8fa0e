//! Syscalls over the native trap gate.
//!
//! These are what user programs call. Each is a thin forward to
//! [`Syscalls`] with [`NativeGate`].

use core::ffi::CStr;

use super::{Fd, MapId, Pid, SyscallError, Syscalls, READDIR_MAX_LEN};
use crate::trap::NativeGate;

/// Facade over the trap instruction of this architecture.
pub const KERNEL: Syscalls<NativeGate> = Syscalls::new(NativeGate {});

/// Power off the machine.
pub fn halt() -> ! {
    crate::io::console::flush();
    KERNEL.halt()
}

/// Terminate the current process with `status`.
///
/// Buffered console output is flushed first.
pub fn exit(status: i32) -> ! {
    crate::io::console::flush();
    KERNEL.exit(status)
}

/// Clone the current process; the child is named `name`.
pub fn fork(name: &CStr) -> Result<Pid, SyscallError> {
    crate::io::console::flush();
    KERNEL.fork(name)
}

/// Replace the current process image with `file`.
pub fn exec(file: &CStr) -> Result<Pid, SyscallError> {
    crate::io::console::flush();
    KERNEL.exec(file)
}

/// Wait for child `pid` and return its exit status.
pub fn wait(pid: Pid) -> i32 {
    KERNEL.wait(pid)
}

/// Create `file` with `initial_size` bytes.
pub fn create(file: &CStr, initial_size: u32) -> bool {
    KERNEL.create(file, initial_size)
}

/// Delete `file`.
pub fn remove(file: &CStr) -> bool {
    KERNEL.remove(file)
}

/// Open `file` and return a new descriptor.
pub fn open(file: &CStr) -> Result<Fd, SyscallError> {
    KERNEL.open(file)
}

/// Size in bytes of the file open as `fd`.
pub fn filesize(fd: Fd) -> Result<usize, SyscallError> {
    KERNEL.filesize(fd)
}

/// Read up to `buf.len()` bytes from `fd` into `buf`.
pub fn read(fd: Fd, buf: &mut [u8]) -> Result<usize, SyscallError> {
    KERNEL.read(fd, buf)
}

/// Write `buf` to `fd`.
pub fn write(fd: Fd, buf: &[u8]) -> Result<usize, SyscallError> {
    KERNEL.write(fd, buf)
}

/// Move the file position of `fd` to `position`.
pub fn seek(fd: Fd, position: u32) {
    KERNEL.seek(fd, position)
}

/// Current file position of `fd`.
pub fn tell(fd: Fd) -> u32 {
    KERNEL.tell(fd)
}

/// Close `fd`.
pub fn close(fd: Fd) {
    KERNEL.close(fd)
}

/// Map the file open as `fd` at the page-aligned address `addr`.
pub fn mmap(fd: Fd, addr: *mut u8) -> Result<MapId, SyscallError> {
    KERNEL.mmap(fd, addr)
}

/// Remove mapping `mapid`.
pub fn munmap(mapid: MapId) {
    KERNEL.munmap(mapid)
}

/// Change the working directory to `dir`.
pub fn chdir(dir: &CStr) -> bool {
    KERNEL.chdir(dir)
}

/// Create directory `dir`.
pub fn mkdir(dir: &CStr) -> bool {
    KERNEL.mkdir(dir)
}

/// Read the next entry of directory `fd` into `name`.
pub fn readdir(fd: Fd, name: &mut [u8; READDIR_MAX_LEN + 1]) -> bool {
    KERNEL.readdir(fd, name)
}

/// Whether `fd` refers to a directory.
pub fn isdir(fd: Fd) -> bool {
    KERNEL.isdir(fd)
}

/// Inode number of the file or directory open as `fd`.
pub fn inumber(fd: Fd) -> Result<u32, SyscallError> {
    KERNEL.inumber(fd)
}
