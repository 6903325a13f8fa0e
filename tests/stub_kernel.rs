//! End-to-end tests of the syscall facade against an in-process stub kernel.
//!
//! The stub decodes the register image the same way the kernel's
//! dispatcher does and serves requests from an in-memory filesystem.
//! Addresses in argument words are host pointers, so the stub can read and
//! write caller buffers directly.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::fmt::Write as _;
use std::panic::{self, AssertUnwindSafe};

use panther_ulib::io::Console;
use panther_ulib::syscall::{SyscallFlags, READDIR_MAX_LEN};
use panther_ulib::{Fd, MapId, Pid, RegisterImage, SyscallError, SyscallNumber, Syscalls, TrapGate};

const FAIL: usize = -1isize as usize;

/// Panic payload standing in for process termination.
#[derive(Debug, PartialEq)]
enum Terminated {
    Halted,
    Exited(i32),
}

struct OpenFile {
    path: CString,
    pos: usize,
}

#[derive(Default)]
struct State {
    files: BTreeMap<CString, Vec<u8>>,
    dirs: Vec<CString>,
    fds: Vec<Option<OpenFile>>,
    stdout: Vec<u8>,
    maps: Vec<(i32, usize)>,
    trace: Vec<SyscallNumber>,
    next_pid: i32,
}

#[derive(Default)]
struct StubKernel {
    state: RefCell<State>,
}

impl StubKernel {
    fn new() -> Self {
        let kernel = Self::default();
        {
            let mut st = kernel.state.borrow_mut();
            st.fds.push(None); // stdin
            st.fds.push(None); // stdout
            st.next_pid = 2;
            st.dirs.push(CString::new("/").unwrap());
        }
        kernel
    }

    fn fd_index(st: &State, word: usize) -> Option<usize> {
        let fd = word as isize;
        if fd < 2 || fd as usize >= st.fds.len() || st.fds[fd as usize].is_none() {
            return None;
        }
        Some(fd as usize)
    }

    fn dispatch(&self, nr: SyscallNumber, a: [usize; 6]) -> usize {
        let path = if nr.flags().contains(SyscallFlags::USER_STR) {
            Some(unsafe { CStr::from_ptr(a[0] as *const _) }.to_owned())
        } else {
            None
        };

        let mut st = self.state.borrow_mut();
        st.trace.push(nr);

        match nr {
            SyscallNumber::Halt => {
                drop(st);
                panic::panic_any(Terminated::Halted)
            }
            SyscallNumber::Exit => {
                drop(st);
                panic::panic_any(Terminated::Exited(a[0] as i32))
            }
            SyscallNumber::Fork => {
                let pid = st.next_pid;
                st.next_pid += 1;
                pid as usize
            }
            SyscallNumber::Exec => FAIL,
            SyscallNumber::Wait => FAIL,
            SyscallNumber::Create => {
                let path = path.unwrap();
                if path.as_bytes().is_empty() || st.files.contains_key(&path) {
                    return 0;
                }
                st.files.insert(path, vec![0; a[1]]);
                1
            }
            SyscallNumber::Remove => st.files.remove(&path.unwrap()).is_some() as usize,
            SyscallNumber::Open => {
                let path = path.unwrap();
                if !st.files.contains_key(&path) {
                    return FAIL;
                }
                st.fds.push(Some(OpenFile { path, pos: 0 }));
                st.fds.len() - 1
            }
            SyscallNumber::Filesize => match Self::fd_index(&st, a[0]) {
                Some(i) => {
                    let path = &st.fds[i].as_ref().unwrap().path;
                    st.files[path].len()
                }
                None => FAIL,
            },
            SyscallNumber::Read => {
                let Some(i) = Self::fd_index(&st, a[0]) else {
                    return FAIL;
                };
                let st = &mut *st;
                let file = st.fds[i].as_mut().unwrap();
                let data = &st.files[&file.path];
                let n = a[2].min(data.len().saturating_sub(file.pos));
                let out = unsafe { std::slice::from_raw_parts_mut(a[1] as *mut u8, a[2]) };
                out[..n].copy_from_slice(&data[file.pos..file.pos + n]);
                file.pos += n;
                n
            }
            SyscallNumber::Write => {
                let bytes = unsafe { std::slice::from_raw_parts(a[1] as *const u8, a[2]) };
                if a[0] == 1 {
                    st.stdout.extend_from_slice(bytes);
                    return bytes.len();
                }
                let Some(i) = Self::fd_index(&st, a[0]) else {
                    return FAIL;
                };
                let st = &mut *st;
                let file = st.fds[i].as_mut().unwrap();
                let data = st.files.get_mut(&file.path).unwrap();
                // Files do not grow past their created size.
                let n = bytes.len().min(data.len().saturating_sub(file.pos));
                data[file.pos..file.pos + n].copy_from_slice(&bytes[..n]);
                file.pos += n;
                n
            }
            SyscallNumber::Seek => {
                if let Some(i) = Self::fd_index(&st, a[0]) {
                    st.fds[i].as_mut().unwrap().pos = a[1];
                }
                0
            }
            SyscallNumber::Tell => match Self::fd_index(&st, a[0]) {
                Some(i) => st.fds[i].as_ref().unwrap().pos,
                None => 0,
            },
            SyscallNumber::Close => {
                if let Some(i) = Self::fd_index(&st, a[0]) {
                    st.fds[i] = None;
                }
                0
            }
            SyscallNumber::Mmap => {
                if Self::fd_index(&st, a[0]).is_none() || a[1] == 0 || a[1] % 4096 != 0 {
                    return FAIL;
                }
                let id = st.maps.len() as i32;
                st.maps.push((id, a[1]));
                id as usize
            }
            SyscallNumber::Munmap => {
                st.maps.retain(|&(id, _)| id != a[0] as i32);
                0
            }
            SyscallNumber::Chdir => st.dirs.contains(&path.unwrap()) as usize,
            SyscallNumber::Mkdir => {
                let path = path.unwrap();
                if st.dirs.contains(&path) {
                    return 0;
                }
                st.dirs.push(path);
                1
            }
            SyscallNumber::Readdir => {
                let Some(i) = Self::fd_index(&st, a[0]) else {
                    return 0;
                };
                // Directory reads are modeled over the flat file table.
                let pos = st.fds[i].as_ref().unwrap().pos;
                let Some(name) = st.files.keys().nth(pos).cloned() else {
                    return 0;
                };
                let out = unsafe {
                    std::slice::from_raw_parts_mut(a[1] as *mut u8, READDIR_MAX_LEN + 1)
                };
                let bytes = name.as_bytes_with_nul();
                out[..bytes.len()].copy_from_slice(bytes);
                st.fds[i].as_mut().unwrap().pos += 1;
                1
            }
            SyscallNumber::Isdir => 0,
            SyscallNumber::Inumber => match Self::fd_index(&st, a[0]) {
                Some(i) => 100 + i,
                None => FAIL,
            },
        }
    }
}

impl TrapGate for StubKernel {
    unsafe fn fire(&self, regs: &RegisterImage) -> usize {
        match SyscallNumber::try_from(regs.number) {
            Ok(nr) => self.dispatch(nr, regs.args),
            Err(_) => FAIL,
        }
    }
}

fn terminated(f: impl FnOnce()) -> Terminated {
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).unwrap_err();
    *payload.downcast::<Terminated>().unwrap()
}

#[test]
fn test_create_open_write_seek_read() {
    let sys = Syscalls::new(StubKernel::new());

    assert!(sys.create(c"a.txt", 100));
    let fd = sys.open(c"a.txt").unwrap();
    assert!(fd.raw() >= 2);

    assert_eq!(sys.write(fd, b"hi"), Ok(2));
    assert_eq!(sys.tell(fd), 2);
    sys.seek(fd, 0);

    let mut buf = [0u8; 2];
    assert_eq!(sys.read(fd, &mut buf), Ok(2));
    assert_eq!(&buf, b"hi");
    assert_eq!(sys.filesize(fd), Ok(100));
}

#[test]
fn test_zero_length_write() {
    let sys = Syscalls::new(StubKernel::new());
    assert!(sys.create(c"z", 4));
    let fd = sys.open(c"z").unwrap();
    assert_eq!(sys.write(fd, &[]), Ok(0));
    assert_eq!(sys.tell(fd), 0);
}

#[test]
fn test_closed_descriptor_fails_in_kernel() {
    let sys = Syscalls::new(StubKernel::new());
    assert!(sys.create(c"f", 8));
    let fd = sys.open(c"f").unwrap();
    sys.close(fd);

    assert_eq!(sys.write(fd, b"x"), Err(SyscallError::Failed(-1)));
    assert!(sys.read(fd, &mut [0u8; 1]).is_err());
    assert!(sys.filesize(fd).is_err());
}

#[test]
fn test_missing_file() {
    let sys = Syscalls::new(StubKernel::new());
    assert_eq!(sys.open(c"nope"), Err(SyscallError::Failed(-1)));
    assert!(!sys.remove(c"nope"));
    assert!(sys.create(c"dup", 1));
    assert!(!sys.create(c"dup", 1));
    assert!(sys.remove(c"dup"));
}

#[test]
fn test_directories() {
    let sys = Syscalls::new(StubKernel::new());
    assert!(sys.mkdir(c"/d"));
    assert!(!sys.mkdir(c"/d"));
    assert!(sys.chdir(c"/d"));
    assert!(!sys.chdir(c"/missing"));

    assert!(sys.create(c"b", 0));
    assert!(sys.create(c"a", 0));
    let fd = sys.open(c"a").unwrap();
    assert!(!sys.isdir(fd));
    assert!(sys.inumber(fd).is_ok());

    let mut name = [0u8; READDIR_MAX_LEN + 1];
    let mut seen = Vec::new();
    while sys.readdir(fd, &mut name) {
        let entry = CStr::from_bytes_until_nul(&name).unwrap();
        seen.push(entry.to_owned());
    }
    assert_eq!(seen, [CString::new("a").unwrap(), CString::new("b").unwrap()]);
}

#[test]
fn test_mmap_and_munmap() {
    let sys = Syscalls::new(StubKernel::new());
    assert!(sys.create(c"m", 4096));
    let fd = sys.open(c"m").unwrap();

    assert!(sys.mmap(fd, core::ptr::null_mut()).is_err());
    assert!(sys.mmap(fd, 0x1234 as *mut u8).is_err());
    let id = sys.mmap(fd, 0x1000_0000 as *mut u8).unwrap();
    assert_eq!(id, MapId::from_raw(0));

    sys.munmap(id);
    assert!(sys.gate().state.borrow().maps.is_empty());
}

#[test]
fn test_process_control() {
    let sys = Syscalls::new(StubKernel::new());
    assert_eq!(sys.fork(c"child"), Ok(Pid::from_raw(2)));
    assert_eq!(sys.fork(c"child"), Ok(Pid::from_raw(3)));
    assert!(sys.exec(c"no-such-program").is_err());
    assert_eq!(sys.wait(Pid::from_raw(99)), -1);
}

#[test]
fn test_exit_terminates() {
    let sys = Syscalls::new(StubKernel::new());
    assert_eq!(terminated(|| sys.exit(7)), Terminated::Exited(7));
    assert_eq!(terminated(|| sys.exit(-1)), Terminated::Exited(-1));
    assert_eq!(terminated(|| sys.halt()), Terminated::Halted);
}

#[test]
fn test_console_over_stub() {
    let kernel = StubKernel::new();
    let mut console = Console::new(&kernel);

    write!(console, "load {}", panther_ulib::Fixed::from_ratio(3, 2)).unwrap();
    assert!(kernel.state.borrow().stdout.is_empty());
    writeln!(console).unwrap();

    assert_eq!(kernel.state.borrow().stdout, b"load 1.50\n");
    assert_eq!(kernel.state.borrow().trace, [SyscallNumber::Write]);
}

#[test]
fn test_stdout_write_uses_fd_one() {
    let sys = Syscalls::new(StubKernel::new());
    assert_eq!(sys.write(Fd::STDOUT, b"ok"), Ok(2));
    assert_eq!(sys.gate().state.borrow().stdout, b"ok");
}
