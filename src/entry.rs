//! User program entry
//!
//! The kernel starts a user program at `_start(argc, argv)` with the
//! argument vector already laid out on the user stack. [`entry_point!`]
//! generates that symbol; it runs `main` and exits with its status.

use core::ffi::{c_char, CStr};

/// Borrowed view of the program's argument vector.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    argv: &'a [*const c_char],
}

impl<'a> Args<'a> {
    /// An empty argument vector.
    pub const fn empty() -> Self {
        Self { argv: &[] }
    }

    /// Wrap the `argc`/`argv` pair handed to `_start`.
    ///
    /// # Safety
    /// `argv` must point to `argc` pointers, each to a NUL-terminated
    /// string, all valid and unmodified for `'a`. A null `argv` is only
    /// allowed with `argc == 0`.
    pub unsafe fn from_raw(argc: usize, argv: *const *const c_char) -> Self {
        if argc == 0 || argv.is_null() {
            return Self::empty();
        }
        // SAFETY: caller guarantees `argc` readable pointers at `argv`
        let argv = unsafe { core::slice::from_raw_parts(argv, argc) };
        Self { argv }
    }

    /// Number of arguments, including the program name.
    pub fn len(&self) -> usize {
        self.argv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }

    /// Argument `index`, or `None` if out of range or null.
    pub fn get(&self, index: usize) -> Option<&'a CStr> {
        let ptr = *self.argv.get(index)?;
        if ptr.is_null() {
            return None;
        }
        // SAFETY: non-null entries are NUL-terminated strings valid for 'a
        Some(unsafe { CStr::from_ptr(ptr) })
    }

    /// Program name (argument 0).
    pub fn program(&self) -> Option<&'a CStr> {
        self.get(0)
    }

    /// Iterate over all non-null arguments.
    pub fn iter(&self) -> impl Iterator<Item = &'a CStr> + 'a {
        let args = *self;
        (0..args.len()).filter_map(move |i| args.get(i))
    }
}

/// Run `main` with the argument vector and exit with its status.
///
/// # Safety
/// Same contract as [`Args::from_raw`], for the rest of the program.
#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
pub unsafe fn start(
    argc: usize,
    argv: *const *const c_char,
    main: fn(Args<'static>) -> i32,
) -> ! {
    // SAFETY: forwarded contract; the kernel-built argv lives until exit
    let args = unsafe { Args::from_raw(argc, argv) };
    let status = main(args);
    crate::syscall::sys::exit(status)
}

/// Define the program's `_start` symbol around `main`.
///
/// ```ignore
/// fn main(args: Args<'static>) -> i32 { 0 }
/// panther_ulib::entry_point!(main);
/// ```
#[macro_export]
macro_rules! entry_point {
    ($main:path) => {
        #[no_mangle]
        pub unsafe extern "C" fn _start(
            argc: usize,
            argv: *const *const ::core::ffi::c_char,
        ) -> ! {
            let main: fn($crate::entry::Args<'static>) -> i32 = $main;
            // SAFETY: called once by the kernel with its argument vector
            unsafe { $crate::entry::start(argc, argv, main) }
        }
    };
}
