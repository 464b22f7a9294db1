//! Buffer & large-page allocator (spec §4.7, component C7).
//!
//! `sort`/`sort_copy` need a scratch region the size of the input and
//! prefer to back it with huge pages so a ~1 GiB scatter doesn't thrash
//! the TLB. [`ScratchBuffer`] is a scoped RAII owner: every successful
//! [`ScratchBuffer::acquire`] has exactly one release, on every exit path
//! (normal drop, or the early-return failure paths in [`crate::dispatch`]
//! never call acquire a second time without releasing the first).

use crate::error::Error;
use std::alloc::{Layout, alloc, dealloc};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Minimum size Linux/Windows huge pages come in when nothing more
/// specific is known; used only as the `page_hint == 0` default.
const DEFAULT_LARGE_PAGE_SIZE: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backing {
    /// `libc::mmap`/`VirtualAlloc`, huge pages requested and granted.
    HugePages,
    /// `libc::mmap`/`VirtualAlloc`, normal pages (huge pages unavailable,
    /// unpermitted, or the `huge-pages` feature is off).
    NormalPagesMapped,
    /// Plain `std::alloc` heap allocation (non-unix/windows targets).
    Heap,
}

/// An owned, page-aligned scratch region of `len` elements of `T`.
pub(crate) struct ScratchBuffer<T> {
    ptr: NonNull<T>,
    len: usize,
    byte_len: usize,
    backing: Backing,
    _marker: PhantomData<T>,
}

impl<T> ScratchBuffer<T> {
    pub(crate) fn as_slice(&self) -> &[T] {
        if self.len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        if self.len == 0 {
            &mut []
        } else {
            unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
        }
    }

    /// Whether the region ended up backed by huge pages. Exposed for
    /// diagnostics/benchmarks only; never affects correctness.
    pub(crate) fn used_huge_pages(&self) -> bool {
        self.backing == Backing::HugePages
    }

    /// Acquires scratch for `len` elements of `T`, rounded up to
    /// `page_hint` (or a large-page default when `page_hint == 0`).
    ///
    /// Input validation (spec §4.8): `page_hint` must be `0` or a power of
    /// two at least as large as the system page size.
    pub(crate) fn acquire(len: usize, page_hint: usize) -> Result<Self, Error> {
        let elem_size = std::mem::size_of::<T>().max(1);
        let byte_len = len
            .checked_mul(elem_size)
            .ok_or(Error::InvalidArgument {
                reason: "N * sizeof(E) overflows usize",
            })?;

        if byte_len == 0 {
            return Ok(ScratchBuffer {
                ptr: NonNull::dangling(),
                len,
                byte_len: 0,
                backing: Backing::Heap,
                _marker: PhantomData,
            });
        }

        let page_size = if page_hint == 0 {
            DEFAULT_LARGE_PAGE_SIZE
        } else {
            page_hint
        };
        if page_size == 0 || (page_size & (page_size - 1)) != 0 {
            return Err(Error::InvalidArgument {
                reason: "page_hint must be a power of two",
            });
        }
        let rounded = round_up(byte_len, page_size);

        let (ptr, backing) = platform::acquire_region(rounded)?;
        log::debug!(
            "acquired {rounded} bytes of scratch ({backing:?}), requested {byte_len}"
        );

        Ok(ScratchBuffer {
            ptr: ptr.cast(),
            len,
            byte_len: rounded,
            backing,
            _marker: PhantomData,
        })
    }
}

impl<T> Drop for ScratchBuffer<T> {
    fn drop(&mut self) {
        if self.byte_len == 0 {
            return;
        }
        // SAFETY: `self.ptr`/`self.byte_len`/`self.backing` are exactly the
        // triple returned by the matching `platform::acquire_region` call;
        // every acquire path above has exactly one release path here.
        unsafe { platform::release_region(self.ptr.cast(), self.byte_len, self.backing) };
    }
}

fn round_up(bytes: usize, page_size: usize) -> usize {
    (bytes + page_size - 1) & !(page_size - 1)
}

#[cfg(all(unix, feature = "huge-pages"))]
mod platform {
    use super::{Backing, round_up};
    use crate::error::Error;
    use std::ptr::NonNull;

    pub(super) fn acquire_region(bytes: usize) -> Result<(NonNull<u8>, Backing), Error> {
        // Large pages on Linux are normally 2 MiB; rounding to that keeps
        // MAP_HUGETLB happy without querying /sys for the exact size.
        let huge_page_size = 2 * 1024 * 1024usize;
        let huge_bytes = round_up(bytes, huge_page_size);

        let huge = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                huge_bytes,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | libc::MAP_HUGETLB,
                -1,
                0,
            )
        };
        if huge != libc::MAP_FAILED {
            let ptr = NonNull::new(huge as *mut u8).expect("mmap returned null on success");
            return Ok((ptr, Backing::HugePages));
        }

        let normal = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                bytes,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if normal == libc::MAP_FAILED {
            return Err(Error::OutOfMemory {
                requested_bytes: bytes,
            });
        }
        log::debug!("huge pages unavailable, falling back to normal pages");
        let ptr = NonNull::new(normal as *mut u8).expect("mmap returned null on success");
        Ok((ptr, Backing::NormalPagesMapped))
    }

    /// # Safety
    /// `ptr`/`bytes` must be exactly the pointer and rounded size returned
    /// by a prior successful [`acquire_region`], and this must run at most
    /// once per acquisition.
    pub(super) unsafe fn release_region(ptr: NonNull<u8>, bytes: usize, backing: Backing) {
        debug_assert_ne!(backing, Backing::Heap);
        // MAP_HUGETLB rounds the mapping up to the huge page size, but
        // munmap only needs a byte count covering the original request;
        // the kernel tracks the real mapping length internally.
        let rc = unsafe { libc::munmap(ptr.as_ptr().cast(), bytes) };
        debug_assert_eq!(rc, 0, "munmap failed for a region we mapped ourselves");
    }
}

#[cfg(all(windows, feature = "huge-pages"))]
mod platform {
    use super::Backing;
    use crate::error::Error;
    use std::ptr::NonNull;
    use winapi::um::memoryapi::VirtualAlloc;
    use winapi::um::winnt::{MEM_COMMIT, MEM_LARGE_PAGES, MEM_RELEASE, MEM_RESERVE, PAGE_READWRITE};

    pub(super) fn acquire_region(bytes: usize) -> Result<(NonNull<u8>, Backing), Error> {
        let huge = unsafe {
            VirtualAlloc(
                std::ptr::null_mut(),
                bytes,
                MEM_LARGE_PAGES | MEM_RESERVE | MEM_COMMIT,
                PAGE_READWRITE,
            )
        };
        if !huge.is_null() {
            return Ok((NonNull::new(huge as *mut u8).unwrap(), Backing::HugePages));
        }

        let normal = unsafe {
            VirtualAlloc(
                std::ptr::null_mut(),
                bytes,
                MEM_RESERVE | MEM_COMMIT,
                PAGE_READWRITE,
            )
        };
        if normal.is_null() {
            return Err(Error::OutOfMemory {
                requested_bytes: bytes,
            });
        }
        log::debug!("huge pages unavailable, falling back to normal pages");
        Ok((
            NonNull::new(normal as *mut u8).unwrap(),
            Backing::NormalPagesMapped,
        ))
    }

    /// # Safety
    /// `ptr` must be exactly the pointer returned by a prior successful
    /// [`acquire_region`], released at most once.
    pub(super) unsafe fn release_region(ptr: NonNull<u8>, _bytes: usize, backing: Backing) {
        debug_assert_ne!(backing, Backing::Heap);
        let ok = unsafe { winapi::um::memoryapi::VirtualFree(ptr.as_ptr().cast(), 0, MEM_RELEASE) };
        debug_assert_ne!(ok, 0, "VirtualFree failed for a region we allocated ourselves");
    }
}

#[cfg(not(all(any(unix, windows), feature = "huge-pages")))]
mod platform {
    use super::{Backing, Layout, alloc};
    use crate::error::Error;
    use std::ptr::NonNull;

    pub(super) fn acquire_region(bytes: usize) -> Result<(NonNull<u8>, Backing), Error> {
        let layout =
            Layout::from_size_align(bytes, 64).map_err(|_| Error::InvalidArgument {
                reason: "scratch size overflows a valid layout",
            })?;
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr)
            .map(|p| (p, Backing::Heap))
            .ok_or(Error::OutOfMemory {
                requested_bytes: bytes,
            })
    }

    /// # Safety
    /// `ptr`/`bytes` must exactly match a prior successful
    /// [`acquire_region`] call, released at most once.
    pub(super) unsafe fn release_region(ptr: NonNull<u8>, bytes: usize, backing: Backing) {
        debug_assert_eq!(backing, Backing::Heap);
        let layout = Layout::from_size_align(bytes, 64).expect("layout was valid at acquire time");
        unsafe { dealloc(ptr.as_ptr(), layout) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_buffer_needs_no_release() {
        let buf = ScratchBuffer::<u64>::acquire(0, 0).unwrap();
        assert_eq!(buf.as_slice().len(), 0);
    }

    #[test]
    fn acquired_buffer_is_writable_and_right_length() {
        let mut buf = ScratchBuffer::<u64>::acquire(1024, 0).unwrap();
        let slice = buf.as_mut_slice();
        assert_eq!(slice.len(), 1024);
        slice[0] = 42;
        slice[1023] = 7;
        assert_eq!(buf.as_slice()[0], 42);
        assert_eq!(buf.as_slice()[1023], 7);
    }

    #[test]
    fn non_power_of_two_page_hint_is_rejected() {
        let err = ScratchBuffer::<u64>::acquire(16, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn overflowing_size_is_rejected() {
        let err = ScratchBuffer::<u128>::acquire(usize::MAX, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }
}
