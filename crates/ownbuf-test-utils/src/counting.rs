//! Per-thread allocation counting.
//!
//! Counters are thread-local so that parallel test threads do not see each
//! other's allocations. Counting only happens inside [`track`], and
//! refusal only inside [`track_refusing`].

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

/// Allocation counts observed during one [`track`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocationStats {
    /// Number of blocks handed out (including the new side of a realloc).
    pub allocations: usize,
    /// Number of blocks returned (including the old side of a realloc).
    pub deallocations: usize,
    /// Total bytes handed out.
    pub bytes_allocated: usize,
    /// Total bytes returned.
    pub bytes_released: usize,
}

impl AllocationStats {
    const ZERO: Self = Self {
        allocations: 0,
        deallocations: 0,
        bytes_allocated: 0,
        bytes_released: 0,
    };

    /// Every block handed out was returned, byte for byte.
    pub fn is_balanced(&self) -> bool {
        self.allocations == self.deallocations && self.bytes_allocated == self.bytes_released
    }
}

thread_local! {
    static ARMED: Cell<bool> = const { Cell::new(false) };
    static STATS: Cell<AllocationStats> = const { Cell::new(AllocationStats::ZERO) };
    static REFUSE_FROM: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Whether a request of `size` bytes should be answered with null.
fn refuses(size: usize) -> bool {
    let armed = ARMED.try_with(Cell::get).unwrap_or(false);
    armed
        && REFUSE_FROM
            .try_with(Cell::get)
            .ok()
            .flatten()
            .is_some_and(|min| size >= min)
}

fn record(update: impl FnOnce(&mut AllocationStats)) {
    // `try_with` because the allocator can run during thread teardown.
    let armed = ARMED.try_with(Cell::get).unwrap_or(false);
    if !armed {
        return;
    }
    let _ = STATS.try_with(|cell| {
        let mut stats = cell.get();
        update(&mut stats);
        cell.set(stats);
    });
}

/// Global allocator that forwards to [`System`] and counts traffic on
/// threads currently inside [`track`].
///
/// Inside [`track_refusing`] it also returns null for large requests, so
/// allocation-failure paths can be exercised. Refused requests are not
/// counted.
pub struct CountingAllocator;

#[allow(unsafe_code)]
// SAFETY: every method either forwards to `System` with the caller's
// arguments unchanged or returns null, which `GlobalAlloc` permits (a null
// `realloc` leaves the old block untouched). Counting touches only `Cell`s
// with const initialisers, which never allocate.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if refuses(layout.size()) {
            return std::ptr::null_mut();
        }
        // SAFETY: forwarded contract.
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            record(|s| {
                s.allocations += 1;
                s.bytes_allocated += layout.size();
            });
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if refuses(layout.size()) {
            return std::ptr::null_mut();
        }
        // SAFETY: forwarded contract.
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record(|s| {
                s.allocations += 1;
                s.bytes_allocated += layout.size();
            });
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        record(|s| {
            s.deallocations += 1;
            s.bytes_released += layout.size();
        });
        // SAFETY: forwarded contract.
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if refuses(new_size) {
            return std::ptr::null_mut();
        }
        // SAFETY: forwarded contract.
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            record(|s| {
                s.deallocations += 1;
                s.bytes_released += layout.size();
                s.allocations += 1;
                s.bytes_allocated += new_size;
            });
        }
        new_ptr
    }
}

/// Disarms counting when dropped, so a panicking closure cannot leave the
/// thread armed.
struct ArmGuard;

impl ArmGuard {
    fn arm() -> Self {
        STATS.with(|cell| cell.set(AllocationStats::ZERO));
        ARMED.with(|cell| cell.set(true));
        ArmGuard
    }
}

impl Drop for ArmGuard {
    fn drop(&mut self) {
        ARMED.with(|cell| cell.set(false));
    }
}

/// Run `f` and report the allocations it made on this thread.
///
/// Values returned from `f` are dropped after counting stops, so return
/// `()` (or a `Copy` value) when checking balance. Counts are only
/// meaningful when [`CountingAllocator`] is the global allocator; without
/// it every field stays zero.
pub fn track<R>(f: impl FnOnce() -> R) -> (R, AllocationStats) {
    let guard = ArmGuard::arm();
    let result = f();
    drop(guard);
    let stats = STATS.with(Cell::get);
    (result, stats)
}

/// Clears the refusal threshold when dropped.
struct RefuseGuard;

impl RefuseGuard {
    fn set(min_bytes: usize) -> Self {
        REFUSE_FROM.with(|cell| cell.set(Some(min_bytes)));
        RefuseGuard
    }
}

impl Drop for RefuseGuard {
    fn drop(&mut self) {
        REFUSE_FROM.with(|cell| cell.set(None));
    }
}

/// Like [`track`], but every request of at least `min_bytes` made by `f`
/// on this thread fails as if the system were out of memory.
///
/// Requires [`CountingAllocator`] as the global allocator; without it no
/// request is refused.
pub fn track_refusing<R>(min_bytes: usize, f: impl FnOnce() -> R) -> (R, AllocationStats) {
    let _refuse = RefuseGuard::set(min_bytes);
    track(f)
}
