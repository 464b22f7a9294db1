//! Scatter kernel (spec §4.4, component C4) and the sign/float fix-up it
//! folds in via the bucket-order permutation built by [`crate::key`]
//! (spec §4.5, component C5).
//!
//! The kernel is deliberately payload-agnostic (`T: Copy`): direct sorts
//! scatter the key itself, indirect sorts (§4.6) scatter a reference while
//! reading digits from a separately materialized key cache. Both pass
//! through the same loop, which is the "single dispatch table... to avoid
//! per-element branches" design note in spec §9.

use crate::direction::Fill;
use crate::histogram::Histogram;
use crate::plan::{BufferId, Plan};
use std::mem::size_of;

/// Builds the prefix table `P` for one pass from its histogram counts and
/// bucket enumeration order (spec §3 "Prefix table").
///
/// `offsets[bucket_order[k]]` receives the number of elements that sort
/// strictly before any element in that bucket, i.e. exactly the running
/// total of counts for every earlier-enumerated bucket.
fn prefix_table(counts: &[u64; 256], bucket_order: &[u8; 256]) -> [u64; 256] {
    let mut offsets = [0u64; 256];
    let mut running = 0u64;
    for &b in bucket_order {
        offsets[b as usize] = running;
        running += counts[b as usize];
    }
    offsets
}

/// Runs one digit pass: reads `src` sequentially, writes each element into
/// its bucket's next slot in `dst`.
///
/// `digit_of(i)` returns the digit byte pass consumes for `src[i]` — for a
/// direct sort this is `src[i].digit_byte(pass)`; for an indirect sort it
/// is a lookup into the materialized key cache (spec §4.6).
///
/// `src` is always scanned forward; only `fill` (forward vs. reverse
/// placement) varies, and only the final pass of a sort call ever asks
/// for `Fill::Reverse` (see [`crate::direction`] module docs). `bucket_reverse`
/// is all-`false` on every pass except a float sign pass, where the buckets
/// it marks get their internal element order reversed instead of preserved
/// (spec §4.5). Combined with an all-`false` mask, this keeps every
/// non-sign pass a stable counting sort, which multi-pass LSD correctness
/// depends on.
pub(crate) fn scatter<T: Copy>(
    src: &[T],
    dst: &mut [T],
    digit_of: impl Fn(usize) -> u8,
    counts: &[u64; 256],
    bucket_order: &[u8; 256],
    bucket_reverse: &[bool; 256],
    fill: Fill,
) {
    debug_assert_eq!(src.len(), dst.len());
    let n = src.len();
    let starts = prefix_table(counts, bucket_order);
    debug_assert_eq!(counts.iter().sum::<u64>(), n as u64, "histogram closure violated (P3)");

    // `cursor[d]` walks forward from `starts[d]` for a plain bucket, or
    // backward from its last reserved slot for a bucket whose internal
    // order spec §4.5 requires reversed (the float sign pass's negative
    // half). Signed so an empty reversed bucket's one-past-the-start
    // underflow (`starts[d] - 1`) never panics; it is never read back.
    let mut cursor = [0i64; 256];
    for d in 0..256 {
        cursor[d] = if bucket_reverse[d] {
            starts[d] as i64 + counts[d] as i64 - 1
        } else {
            starts[d] as i64
        };
    }

    let streaming = should_stream::<T>(n);

    for i in 0..n {
        let d = digit_of(i) as usize;
        let pos = cursor[d] as usize;
        if bucket_reverse[d] {
            cursor[d] -= 1;
        } else {
            cursor[d] += 1;
        }
        let final_pos = match fill {
            Fill::Forward => pos,
            Fill::Reverse => n - 1 - pos,
        };
        if streaming {
            // SAFETY: `final_pos < n == dst.len()`. `store_streaming`
            // dispatches on both `size_of::<T>()` and `align_of::<T>()`, so
            // a 16-byte, 8-aligned composite key (`Ldouble80`/`96`/`128`)
            // never takes the 16-byte-aligned `_mm_stream_si128` path — it
            // gets a pair of 8-byte non-temporal stores instead, each valid
            // at 8-byte alignment. Anything that fits neither aligned case
            // falls back to a plain store.
            unsafe { store_streaming(&mut dst[final_pos], src[i]) };
        } else {
            dst[final_pos] = src[i];
        }
    }

    if streaming {
        store_fence();
    }
}

/// Runs every step of `plan` over the `primary`/`scratch` pair, alternating
/// which one is read from and which is written to.
///
/// `digit_byte(element, pass)` extracts the digit a pass consumes from one
/// element of the buffer being scanned; for a direct sort `element` is the
/// key itself, for an indirect sort it's the current reference-array entry
/// (and the closure looks the actual key up in a materialized key cache).
///
/// The histogram that produced `plan` is read again here for each step's
/// counts: re-deriving per-pass counts from a `Histogram` is correct
/// because a digit pass only permutes elements, it never changes the
/// multiset of byte values at any position, so the pre-pass counts stay
/// valid across every subsequent pass (spec §4.2/§4.3).
///
/// Precondition: `primary.len() == scratch.len()`, and the plan was built
/// from a histogram over exactly these elements. Leaves the sorted result
/// in `primary` — [`crate::plan::build_plan`] always arranges for the last
/// surviving step to write there.
pub(crate) fn run_plan<T: Copy>(
    plan: &Plan,
    histogram: &Histogram,
    primary: &mut [T],
    scratch: &mut [T],
    digit_byte: impl Fn(&T, usize) -> u8,
) {
    debug_assert_eq!(primary.len(), scratch.len());
    let mut src_is_primary = true;

    for step in &plan.steps {
        let counts = histogram.counts(step.pass);
        if src_is_primary {
            scatter(
                primary,
                scratch,
                |i| digit_byte(&primary[i], step.pass),
                counts,
                &step.bucket_order,
                &step.bucket_reverse,
                step.fill,
            );
        } else {
            scatter(
                scratch,
                primary,
                |i| digit_byte(&scratch[i], step.pass),
                counts,
                &step.bucket_order,
                &step.bucket_reverse,
                step.fill,
            );
        }
        src_is_primary = !src_is_primary;
        debug_assert_eq!(
            src_is_primary,
            step.dest == BufferId::Primary,
            "plan destination and physical ping-pong parity diverged"
        );
    }
}

/// Runs `plan` to completion and, if its forced parity left the result in
/// `scratch`, copies it back into `primary` (spec §4.3 step 4). Callers that
/// built `plan` with `force_final_primary = false` never see
/// `needs_final_copy = true`, so this is a no-op extra branch for them —
/// the actual location is [`crate::plan::Plan::result`].
pub(crate) fn execute_plan<T: Copy>(
    plan: &Plan,
    histogram: &Histogram,
    primary: &mut [T],
    scratch: &mut [T],
    digit_byte: impl Fn(&T, usize) -> u8,
) {
    run_plan(plan, histogram, primary, scratch, digit_byte);
    if plan.needs_final_copy {
        primary.copy_from_slice(scratch);
    }
}

/// Threshold above which writes should bypass the cache (spec §4.4
/// performance contract: "≥ 2× last-level-cache size"). We don't query the
/// actual LLC size at runtime (no portable, dependency-free way to do so);
/// 8 MiB is a conservative stand-in for "twice a typical consumer LLC
/// share per core", matching the teacher's bias toward simple constants
/// over runtime topology probing.
const STREAMING_THRESHOLD_BYTES: usize = 8 * 1024 * 1024;

#[inline]
fn should_stream<T>(n: usize) -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        (matches!(size_of::<T>(), 8 | 16))
            && n.saturating_mul(size_of::<T>()) >= STREAMING_THRESHOLD_BYTES
            && std::is_x86_feature_detected!("sse2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = n;
        false
    }
}

/// Writes `value` to `*dst` using a non-temporal store when the platform,
/// size, and alignment of `T` allow it, falling back to a plain store
/// otherwise.
///
/// `_mm_stream_si128` faults on an address that isn't 16-byte aligned, so
/// a 16-byte type only takes that path when `align_of::<T>() >= 16`. The
/// composite float shapes (`Ldouble80`/`96`/`128`) are 16 bytes wide but
/// only naturally 8-aligned (a `u64` mantissa followed by a narrower
/// sign/exponent word); those get two `_mm_stream_si64` stores over the
/// low and high 8-byte halves instead, which only need 8-byte alignment.
///
/// # Safety
///
/// `dst` must be valid for a write of `size_of::<T>()` bytes.
#[inline]
unsafe fn store_streaming<T: Copy>(dst: &mut T, value: T) {
    #[cfg(target_arch = "x86_64")]
    {
        use std::arch::x86_64::{_mm_stream_si64, _mm_stream_si128, __m128i};
        let align = std::mem::align_of::<T>();
        match size_of::<T>() {
            8 if align >= 8 => unsafe {
                let bits = std::mem::transmute_copy::<T, i64>(&value);
                _mm_stream_si64(dst as *mut T as *mut i64, bits);
            },
            16 if align >= 16 => unsafe {
                let bits = std::mem::transmute_copy::<T, __m128i>(&value);
                _mm_stream_si128(dst as *mut T as *mut __m128i, bits);
            },
            16 if align >= 8 => unsafe {
                let halves = std::mem::transmute_copy::<T, [i64; 2]>(&value);
                let base = dst as *mut T as *mut i64;
                _mm_stream_si64(base, halves[0]);
                _mm_stream_si64(base.add(1), halves[1]);
            },
            _ => unsafe {
                std::ptr::write(dst, value);
            },
        }
        return;
    }
    #[cfg(not(target_arch = "x86_64"))]
    unsafe {
        std::ptr::write(dst, value);
    }
}

/// Store fence issued after any non-temporal scatter so the caller
/// observes finalized memory before the dispatcher returns (spec §5
/// "Memory ordering").
#[inline]
fn store_fence() {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        std::arch::x86_64::_mm_sfence();
    }
}
