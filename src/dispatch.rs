//! Public dispatcher (spec §4.8, component C8).
//!
//! Wires C1 (key model) → C2 (histogram) → C3 (plan) → C4/C5 (scatter with
//! fix-up, via [`crate::scatter::execute_plan`]) → C7 (scratch allocation)
//! into the four entry shapes spec.md §4.8 names, plus their indirect
//! counterparts.

use crate::alloc::ScratchBuffer;
use crate::direction::{Direction, Mode};
use crate::error::{Error, Result};
use crate::histogram::build_histograms;
use crate::key::RadixKey;
use crate::plan::{BufferId, build_plan};
use crate::projection::Projection;
use crate::indirect;
use crate::scatter::execute_plan;

/// Which buffer the sorted data ended up in. Only [`sort_no_alloc`] can
/// return [`ResultLocation::Scratch`] — every other entry point guarantees
/// its own designated output buffer, and returns `()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultLocation {
    /// The caller's `buf` (or `dst`, for copy variants) holds the result.
    Buf,
    /// The caller's `scratch` holds the result; `buf` is untouched from the
    /// last surviving pass's perspective (it may still hold intermediate
    /// garbage from earlier passes).
    Scratch,
}

fn validate_page_hint(page_hint: usize) -> Result<()> {
    if page_hint != 0 && (page_hint & (page_hint - 1)) != 0 {
        return Err(Error::InvalidArgument {
            reason: "page_hint must be 0 or a power of two",
        });
    }
    Ok(())
}

/// In-place sort (spec §4.8 entry 1): allocates scratch internally.
pub fn sort<K: RadixKey>(buf: &mut [K], direction: Direction, mode: Mode, page_hint: usize) -> Result<()> {
    validate_page_hint(page_hint)?;
    if buf.len() <= 1 {
        return Ok(());
    }

    let histogram = build_histograms(buf);
    let kind = mode.resolve(K::KIND);
    let plan = build_plan(&histogram, kind, direction, true);
    if plan.is_identity() {
        return Ok(());
    }

    let mut scratch = ScratchBuffer::<K>::acquire(buf.len(), page_hint)?;
    execute_plan(&plan, &histogram, buf, scratch.as_mut_slice(), |k, pass| {
        k.digit_byte(pass)
    });
    Ok(())
}

/// Out-of-place sort (spec §4.8 entry 2): allocates scratch internally.
pub fn sort_copy<K: RadixKey>(
    src: &[K],
    dst: &mut [K],
    direction: Direction,
    mode: Mode,
    page_hint: usize,
) -> Result<()> {
    validate_page_hint(page_hint)?;
    if src.len() != dst.len() {
        return Err(Error::InvalidArgument {
            reason: "sort_copy requires src.len() == dst.len()",
        });
    }
    dst.copy_from_slice(src);
    if dst.len() <= 1 {
        return Ok(());
    }

    let histogram = build_histograms(dst);
    let kind = mode.resolve(K::KIND);
    let plan = build_plan(&histogram, kind, direction, true);
    if plan.is_identity() {
        return Ok(());
    }

    let mut scratch = ScratchBuffer::<K>::acquire(dst.len(), page_hint)?;
    execute_plan(&plan, &histogram, dst, scratch.as_mut_slice(), |k, pass| {
        k.digit_byte(pass)
    });
    Ok(())
}

/// In-place sort with caller-owned scratch (spec §4.8 entry 3).
///
/// `final_in_buf = true` guarantees the result lands in `buf`, copying back
/// if ping-pong parity would otherwise leave it in `scratch`.
/// `final_in_buf = false` skips that copy and reports where the result
/// actually landed via [`ResultLocation`].
pub fn sort_no_alloc<K: RadixKey>(
    buf: &mut [K],
    scratch: &mut [K],
    direction: Direction,
    mode: Mode,
    final_in_buf: bool,
) -> Result<ResultLocation> {
    if buf.len() != scratch.len() {
        return Err(Error::InvalidArgument {
            reason: "sort_no_alloc requires buf.len() == scratch.len()",
        });
    }
    if buf.len() <= 1 {
        return Ok(ResultLocation::Buf);
    }

    let histogram = build_histograms(buf);
    let kind = mode.resolve(K::KIND);
    let plan = build_plan(&histogram, kind, direction, final_in_buf);
    if plan.is_identity() {
        return Ok(ResultLocation::Buf);
    }

    execute_plan(&plan, &histogram, buf, scratch, |k, pass| k.digit_byte(pass));

    Ok(match plan.result {
        BufferId::Primary => ResultLocation::Buf,
        BufferId::Scratch => ResultLocation::Scratch,
    })
}

/// Out-of-place sort with caller-owned buffers (spec §4.8 entry 4).
pub fn sort_copy_no_alloc<K: RadixKey>(
    src: &[K],
    dst: &mut [K],
    scratch: &mut [K],
    direction: Direction,
    mode: Mode,
) -> Result<()> {
    if src.len() != dst.len() || dst.len() != scratch.len() {
        return Err(Error::InvalidArgument {
            reason: "sort_copy_no_alloc requires src, dst, and scratch to share one length",
        });
    }
    dst.copy_from_slice(src);
    if dst.len() <= 1 {
        return Ok(());
    }

    let histogram = build_histograms(dst);
    let kind = mode.resolve(K::KIND);
    let plan = build_plan(&histogram, kind, direction, true);
    if plan.is_identity() {
        return Ok(());
    }

    execute_plan(&plan, &histogram, dst, scratch, |k, pass| k.digit_byte(pass));
    Ok(())
}

/// Indirect sort (spec §4.6/§4.8): sorts indices into `items` by a
/// projected key, without moving or comparing `items` itself.
pub fn sort_indirect<T, K, P>(
    items: &[T],
    projection: Projection<T, K, P>,
    direction: Direction,
    mode: Mode,
) -> Result<Vec<u32>>
where
    K: RadixKey,
{
    indirect::sort_indices(items, &projection, direction, mode)
}
