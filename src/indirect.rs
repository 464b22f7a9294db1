//! Indirect sort adapter (spec §4.6, component C6).
//!
//! Sorts a reference array — here, a `Vec<u32>` of indices into `items` —
//! by a key projected out of each referenced element, without ever moving
//! or comparing `items` itself. The projected keys are materialized once
//! into a keycache during the histogram pre-pass (the same linear read
//! that builds `H`), so every later pass reads the cache sequentially
//! instead of dereferencing through `items` again — bounding indirect reads
//! to exactly N regardless of key width (spec §4.6).

use crate::alloc::ScratchBuffer;
use crate::direction::{Direction, Mode};
use crate::error::{Error, Result};
use crate::histogram::build_histograms;
use crate::key::RadixKey;
use crate::plan::build_plan;
use crate::projection::Projection;
use crate::scatter::execute_plan;

/// Sorts indices `0..items.len()` by `projection(items[i])`, returning the
/// permutation rather than reordering `items`.
pub(crate) fn sort_indices<T, K, P>(
    items: &[T],
    projection: &Projection<T, K, P>,
    direction: Direction,
    mode: Mode,
) -> Result<Vec<u32>>
where
    K: RadixKey,
{
    let n = items.len();
    if n > u32::MAX as usize {
        return Err(Error::InvalidArgument {
            reason: "indirect sort supports at most u32::MAX references",
        });
    }
    let mut indices: Vec<u32> = (0..n as u32).collect();
    if n <= 1 {
        return Ok(indices);
    }

    // Fused pre-pass (spec §4.6): one read through `items`, both
    // materializing the keycache and the only indirect read this call ever
    // performs.
    let keycache: Vec<K> = items.iter().map(|item| projection.project(item)).collect();
    log::debug!("indirect sort: materialized keycache for {n} references");

    let histogram = build_histograms(&keycache);
    let kind = mode.resolve(K::KIND);
    let plan = build_plan(&histogram, kind, direction, true);
    if plan.is_identity() {
        return Ok(indices);
    }

    let mut scratch = ScratchBuffer::<u32>::acquire(n, 0)?;
    execute_plan(
        &plan,
        &histogram,
        &mut indices,
        scratch.as_mut_slice(),
        |&idx, pass| keycache[idx as usize].digit_byte(pass),
    );

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Mode;

    struct Record {
        co: u64,
    }

    #[test]
    fn sorts_indices_not_the_backing_array() {
        // Scenario S5 from spec §8.
        let records: Vec<Record> = [8u64, 0, 6, 4, 0, 2, 6]
            .into_iter()
            .map(|co| Record { co })
            .collect();
        let projection: Projection<Record, u64> = Projection::Get(|r| r.co);

        let order = sort_indices(&records, &projection, Direction::AscFwd, Mode::Auto).unwrap();
        let sorted_cos: Vec<u64> = order.iter().map(|&i| records[i as usize].co).collect();
        assert_eq!(sorted_cos, vec![0, 0, 2, 4, 6, 6, 8]);
        // the backing array itself was never touched
        assert_eq!(records[0].co, 8);
    }

    #[test]
    fn empty_and_singleton_are_identity() {
        let records: Vec<Record> = vec![];
        let projection: Projection<Record, u64> = Projection::Get(|r| r.co);
        assert!(
            sort_indices(&records, &projection, Direction::AscFwd, Mode::Auto)
                .unwrap()
                .is_empty()
        );

        let one = vec![Record { co: 42 }];
        let order = sort_indices(&one, &projection, Direction::AscFwd, Mode::Auto).unwrap();
        assert_eq!(order, vec![0]);
    }
}
