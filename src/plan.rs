//! Pass planner (spec §4.3, component C3).
//!
//! Decides, from a [`Histogram`], which digit passes actually need to run,
//! which logical buffer each surviving pass writes into (adjacent passes
//! ping-pong: source of pass i+1 is the destination of pass i), and which
//! pass (if any) carries the sign/float fix-up. When the forced ping-pong
//! parity would leave the result in the wrong buffer, the plan records a
//! trailing copy step instead of padding in a pass that sorts nothing
//! (spec §4.3 step 4: "append a memory-copy step rather than perform a
//! wasted dummy pass").

use crate::direction::{Direction, Fill, KeyKind};
use crate::histogram::Histogram;
use crate::key::{bucket_order, bucket_reverse_mask};

/// Logical role of a buffer during one sort call. `Primary` is always
/// where the input starts and where the final, sorted result must end up;
/// `Scratch` is the spare ping-pong buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BufferId {
    Primary,
    Scratch,
}

/// One surviving (non-trivial) digit pass.
#[derive(Debug, Clone)]
pub(crate) struct PassStep {
    pub pass: usize,
    pub bucket_order: [u8; 256],
    /// Buckets (indexed by raw digit value) whose elements must be scattered
    /// back-to-front instead of front-to-back (spec §4.5, float sign pass
    /// only — see [`crate::key::bucket_reverse_mask`]).
    pub bucket_reverse: [bool; 256],
    pub fill: Fill,
    pub dest: BufferId,
}

/// The full plan for one sort call.
#[derive(Debug, Clone)]
pub(crate) struct Plan {
    pub steps: Vec<PassStep>,
    /// `true` when the last surviving pass's forced ping-pong parity leaves
    /// the result in `Scratch`; the dispatcher must then copy it back into
    /// `Primary` to finish the call.
    pub needs_final_copy: bool,
    /// Where the sorted data sits once `steps` (and, if any, the final
    /// copy) have run. Always `Primary` unless the caller opted out of the
    /// copy-back via `force_final_primary = false` (spec §4.8
    /// `sort_no_alloc`'s `final_in_buf`).
    pub result: BufferId,
}

impl Plan {
    /// `true` when every byte column was constant (or there were zero/one
    /// elements): the identity permutation is already the answer, and the
    /// dispatcher must fall back to a plain copy if source and destination
    /// differ (spec §4.3 step 4, §4.2 edge policy for N ≤ 1).
    pub(crate) fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A constant-valued column is normally elided (spec §4.3 step 1): with one
/// bucket holding every element, the permutation it induces is the
/// identity. That reasoning breaks for the final pass of a `Float` key when
/// its single populated digit is in the negative half (`>= 0x80`): that
/// pass's job isn't just to rank buckets against each other, it's also to
/// reverse the arrival order *within* a negative bucket (spec §4.5 — IEEE
/// negative floats sort by reversed bit-pattern magnitude). A trivial
/// column with a negative digit still needs that reversal even though
/// every element lands in the same bucket, so it must survive despite
/// being "trivial" by the single-bucket test. `[-1.0f32, -1.5]` is the
/// minimal repro: both share the same top byte (a trivial column), but
/// `-1.5` must still end up before `-1.0`.
fn elided_sign_pass_would_lose_reversal(
    histogram: &Histogram,
    pass: usize,
    width: usize,
    kind: KeyKind,
) -> bool {
    kind == KeyKind::Float && pass + 1 == width && histogram.counts(pass)[128..].iter().any(|&c| c > 0)
}

/// Builds the plan for `histogram` under `kind`/`direction`.
///
/// `force_final_primary` is `true` for every entry point except
/// `sort_no_alloc` called with `final_in_buf = false`: when `false`, the
/// plan never appends a copy-back step and instead reports in
/// [`Plan::result`] which buffer the caller must read the sorted data from.
pub(crate) fn build_plan(
    histogram: &Histogram,
    kind: KeyKind,
    direction: Direction,
    force_final_primary: bool,
) -> Plan {
    let width = histogram.width();
    let order = direction.order();
    let final_fill = direction.final_fill();

    let survives = |p: usize| {
        !histogram.is_trivial(p) || elided_sign_pass_would_lose_reversal(histogram, p, width, kind)
    };
    let nontrivial: Vec<usize> = (0..width).filter(|&p| survives(p)).collect();
    let count = nontrivial.len();

    let mut steps = Vec::with_capacity(count);
    let mut current = BufferId::Primary;
    for (k, &pass) in nontrivial.iter().enumerate() {
        let is_last = k + 1 == count;
        let is_sign_pass = pass + 1 == width && kind != KeyKind::Unsigned;
        let bo = bucket_order(kind, is_sign_pass, order);
        let brm = bucket_reverse_mask(kind, is_sign_pass, order);
        let dest = match current {
            BufferId::Primary => BufferId::Scratch,
            BufferId::Scratch => BufferId::Primary,
        };
        let fill = if is_last { final_fill } else { Fill::Forward };
        log::trace!("pass {pass}/{width}: sign_pass={is_sign_pass} dest={dest:?} fill={fill:?}");
        steps.push(PassStep {
            pass,
            bucket_order: bo,
            bucket_reverse: brm,
            fill,
            dest,
        });
        current = dest;
    }
    for skipped in (0..width).filter(|&p| !survives(p)) {
        log::trace!("pass {skipped}/{width}: elided (single-value column)");
    }

    let parity_in_scratch = count > 0 && current != BufferId::Primary;
    let needs_final_copy = force_final_primary && parity_in_scratch;
    if needs_final_copy {
        log::trace!("parity leaves result in scratch, appending final copy-back");
    }
    let result = if needs_final_copy || !parity_in_scratch {
        BufferId::Primary
    } else {
        BufferId::Scratch
    };

    Plan {
        steps,
        needs_final_copy,
        result,
    }
}
