//! Key projections for indirect sorting (spec §4.6, component C6).
//!
//! An indirect sort never compares the reference array's elements
//! directly; it sorts a permutation of positions by a key *derived* from
//! each element. [`Projection`] names the three ways the original harness
//! derived that key (a getter, a getter with one bound extra parameter, and
//! a raw byte offset into a `#[repr(C)]`-shaped field) — see SPEC_FULL.md
//! §11.

/// How to derive a sort key `K` from a reference-array element `T`.
///
/// `P` is the type of the bound extra parameter for [`Projection::GetWith`]
/// and defaults to `()` for the common `Get`/`Offset` cases.
pub enum Projection<T, K, P = ()> {
    /// Read `K` from a byte offset within `T`, unaligned. The caller
    /// guarantees `offset` names the start of a valid `K`-typed field of
    /// `T` (the same contract the original's member-pointer offsets carry
    /// statically; Rust has no stable `offset_of!` for arbitrary fields, so
    /// this is the escape hatch — and it is the only `unsafe`-backed
    /// variant).
    Offset(usize),
    /// A plain getter, `fn(&T) -> K`.
    Get(fn(&T) -> K),
    /// A getter taking one extra bound parameter, `fn(&T, &P) -> K`, paired
    /// with the parameter value to pass on every call.
    GetWith(fn(&T, &P) -> K, P),
}

impl<T, K, P> Projection<T, K, P> {
    pub(crate) fn project(&self, item: &T) -> K {
        match self {
            Projection::Offset(offset) => unsafe {
                let base = item as *const T as *const u8;
                let field = base.add(*offset) as *const K;
                std::ptr::read_unaligned(field)
            },
            Projection::Get(f) => f(item),
            Projection::GetWith(f, p) => f(item, p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: u32,
        score: f32,
    }

    #[test]
    fn get_projection_reads_a_field() {
        let row = Row { id: 7, score: 3.5 };
        let p: Projection<Row, u32> = Projection::Get(|r| r.id);
        assert_eq!(p.project(&row), 7);
    }

    #[test]
    fn get_with_projection_passes_bound_param() {
        let row = Row { id: 7, score: 3.5 };
        let p: Projection<Row, f32, f32> = Projection::GetWith(|r, bias| r.score + bias, 1.0);
        assert_eq!(p.project(&row), 4.5);
    }

    #[test]
    fn offset_projection_reads_the_named_field() {
        let row = Row { id: 42, score: 0.0 };
        let offset = std::mem::offset_of!(Row, id);
        let p: Projection<Row, u32> = Projection::Offset(offset);
        assert_eq!(p.project(&row), 42);
    }
}
