//! # rsbd8
//!
//! `rsbd8` is a byte-wise, least-significant-digit-first radix sort engine
//! for contiguous arrays of fixed-width keys: unsigned and two's-complement
//! signed integers, IEEE-754 floats, the three extended-precision composite
//! float shapes (80/96/128-bit), and arrays of references sorted by a
//! projected key.
//!
//! ## Key Features
//!
//! - **Bidirectional output**: [`Direction::AscFwd`], [`Direction::AscRev`],
//!   [`Direction::DescFwd`], [`Direction::DescRev`] — ascending or
//!   descending total order, written forward or reverse into the
//!   destination.
//! - **Correct signed/float ordering**: a per-pass bucket-order table
//!   handles two's-complement sign bits and IEEE sign-magnitude floats
//!   (including ±0, ±∞, NaN, subnormals) without branching in the scatter
//!   loop itself.
//! - **No hot-path allocation**: [`sort_no_alloc`] and
//!   [`sort_copy_no_alloc`] accept caller-owned scratch; [`sort`] and
//!   [`sort_copy`] allocate internally via a large-page-aware allocator.
//! - **Indirect sorting**: [`sort_indirect`] sorts a permutation of
//!   positions by a [`Projection`] of each referenced element, reading the
//!   backing array exactly once regardless of key width.
//!
//! ## Usage
//!
//! ```rust
//! use rsbd8::{sort, Direction, Mode};
//!
//! let mut data = vec![5u32, 1, 4, 1, 2, 9, 8, 6, 3, 7, 0];
//! sort(&mut data, Direction::AscFwd, Mode::Auto, 0).unwrap();
//! assert_eq!(data, vec![0, 1, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
//! ```
//!
//! Indirect sorting over a projected field:
//!
//! ```rust
//! use rsbd8::{sort_indirect, Direction, Mode, Projection};
//!
//! struct Row { id: u64 }
//! let rows = vec![Row { id: 8 }, Row { id: 0 }, Row { id: 6 }];
//! let order = sort_indirect(
//!     &rows,
//!     Projection::Get(|r: &Row| r.id),
//!     Direction::AscFwd,
//!     Mode::Auto,
//! ).unwrap();
//! let sorted_ids: Vec<u64> = order.iter().map(|&i| rows[i as usize].id).collect();
//! assert_eq!(sorted_ids, vec![0, 6, 8]);
//! ```

mod alloc;
mod direction;
mod dispatch;
mod error;
pub mod fmt;
mod histogram;
mod indirect;
mod key;
mod plan;
mod projection;
mod scatter;

pub use direction::{Direction, KeyKind, Mode};
pub use dispatch::{ResultLocation, sort, sort_copy, sort_copy_no_alloc, sort_indirect, sort_no_alloc};
pub use error::{Error, Result};
pub use key::{Ldouble80, Ldouble96, Ldouble128, RadixKey};
pub use projection::Projection;

pub mod prelude {
    pub use crate::{
        Direction, Error, KeyKind, Ldouble80, Ldouble96, Ldouble128, Mode, Projection, RadixKey,
        Result, ResultLocation, sort, sort_copy, sort_copy_no_alloc, sort_indirect, sort_no_alloc,
    };
}
