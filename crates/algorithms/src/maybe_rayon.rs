//! Parallel iteration for the per-observation and per-permutation loops.
//!
//! With the `parallel` feature the loops in the permutation engine, neighbor
//! builders and point pattern queries run on rayon. Without it,
//! `into_par_iter()` is a plain iterator. Every loop body seeds its own RNG
//! stream, so both builds give the same p-values.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::IntoParallelIterator`.
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
