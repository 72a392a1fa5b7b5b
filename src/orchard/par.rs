//! Per-tree fan-out, on the rayon pool when the `parallel` feature is on
//!
//! Output order always follows tree order, so results do not depend on the
//! feature.

use super::error::Result;

#[cfg(feature = "parallel")]
pub(crate) fn map_trees<T, F>(count: usize, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_trees<T, F>(count: usize, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync + Send,
{
    (0..count).map(f).collect()
}
