//! Tie-breaking for greedy min/max selection
//!
//! Two resolution modes are offered:
//! - [`arg_ties`] returns every index attaining the extremum, sorted, so a
//!   later criterion can narrow the set down
//! - [`pick_tied`] resolves to a single index, delegating ties to a
//!   [`TieBreaker`]
//!
//! The randomness source stays behind the [`TieBreaker`] trait so the
//! stratifier's control flow does not depend on a concrete generator.

use rand::Rng;

/// Which extremum a selection is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

/// Chooses one of `n` equally good candidates
pub trait TieBreaker {
    /// Return a position in `0..n`. `n` is always at least 1.
    fn pick(&mut self, n: usize) -> usize;
}

impl<T: TieBreaker + ?Sized> TieBreaker for &mut T {
    fn pick(&mut self, n: usize) -> usize {
        (**self).pick(n)
    }
}

/// Uniform choice among tied candidates, driven by a caller-owned generator
#[derive(Debug, Clone)]
pub struct RngTieBreaker<R> {
    rng: R,
}

impl<R: Rng> RngTieBreaker<R> {
    /// Wrap a generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Access the wrapped generator
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Give the generator back
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> TieBreaker for RngTieBreaker<R> {
    fn pick(&mut self, n: usize) -> usize {
        if n <= 1 {
            0
        } else {
            self.rng.gen_range(0..n)
        }
    }
}

/// Always takes the first tied candidate.
///
/// Useful in tests where a fully predictable assignment is wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTieBreaker;

impl TieBreaker for FirstTieBreaker {
    fn pick(&mut self, _n: usize) -> usize {
        0
    }
}

fn extremum_of(values: &[f64], extremum: Extremum) -> Option<f64> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(match extremum {
        Extremum::Min => iter.fold(first, f64::min),
        Extremum::Max => iter.fold(first, f64::max),
    })
}

/// All indices whose value equals the extremum, ascending.
///
/// Equality is exact: targets only ever move by whole units from a shared
/// starting value, so equal budgets compare equal.
pub fn arg_ties(values: &[f64], extremum: Extremum) -> Vec<usize> {
    match extremum_of(values, extremum) {
        Some(best) => values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == best)
            .map(|(i, _)| i)
            .collect(),
        None => Vec::new(),
    }
}

/// A single index attaining the extremum; ties go to `breaker`.
///
/// Returns `None` for an empty slice.
pub fn pick_tied<B>(values: &[f64], extremum: Extremum, breaker: &mut B) -> Option<usize>
where
    B: TieBreaker + ?Sized,
{
    let ties = arg_ties(values, extremum);
    match ties.len() {
        0 => None,
        1 => Some(ties[0]),
        n => Some(ties[breaker.pick(n)]),
    }
}
