//! The external asterism search and the progress protocol around it.

use ags_types::{Asterism, Band, CandidateStar, GuideProbeGroup, SkyCoordinates};
use thiserror::Error;

/// Why an asterism search stopped early.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Cooperative cancellation; results gathered so far remain usable
    #[error("Asterism search cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

/// Answer of a progress callback. `GoodEnough` is advisory: the search may
/// carry on regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchControl {
    Continue,
    GoodEnough,
}

/// Input of one asterism search.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub group: &'a GuideProbeGroup,
    /// Tip-tilt candidates valid at one or more requested angles
    pub pool: &'a [CandidateStar],
    pub base: SkyCoordinates,
    pub band: Band,
    pub strehl_factor: f64,
}

/// Called once per discovered asterism with `(asterism, count, total)`.
/// Returning `Err(SearchError::Cancelled)` asks the search to stop.
pub type AsterismCallback<'c> =
    dyn FnMut(&Asterism, usize, usize) -> Result<SearchControl, SearchError> + 'c;

/// Combinatorial search producing candidate tip-tilt asterisms with Strehl
/// statistics, best first.
pub trait AsterismSearch: Send + Sync {
    /// Returns every asterism found, or `Cancelled` if the callback (or the
    /// search itself) stopped the search.
    fn search(
        &self,
        request: &SearchRequest,
        on_asterism: &mut AsterismCallback,
    ) -> Result<Vec<Asterism>, SearchError>;
}

/// Caller-side progress reporting for early-termination mode.
pub trait ProgressHandler {
    fn set_title(&mut self, _title: &str) {}

    /// `used` tells whether `asterism` produced at least one valid assignment.
    fn progress(
        &mut self,
        asterism: &Asterism,
        count: usize,
        total: usize,
        used: bool,
    ) -> Result<SearchControl, SearchError>;
}

/// Stops the search once a used asterism is good enough, or after a number
/// of used asterisms.
#[derive(Debug, Clone, PartialEq)]
pub struct StrehlThreshold {
    min_average: f64,
    max_used: Option<usize>,
    used: usize,
}

impl StrehlThreshold {
    pub fn new(min_average: f64, max_used: Option<usize>) -> Self {
        Self {
            min_average,
            max_used,
            used: 0,
        }
    }

    /// Used asterisms seen so far
    pub fn used(&self) -> usize {
        self.used
    }
}

impl ProgressHandler for StrehlThreshold {
    fn progress(
        &mut self,
        asterism: &Asterism,
        _count: usize,
        _total: usize,
        used: bool,
    ) -> Result<SearchControl, SearchError> {
        if !used {
            return Ok(SearchControl::Continue);
        }
        self.used += 1;
        let good_enough = asterism.strehl().avg >= self.min_average;
        let exhausted = self.max_used.is_some_and(|max| self.used >= max);
        if good_enough || exhausted {
            return Err(SearchError::Cancelled);
        }
        Ok(SearchControl::Continue)
    }
}
