//! Guide star asterism selection and probe assignment for multi-conjugate adaptive optics.
//!
//! Catalog candidates arrive already grouped into a tip-tilt probe family and
//! a flexure probe family. Each asterism proposed by the external search is
//! bound to concrete guide probes at every requested position angle, and the
//! valid configurations come back ranked best first.
//!
//! Probe geometry, magnitude limit tables and the Strehl search itself are
//! collaborators supplied through the traits in [`capability`] and [`search`].

pub mod analyze;
pub mod angles;
pub mod bandpass;
pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod pairing;
pub mod ranking;
pub mod resolver;
pub mod scenario;
pub mod search;

pub use analyze::{EarlyTerminationHandler, GuideStarAnalyzer};
pub use capability::{MagnitudeLimitTable, NominalMagnitudeLimits, ProbeValidator};
pub use config::{AgsConfig, ConfigStorage};
pub use context::{Conditions, ImageQuality, Instrument, ObservationContext};
pub use error::AgsError;
pub use pairing::{CatalogSearchResults, TiptiltFlexurePair};
pub use ranking::rank_results;
pub use resolver::{Cwfs3Rule, ProbeOrder, ProbeResolver};
pub use search::{AsterismSearch, ProgressHandler, SearchControl, SearchError, StrehlThreshold};

pub use ags_types::*;
