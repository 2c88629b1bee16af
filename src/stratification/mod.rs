//! Multi-label stratified cross-validation
//!
//! Provides:
//! - Iterative stratification over label sets
//! - A K-fold splitter and its repeated variant
//! - Disjointness/coverage checks and per-label balance reports

pub mod config;
pub mod diagnostics;
pub mod iterative;
pub mod splitter;

pub use config::StratifiedKFoldConfig;
pub use diagnostics::{
    assert_covers_all, assert_disjoint, label_balance_report, BalanceReport, LabelBalance,
};
pub use iterative::{FoldAssignment, IterativeStratifier, StratifyWarning};
pub use splitter::{CVSplit, IterativeStratifiedKFold, RepeatedIterativeStratifiedKFold, Splits};
