//! ppi-stratify - Multi-label stratified cross-validation
//!
//! Splits a multi-label dataset (for example protein-protein interactions
//! annotated with pathway labels) into k folds so that every label keeps
//! roughly the same share in every fold.
//!
//! # Modules
//!
//! - [`labels`] - Dense label encoding and per-label statistics
//! - [`tie_break`] - Deterministic and seeded tie-breaking for greedy selection
//! - [`stratification`] - Iterative stratification, K-fold splitters, diagnostics
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```
//! use ppi_stratify::stratification::IterativeStratifiedKFold;
//!
//! let y = vec![
//!     vec!["kegg", "hprd"],
//!     vec!["kegg"],
//!     vec!["hprd"],
//!     vec!["kegg"],
//! ];
//! let cv = IterativeStratifiedKFold::new(2).with_random_state(42);
//! for split in cv.split(&y)? {
//!     assert_eq!(split.train_indices.len() + split.test_indices.len(), 4);
//! }
//! # Ok::<(), ppi_stratify::StratifyError>(())
//! ```

// Core error handling
pub mod error;

// Core algorithm
pub mod labels;
pub mod tie_break;
pub mod stratification;

// Services
pub mod cli;

pub use error::{Result, StratifyError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, StratifyError};

    // Labels
    pub use crate::labels::{indicator_to_label_sets, LabelIndex};

    // Tie-breaking
    pub use crate::tie_break::{
        arg_ties, pick_tied, Extremum, FirstTieBreaker, RngTieBreaker, TieBreaker,
    };

    // Stratification
    pub use crate::stratification::{
        assert_covers_all, assert_disjoint, label_balance_report, BalanceReport, CVSplit,
        FoldAssignment, IterativeStratifiedKFold, IterativeStratifier, LabelBalance,
        RepeatedIterativeStratifiedKFold, Splits, StratifiedKFoldConfig, StratifyWarning,
    };
}
