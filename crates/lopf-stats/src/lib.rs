//! # lopf-stats: Post-Solve Audit for Linear Optimal Power Flow
//!
//! Recomputes from a solved [`Network`](lopf_core::Network) the quantities
//! the optimiser reports about itself, and checks that its answer actually
//! satisfies the constraints it was given.
//!
//! ## Accounting
//!
//! - [`operational_cost`] - marginal and commitment cost of the dispatch
//! - [`investment_cost`] - capital cost of capacity expansion
//! - [`total_cost`] - the sum of both
//! - [`curtailment`] - share of renewable availability left unused, by carrier
//!
//! ## Constraint audit
//!
//! Each check yields a sample per (entity, snapshot) pair; the aggregator
//! summarises every sample set into one row of [`ConstraintStats`]:
//!
//! | Row | Check |
//! |-----|-------|
//! | `Cycle Constr.` | impedance-weighted loop flow, [`cycles`] |
//! | `SOC Balance Store` | store energy replay, [`storage`] |
//! | `Spillage Limit` | inflow minus spill, [`storage`] |
//! | `SOC Balance StorageUnit` | state-of-charge replay, [`storage`] |
//! | `Nodal Balance Constr.` | injection minus branch flows, [`nodal`] |
//! | `<Kind> Lower Limit` / `<Kind> Upper Limit` | dispatch headroom, [`dispatch`] |
//!
//! [`check_constraints`] applies a tolerance and returns
//! [`CheckError::Violation`] listing every row outside it.
//!
//! ## Example
//!
//! ```rust
//! use lopf_core::{fields, ComponentKind, Generator, Network, Snapshots, TimePanel};
//! use lopf_stats::{check_constraints, CheckError};
//!
//! let mut network = Network::new(Snapshots::hourly(2));
//! network.generators.push(Generator::new("wind", "north").with_p_nom(0.0, 100.0));
//! network.set_series(
//!     ComponentKind::Generator,
//!     fields::P,
//!     TimePanel::from_columns([("wind", vec![100.0, 60.0])])?,
//! )?;
//! network.set_series(
//!     ComponentKind::Generator,
//!     fields::P_MAX_PU,
//!     TimePanel::from_columns([("wind", vec![1.0, 0.5])])?,
//! )?;
//!
//! match check_constraints(&network, 1e-3) {
//!     Err(CheckError::Violation(v)) => assert_eq!(v.violations[0].name, "Generator Upper Limit"),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok::<(), lopf_core::LopfError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod costs;
pub mod curtailment;
pub mod cycles;
pub mod describe;
pub mod dispatch;
pub mod nodal;
pub mod storage;

pub use aggregate::{
    check_constraints, check_constraints_with, constraint_statistics, constraint_statistics_with,
    CheckError, ConstraintRow, ConstraintSense, ConstraintStats, ToleranceViolation, Violation,
};
pub use config::{CheckConfig, DEFAULT_CYCLE_SCALE};
pub use costs::{
    investment_cost, operational_cost, total_cost, CostDriver, InvestmentCost, OperationalCost,
};
pub use curtailment::curtailment;
pub use describe::Describe;
pub use dispatch::{DispatchHeadroom, OperatingPoint};
