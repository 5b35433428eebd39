//! Collects every check into one statistics table and applies the tolerance.
//!
//! Equality checks (cycle sums, storage balances, nodal balance) must stay
//! within `[-τ, τ]`. Inequality checks report headroom, which may be
//! arbitrarily large; only their minimum is held against `-τ`.

use std::collections::BTreeMap;
use std::fmt;

use lopf_core::{ComponentKind, Diagnostics, LopfError, LopfResult, Network};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CheckConfig;
use crate::cycles::cycle_flow_sums;
use crate::describe::Describe;
use crate::dispatch::dispatch_headroom;
use crate::nodal::nodal_balance;
use crate::storage::{spillage_headroom, store_balance, storage_unit_balance};

pub const CYCLE_ROW: &str = "Cycle Constr.";
pub const STORE_ROW: &str = "SOC Balance Store";
pub const SPILLAGE_ROW: &str = "Spillage Limit";
pub const STORAGE_UNIT_ROW: &str = "SOC Balance StorageUnit";
pub const NODAL_ROW: &str = "Nodal Balance Constr.";

pub fn lower_limit_row(kind: ComponentKind) -> String {
    format!("{kind} Lower Limit")
}

pub fn upper_limit_row(kind: ComponentKind) -> String {
    format!("{kind} Upper Limit")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintSense {
    /// Deviation between two sides that should agree
    Equality,
    /// Headroom `limit − value`, which should not be negative
    Inequality,
}

impl ConstraintSense {
    /// Whether `stats` breaks the tolerance. Undefined statistics pass.
    pub fn violates(self, stats: &Describe, tolerance: f64) -> bool {
        let below = stats.min < -tolerance;
        match self {
            ConstraintSense::Equality => below || stats.max > tolerance,
            ConstraintSense::Inequality => below,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConstraintSense::Equality => "equality",
            ConstraintSense::Inequality => "inequality",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintRow {
    pub name: String,
    pub sense: ConstraintSense,
    #[serde(flatten)]
    pub stats: Describe,
}

/// Statistics of every check that had samples, in a fixed order, plus the
/// diagnostics explaining any check that was left out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConstraintStats {
    pub rows: Vec<ConstraintRow>,
    pub diagnostics: Diagnostics,
}

impl ConstraintStats {
    pub fn get(&self, name: &str) -> Option<&ConstraintRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn violations(&self, tolerance: f64) -> Vec<Violation> {
        self.rows
            .iter()
            .filter(|row| row.sense.violates(&row.stats, tolerance))
            .map(|row| Violation {
                name: row.name.clone(),
                min: row.stats.min,
                max: match row.sense {
                    ConstraintSense::Equality => row.stats.max,
                    ConstraintSense::Inequality => f64::NAN,
                },
            })
            .collect()
    }

    /// One row per check with its sense and distribution columns.
    pub fn to_dataframe(&self) -> LopfResult<DataFrame> {
        let column = |f: fn(&Describe) -> f64| -> Vec<f64> {
            self.rows.iter().map(|row| f(&row.stats)).collect()
        };
        let names: Vec<&str> = self.rows.iter().map(|row| row.name.as_str()).collect();
        let senses: Vec<&str> = self.rows.iter().map(|row| row.sense.label()).collect();
        let counts: Vec<u64> = self.rows.iter().map(|row| row.stats.count as u64).collect();

        Ok(DataFrame::new(vec![
            Series::new("constraint", names),
            Series::new("sense", senses),
            Series::new("count", counts),
            Series::new("mean", column(|d| d.mean)),
            Series::new("std", column(|d| d.std)),
            Series::new("min", column(|d| d.min)),
            Series::new("25%", column(|d| d.q25)),
            Series::new("50%", column(|d| d.median)),
            Series::new("75%", column(|d| d.q75)),
            Series::new("max", column(|d| d.max)),
        ])?)
    }
}

/// A check outside the tolerance. `max` is NaN for inequality checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToleranceViolation {
    pub tolerance: f64,
    pub violations: Vec<Violation>,
}

impl fmt::Display for ToleranceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "The following constraint(s) are exceeding the given tolerance of {}:",
            self.tolerance
        )?;
        let width = self
            .violations
            .iter()
            .map(|v| v.name.len())
            .max()
            .unwrap_or(0)
            .max("constraint".len());
        writeln!(f, "  {:<width$}  {:>14}  {:>14}", "constraint", "min", "max")?;
        for v in &self.violations {
            writeln!(f, "  {:<width$}  {:>14.6e}  {:>14.6e}", v.name, v.min, v.max)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{0}")]
    Violation(ToleranceViolation),

    #[error(transparent)]
    Network(#[from] LopfError),
}

/// Samples of one statistics row before they are summarised.
struct SampleRow {
    name: String,
    sense: ConstraintSense,
    samples: Vec<f64>,
}

impl SampleRow {
    fn equality(name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            sense: ConstraintSense::Equality,
            samples,
        }
    }

    fn inequality(name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            sense: ConstraintSense::Inequality,
            samples,
        }
    }
}

struct CheckContext<'a> {
    network: &'a Network,
    config: &'a CheckConfig,
    line_carriers: BTreeMap<String, String>,
}

/// The independent checks, in reporting order.
#[derive(Debug, Clone, Copy)]
enum Check {
    Cycles,
    Stores,
    StorageUnits,
    Nodal,
    Dispatch,
}

impl Check {
    const ALL: [Check; 5] = [
        Check::Cycles,
        Check::Stores,
        Check::StorageUnits,
        Check::Nodal,
        Check::Dispatch,
    ];

    fn run(self, ctx: &CheckContext<'_>) -> LopfResult<(Vec<SampleRow>, Diagnostics)> {
        let network = ctx.network;
        let mut diag = Diagnostics::new();
        let rows = match self {
            Check::Cycles => {
                let scale = ctx.config.cycle_scale;
                let sums = cycle_flow_sums(network, &ctx.line_carriers, scale, &mut diag)?;
                vec![SampleRow::equality(CYCLE_ROW, sums)]
            }
            Check::Stores => vec![SampleRow::equality(
                STORE_ROW,
                store_balance(network, &mut diag)?,
            )],
            Check::StorageUnits => vec![
                SampleRow::inequality(SPILLAGE_ROW, spillage_headroom(network, &mut diag)?),
                SampleRow::equality(
                    STORAGE_UNIT_ROW,
                    storage_unit_balance(network, &mut diag)?,
                ),
            ],
            Check::Nodal => vec![SampleRow::equality(
                NODAL_ROW,
                nodal_balance(network, &mut diag)?,
            )],
            Check::Dispatch => {
                let mut lower = Vec::new();
                let mut upper = Vec::new();
                for kind in ComponentKind::ALL {
                    let headroom = dispatch_headroom(network, kind, &mut diag)?;
                    lower.push(SampleRow::inequality(lower_limit_row(kind), headroom.lower));
                    upper.push(SampleRow::inequality(upper_limit_row(kind), headroom.upper));
                }
                lower.extend(upper);
                lower
            }
        };
        debug!(check = ?self, "check evaluated");
        Ok((rows, diag))
    }
}

#[cfg(feature = "parallel")]
fn run_checks(ctx: &CheckContext<'_>) -> Vec<LopfResult<(Vec<SampleRow>, Diagnostics)>> {
    use rayon::prelude::*;

    if ctx.config.parallel {
        Check::ALL[..].par_iter().map(|check| check.run(ctx)).collect()
    } else {
        Check::ALL.iter().map(|check| check.run(ctx)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_checks(ctx: &CheckContext<'_>) -> Vec<LopfResult<(Vec<SampleRow>, Diagnostics)>> {
    Check::ALL.iter().map(|check| check.run(ctx)).collect()
}

/// Statistics of every check with the default configuration.
pub fn constraint_statistics(network: &Network) -> LopfResult<ConstraintStats> {
    constraint_statistics_with(network, &CheckConfig::default())
}

/// Statistics of every check. Checks without samples produce no row; a
/// check whose samples are all NaN is dropped with a warning diagnostic.
pub fn constraint_statistics_with(
    network: &Network,
    config: &CheckConfig,
) -> LopfResult<ConstraintStats> {
    config.validate()?;
    debug!(network = %network.summary(), "auditing network");
    let ctx = CheckContext {
        network,
        config,
        line_carriers: network.line_carriers()?,
    };

    let mut stats = ConstraintStats::default();
    for outcome in run_checks(&ctx) {
        let (rows, diag) = outcome?;
        stats.diagnostics.merge(diag);
        for row in rows {
            if row.samples.is_empty() {
                continue;
            }
            match Describe::from_samples(&row.samples) {
                Some(summary) => stats.rows.push(ConstraintRow {
                    name: row.name,
                    sense: row.sense,
                    stats: summary,
                }),
                None => {
                    warn!(constraint = %row.name, "every sample is NaN");
                    stats.diagnostics.add_warning(
                        "aggregate",
                        &format!("{} dropped: every sample is NaN", row.name),
                    );
                }
            }
        }
    }
    Ok(stats)
}

/// Fail with every violating row when a check exceeds `tolerance`.
pub fn check_constraints(
    network: &Network,
    tolerance: f64,
) -> Result<ConstraintStats, CheckError> {
    let config = CheckConfig::default().with_tolerance(tolerance);
    check_constraints_with(network, &config)
}

pub fn check_constraints_with(
    network: &Network,
    config: &CheckConfig,
) -> Result<ConstraintStats, CheckError> {
    let stats = constraint_statistics_with(network, config)?;
    let violations = stats.violations(config.tolerance);
    info!(
        rows = stats.rows.len(),
        violations = violations.len(),
        diagnostics = %stats.diagnostics.summary(),
        tolerance = config.tolerance,
        "constraint check finished"
    );
    if violations.is_empty() {
        return Ok(stats);
    }
    for v in &violations {
        warn!(constraint = %v.name, min = v.min, max = v.max, "tolerance exceeded");
    }
    Err(CheckError::Violation(ToleranceViolation {
        tolerance: config.tolerance,
        violations,
    }))
}
