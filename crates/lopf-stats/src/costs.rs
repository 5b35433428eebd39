//! Cost accounting recomputed from the solved dispatch.
//!
//! Operational cost prices the non-negative part of each dispatch series:
//! charging a storage unit appears as negative `p`, and the optimiser may
//! leave it unpriced, so it must not reduce the total. Where a component
//! carries a time-varying `marginal_cost` panel, that contribution is added
//! on top of the static coefficient (both are summed, not chosen between).
//!
//! Commitment cost counts status transitions in the `status` panel of
//! generators: a 0→1 step is a start-up, 1→0 a shut-down.
//!
//! Investment cost prices capacity expansion, `max(0, opt − nom)`; a
//! shrinking capacity is a data anomaly and earns no credit.

use std::collections::BTreeMap;
use std::fmt;

use lopf_core::{fields, ComponentKind, LopfResult, Network};
use serde::{Serialize, Serializer};
use tracing::debug;

/// Kinds whose dispatch incurs marginal cost.
pub const MARGINAL_COST_KINDS: [ComponentKind; 3] = [
    ComponentKind::Generator,
    ComponentKind::StorageUnit,
    ComponentKind::Store,
];

/// Kinds whose capacity expansion incurs capital cost.
pub const INVESTMENT_KINDS: [ComponentKind; 6] = [
    ComponentKind::Generator,
    ComponentKind::Line,
    ComponentKind::StorageUnit,
    ComponentKind::Store,
    ComponentKind::Link,
    ComponentKind::Transformer,
];

/// A component kind together with the quantity being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CostDriver {
    pub kind: ComponentKind,
    pub field: &'static str,
}

impl CostDriver {
    pub fn new(kind: ComponentKind, field: &'static str) -> Self {
        Self { kind, field }
    }
}

impl fmt::Display for CostDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}__{}", self.kind, self.field)
    }
}

// Serialized as its display form so driver maps become JSON objects.
impl Serialize for CostDriver {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationalCost {
    /// Total marginal cost over all drivers
    pub total: f64,
    pub per_driver: BTreeMap<CostDriver, f64>,
    /// Start-up plus shut-down cost
    pub commitment: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvestmentCost {
    pub total: f64,
    pub per_driver: BTreeMap<CostDriver, f64>,
}

/// Marginal and commitment cost of the solved dispatch.
///
/// Dispatch is priced per snapshot and summed over time, without the
/// snapshot weightings. A kind without entities or without a dispatch panel
/// contributes an explicit zero.
pub fn operational_cost(network: &Network) -> LopfResult<OperationalCost> {
    let mut result = OperationalCost::default();

    for kind in MARGINAL_COST_KINDS {
        let driver = CostDriver::new(kind, fields::P);
        let cost = marginal_cost(network, kind)?;
        debug!(%driver, cost, "marginal cost");
        result.per_driver.insert(driver, cost);
        result.total += cost;
    }

    result.commitment = commitment_cost(network)?;
    Ok(result)
}

fn static_marginal_costs(network: &Network, kind: ComponentKind) -> Vec<(&str, f64)> {
    match kind {
        ComponentKind::Generator => network
            .generators
            .iter()
            .map(|g| (g.name.as_str(), g.marginal_cost))
            .collect(),
        ComponentKind::StorageUnit => network
            .storage_units
            .iter()
            .map(|su| (su.name.as_str(), su.marginal_cost))
            .collect(),
        ComponentKind::Store => network
            .stores
            .iter()
            .map(|s| (s.name.as_str(), s.marginal_cost))
            .collect(),
        ComponentKind::Line | ComponentKind::Transformer | ComponentKind::Link => Vec::new(),
    }
}

fn marginal_cost(network: &Network, kind: ComponentKind) -> LopfResult<f64> {
    let rows = static_marginal_costs(network, kind);
    let Some(dispatch) = network.panel(kind, fields::P) else {
        if !rows.is_empty() {
            debug!(%kind, "no dispatch panel, marginal cost counted as zero");
        }
        return Ok(0.0);
    };
    let time_varying = network.panel(kind, fields::MARGINAL_COST);
    let snapshots = &network.snapshots;

    let mut cost = 0.0;
    for (name, coefficient) in rows {
        let Some(p) = dispatch.values(name)? else {
            continue;
        };
        snapshots.ensure_len(name, p.len())?;
        let clipped: Vec<f64> = p.iter().map(|v| v.max(0.0)).collect();
        cost += coefficient * clipped.iter().sum::<f64>();

        if let Some(prices) = time_varying.map(|panel| panel.values(name)).transpose()?.flatten() {
            snapshots.ensure_len(name, prices.len())?;
            cost += prices.iter().zip(&clipped).map(|(c, p)| c * p).sum::<f64>();
        }
    }
    Ok(cost)
}

/// Number of start-ups and shut-downs in a commitment status series.
pub fn count_transitions(status: &[f64]) -> (usize, usize) {
    status
        .windows(2)
        .fold((0, 0), |(up, down), pair| {
            match (pair[1] - pair[0]).round() as i64 {
                1 => (up + 1, down),
                -1 => (up, down + 1),
                _ => (up, down),
            }
        })
}

fn commitment_cost(network: &Network) -> LopfResult<f64> {
    let Some(status) = network.panel(ComponentKind::Generator, fields::STATUS) else {
        return Ok(0.0);
    };
    let mut total = 0.0;
    for generator in &network.generators {
        // Generators absent from the status panel are not committable.
        let Some(series) = status.values(&generator.name)? else {
            continue;
        };
        let (startups, shutdowns) = count_transitions(&series);
        total += startups as f64 * generator.start_up_cost
            + shutdowns as f64 * generator.shut_down_cost;
    }
    Ok(total)
}

/// Capital cost of capacity expansion, per kind and overall.
pub fn investment_cost(network: &Network) -> InvestmentCost {
    let mut result = InvestmentCost::default();
    for kind in INVESTMENT_KINDS {
        let cost: f64 = network
            .static_entries(kind)
            .iter()
            .map(|entry| entry.capacity.extension() * entry.capital_cost)
            .sum();
        result
            .per_driver
            .insert(CostDriver::new(kind, kind.nominal_attr()), cost);
        result.total += cost;
    }
    result
}

/// Investment plus marginal plus commitment cost.
pub fn total_cost(network: &Network) -> LopfResult<f64> {
    let operational = operational_cost(network)?;
    let investment = investment_cost(network);
    Ok(investment.total + operational.total + operational.commitment)
}
