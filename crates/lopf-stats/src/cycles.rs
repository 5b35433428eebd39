//! Kirchhoff's voltage law around every independent cycle.
//!
//! For a cycle `c` of a sub-network the impedance-weighted flow sum
//! `scale · Σ_l C[l, c] · z_l · p0_l(t)` vanishes when flows follow voltage
//! angles. `z_l` is the effective reactance of AC lines and the effective
//! resistance of all others.

use std::collections::{BTreeMap, HashMap};

use lopf_core::{
    fields, ComponentKind, Diagnostics, Line, LopfError, LopfResult, Network, SubNetwork, AC,
};
use tracing::{debug, info};

const CATEGORY: &str = "cycles";

/// Loop-flow sums over every (sub-network, cycle, snapshot).
///
/// `line_carriers` maps each line to its carrier and selects the impedance
/// used as weight. Sub-networks without cycles contribute nothing.
pub fn cycle_flow_sums(
    network: &Network,
    line_carriers: &BTreeMap<String, String>,
    scale: f64,
    diag: &mut Diagnostics,
) -> LopfResult<Vec<f64>> {
    let meshed: Vec<&SubNetwork> = network
        .sub_networks
        .iter()
        .filter(|sub| sub.cycle_count() > 0)
        .collect();
    if meshed.is_empty() {
        return Ok(Vec::new());
    }
    let Some(p0) = network.panel(ComponentKind::Line, fields::P0) else {
        info!("no line flow panel, skipping cycle check");
        diag.add_info(CATEGORY, "Cycle constraints skipped: no Line.p0 panel");
        return Ok(Vec::new());
    };
    let lines: HashMap<&str, &Line> = network
        .lines
        .iter()
        .map(|line| (line.name.as_str(), line))
        .collect();
    let len = network.snapshots.len();

    let mut samples = Vec::new();
    for sub in meshed {
        // Impedance-weighted flow of each line row, scaled once up front.
        let weighted: Vec<Vec<f64>> = sub
            .lines()
            .iter()
            .map(|name| -> LopfResult<Vec<f64>> {
                let line = lines
                    .get(name.as_str())
                    .ok_or_else(|| LopfError::missing_entity("Line", name.as_str()))?;
                let carrier = line_carriers
                    .get(name)
                    .ok_or_else(|| LopfError::missing_entity("Line carrier", name.as_str()))?;
                let impedance = if carrier == AC {
                    line.x_pu_eff
                } else {
                    line.r_pu_eff
                };
                let flow = p0.values(name)?.ok_or_else(|| {
                    LopfError::missing_column(ComponentKind::Line.name(), fields::P0, name.as_str())
                })?;
                network.snapshots.ensure_len(name, flow.len())?;
                Ok(flow.iter().map(|f| scale * impedance * f).collect())
            })
            .collect::<LopfResult<_>>()?;

        for cycle in sub.cycles().outer_iterator() {
            let mut sums = vec![0.0; len];
            for (row, coefficient) in cycle.iter() {
                for (sum, value) in sums.iter_mut().zip(&weighted[row]) {
                    *sum += coefficient * value;
                }
            }
            samples.extend(sums);
        }
        debug!(sub_network = %sub.name, cycles = sub.cycle_count(), "cycle sums");
    }
    Ok(samples)
}
