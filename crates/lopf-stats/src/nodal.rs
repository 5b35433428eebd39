//! Kirchhoff's current law at every bus.
//!
//! The reported net injection `p` of a bus must equal the power leaving it
//! through its branches: `p0` of every line or transformer starting there
//! plus `p1` of every one ending there.

use std::collections::HashMap;

use lopf_core::{fields, ComponentKind, Diagnostics, LopfError, LopfResult, Network, TimePanel};
use tracing::{debug, info};

const CATEGORY: &str = "nodal";

/// A branch reduced to what the balance needs.
struct BranchEnds<'a> {
    name: &'a str,
    bus0: &'a str,
    bus1: &'a str,
}

fn branch_ends(network: &Network, kind: ComponentKind) -> Vec<BranchEnds<'_>> {
    match kind {
        ComponentKind::Line => network
            .lines
            .iter()
            .map(|l| BranchEnds {
                name: &l.name,
                bus0: &l.bus0,
                bus1: &l.bus1,
            })
            .collect(),
        ComponentKind::Transformer => network
            .transformers
            .iter()
            .map(|t| BranchEnds {
                name: &t.name,
                bus0: &t.bus0,
                bus1: &t.bus1,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Flow series of one branch end, failing if the panel lacks the branch.
fn end_flow(
    panel: &TimePanel,
    kind: ComponentKind,
    field: &str,
    branch: &str,
) -> LopfResult<Vec<f64>> {
    panel
        .values(branch)?
        .ok_or_else(|| LopfError::missing_column(kind.name(), field, branch))
}

/// Injection minus incident branch flow, for every (bus, snapshot) pair.
///
/// Buses without branches are compared against zero. The check is skipped
/// with a diagnostic when the bus injection panel, or the end flows of a
/// branch kind that has entities, were not exported.
pub fn nodal_balance(network: &Network, diag: &mut Diagnostics) -> LopfResult<Vec<f64>> {
    if network.buses.is_empty() {
        return Ok(Vec::new());
    }
    let Some(injection) = network.bus_panel(fields::P) else {
        info!("no bus injection panel, skipping nodal balance");
        diag.add_info(CATEGORY, "Nodal balance skipped: no Bus.p panel");
        return Ok(Vec::new());
    };
    let len = network.snapshots.len();

    let index: HashMap<&str, usize> = network
        .buses
        .iter()
        .enumerate()
        .map(|(i, bus)| (bus.name.as_str(), i))
        .collect();
    let mut incident = vec![vec![0.0; len]; network.buses.len()];

    for kind in [ComponentKind::Line, ComponentKind::Transformer] {
        let branches = branch_ends(network, kind);
        if branches.is_empty() {
            continue;
        }
        let (Some(p0), Some(p1)) = (
            network.panel(kind, fields::P0),
            network.panel(kind, fields::P1),
        ) else {
            info!(%kind, "branch flows missing, skipping nodal balance");
            diag.add_info(
                CATEGORY,
                &format!("Nodal balance skipped: no {kind}.p0 or {kind}.p1 panel"),
            );
            return Ok(Vec::new());
        };

        for branch in &branches {
            let ends = [(branch.bus0, p0, fields::P0), (branch.bus1, p1, fields::P1)];
            for (bus, panel, field) in ends {
                let row = *index
                    .get(bus)
                    .ok_or_else(|| LopfError::missing_entity("Bus", bus))?;
                let flow = end_flow(panel, kind, field, branch.name)?;
                network.snapshots.ensure_len(branch.name, flow.len())?;
                for (total, value) in incident[row].iter_mut().zip(&flow) {
                    *total += value;
                }
            }
        }
    }

    let mut samples = Vec::with_capacity(network.buses.len() * len);
    for (bus, flows) in network.buses.iter().zip(&incident) {
        let p = injection
            .values(&bus.name)?
            .ok_or_else(|| LopfError::missing_column("Bus", fields::P, &bus.name))?;
        network.snapshots.ensure_len(&bus.name, p.len())?;
        samples.extend(p.iter().zip(flows).map(|(p, f)| p - f));
    }
    debug!(samples = samples.len(), "nodal balance");
    Ok(samples)
}
