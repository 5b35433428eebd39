//! State-of-charge reconciliation for storage units and stores.
//!
//! The optimiser reports a state trajectory together with the flows that
//! should have produced it. Each snapshot is replayed from the *reported*
//! previous state:
//!
//! ```text
//! state(t) = (1 − standing_loss)^w(t) · previous(t) + w(t) · net(t)
//! previous(t) = reported(t − 1), or for the first snapshot
//!               reported(last) when cyclic, the initial state otherwise
//! ```
//!
//! and the difference to the reported state is the deviation sample. For
//! storage units `net = η_store·p_store + inflow − p_dispatch/η_dispatch −
//! spill`; for stores `net = −p`.

use lopf_core::{fields, ComponentKind, Diagnostics, LopfResult, Network, TimePanel};
use tracing::{debug, info};

const CATEGORY: &str = "storage";

/// Replay the balance recurrence one step from each reported state.
///
/// `standing` holds the retention factor and `net_energy` the weighted net
/// flow of each snapshot. The first snapshot starts from `initial`, or
/// wraps to the last reported state when `cyclic` is set.
pub fn reconstruct_states(
    reported: &[f64],
    standing: &[f64],
    net_energy: &[f64],
    initial: f64,
    cyclic: bool,
) -> Vec<f64> {
    let first = if cyclic {
        reported.last().copied().unwrap_or(initial)
    } else {
        initial
    };
    let previous = std::iter::once(first).chain(reported.iter().copied());
    previous
        .zip(standing.iter().zip(net_energy))
        .map(|(prev, (retention, net))| retention * prev + net)
        .collect()
}

fn deviations(reconstructed: &[f64], reported: &[f64]) -> Vec<f64> {
    reconstructed
        .iter()
        .zip(reported)
        .map(|(r, s)| r - s)
        .collect()
}

/// Panels a storage unit reconstruction cannot do without.
struct UnitPanels<'a> {
    p_store: &'a TimePanel,
    p_dispatch: &'a TimePanel,
    state: &'a TimePanel,
}

impl<'a> UnitPanels<'a> {
    fn lookup(network: &'a Network) -> Result<Self, &'static str> {
        let get = |field: &'static str| {
            network
                .panel(ComponentKind::StorageUnit, field)
                .ok_or(field)
        };
        Ok(Self {
            p_store: get(fields::P_STORE)?,
            p_dispatch: get(fields::P_DISPATCH)?,
            state: get(fields::STATE_OF_CHARGE)?,
        })
    }
}

/// Per-snapshot deviation of every storage unit's reported state of charge.
///
/// Needs separate `p_store` and `p_dispatch` panels; net power alone does
/// not say how much went in and how much came out. Without them the check
/// is skipped and an info diagnostic is recorded.
pub fn storage_unit_balance(network: &Network, diag: &mut Diagnostics) -> LopfResult<Vec<f64>> {
    if network.storage_units.is_empty() {
        return Ok(Vec::new());
    }
    let panels = match UnitPanels::lookup(network) {
        Ok(panels) => panels,
        Err(field) => {
            info!(field, "StorageUnit state of charge not reconstructable, skipping");
            diag.add_info(
                CATEGORY,
                &format!("StorageUnit SOC balance skipped: no {field} panel"),
            );
            return Ok(Vec::new());
        }
    };
    let inflow_panel = network.panel(ComponentKind::StorageUnit, fields::INFLOW);
    let spill_panel = network.panel(ComponentKind::StorageUnit, fields::SPILL);
    let snapshots = &network.snapshots;
    let len = snapshots.len();

    let mut samples = Vec::with_capacity(network.storage_units.len() * len);
    for unit in &network.storage_units {
        let name = unit.name.as_str();
        let (Some(p_store), Some(p_dispatch), Some(reported)) = (
            panels.p_store.values(name)?,
            panels.p_dispatch.values(name)?,
            panels.state.values(name)?,
        ) else {
            diag.add_error_with_entity(
                CATEGORY,
                "storage unit missing from p_store, p_dispatch or state_of_charge panel",
                name,
            );
            continue;
        };

        let inflow = match inflow_panel {
            Some(panel) => panel.dense_or(name, unit.inflow, len)?,
            None => snapshots.broadcast(unit.inflow),
        };
        let spill = match spill_panel {
            Some(panel) => panel.dense_or(name, 0.0, len)?,
            None => snapshots.broadcast(0.0),
        };

        for series in [&p_store, &p_dispatch, &reported] {
            snapshots.ensure_len(name, series.len())?;
        }
        let net: Vec<f64> = (0..len)
            .map(|t| {
                unit.efficiency_store * p_store[t] + inflow[t]
                    - p_dispatch[t] / unit.efficiency_dispatch
                    - spill[t]
            })
            .collect();
        let net_energy = snapshots.to_energy(name, &net)?;

        let reconstructed = reconstruct_states(
            &reported,
            &snapshots.standing_factors(unit.standing_loss),
            &net_energy,
            unit.state_of_charge_initial,
            unit.cyclic_state_of_charge,
        );
        samples.extend(deviations(&reconstructed, &reported));
    }
    debug!(samples = samples.len(), "StorageUnit SOC balance");
    Ok(samples)
}

/// Inflow energy left after spilling, for units that report spill.
///
/// A negative sample means more water was spilled than flowed in.
pub fn spillage_headroom(network: &Network, _diag: &mut Diagnostics) -> LopfResult<Vec<f64>> {
    let Some(spill_panel) = network.panel(ComponentKind::StorageUnit, fields::SPILL) else {
        return Ok(Vec::new());
    };
    let inflow_panel = network.panel(ComponentKind::StorageUnit, fields::INFLOW);
    let snapshots = &network.snapshots;
    let len = snapshots.len();

    let mut samples = Vec::new();
    for unit in &network.storage_units {
        let Some(spill) = spill_panel.values(&unit.name)? else {
            continue;
        };
        let inflow = match inflow_panel {
            Some(panel) => panel.dense_or(&unit.name, unit.inflow, len)?,
            None => snapshots.broadcast(unit.inflow),
        };
        let remaining: Vec<f64> = inflow.iter().zip(&spill).map(|(i, s)| i - s).collect();
        samples.extend(snapshots.to_energy(&unit.name, &remaining)?);
    }
    Ok(samples)
}

/// Per-snapshot deviation of every store's reported energy level.
pub fn store_balance(network: &Network, diag: &mut Diagnostics) -> LopfResult<Vec<f64>> {
    if network.stores.is_empty() {
        return Ok(Vec::new());
    }
    let (Some(level_panel), Some(power_panel)) = (
        network.panel(ComponentKind::Store, fields::E),
        network.panel(ComponentKind::Store, fields::P),
    ) else {
        info!("Store energy or power panel missing, skipping balance");
        diag.add_info(CATEGORY, "Store SOC balance skipped: no e or p panel");
        return Ok(Vec::new());
    };
    let snapshots = &network.snapshots;

    let mut samples = Vec::with_capacity(network.stores.len() * snapshots.len());
    for store in &network.stores {
        let (Some(reported), Some(p)) = (
            level_panel.values(&store.name)?,
            power_panel.values(&store.name)?,
        ) else {
            diag.add_error_with_entity(CATEGORY, "store missing from e or p panel", &store.name);
            continue;
        };
        snapshots.ensure_len(&store.name, reported.len())?;
        let withdrawn: Vec<f64> = p.iter().map(|v| -v).collect();
        let reconstructed = reconstruct_states(
            &reported,
            &snapshots.standing_factors(store.standing_loss),
            &snapshots.to_energy(&store.name, &withdrawn)?,
            store.e_initial,
            store.e_cyclic,
        );
        samples.extend(deviations(&reconstructed, &reported));
    }
    debug!(samples = samples.len(), "Store SOC balance");
    Ok(samples)
}
