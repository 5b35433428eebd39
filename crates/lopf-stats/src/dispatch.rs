//! Dispatch against installed capacity.
//!
//! Headroom is `limit − operating point`, so a negative sample is a
//! violation. Branch kinds are judged on their origin-end flow `p0`, and
//! their lower bound is the reverse thermal limit `cap·max_pu + p0 ≥ 0`
//! rather than a `min_pu` floor. Single-ended kinds use their own dispatch
//! field against `cap·max_pu` above and `cap·min_pu` below.

use lopf_core::{
    ComponentKind, Diagnostics, DispatchConvention, LopfError, LopfResult, Network, StaticEntry,
};
use tracing::{debug, info};

const CATEGORY: &str = "dispatch";

/// Where a component operates in one snapshot series.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatingPoint {
    /// Flow withdrawn at the origin bus of a branch
    Directional { p0: Vec<f64> },
    /// Dispatch (`p`) or energy level (`e`) of a single-ended component
    Unidirectional { p: Vec<f64> },
}

impl OperatingPoint {
    pub fn new(convention: DispatchConvention, series: Vec<f64>) -> Self {
        match convention {
            DispatchConvention::Directional => OperatingPoint::Directional { p0: series },
            DispatchConvention::Unidirectional => OperatingPoint::Unidirectional { p: series },
        }
    }

    pub fn series(&self) -> &[f64] {
        match self {
            OperatingPoint::Directional { p0 } => p0,
            OperatingPoint::Unidirectional { p } => p,
        }
    }

    /// `capacity · max_pu − x` per snapshot.
    pub fn upper_headroom(&self, capacity: f64, max_pu: &[f64]) -> Vec<f64> {
        self.series()
            .iter()
            .zip(max_pu)
            .map(|(x, pu)| capacity * pu - x)
            .collect()
    }

    /// Distance to the lower bound per snapshot.
    ///
    /// Branches mirror the upper limit (`capacity · max_pu + p0`) and ignore
    /// `min_pu`; single-ended components use `x − capacity · min_pu`.
    pub fn lower_headroom(&self, capacity: f64, max_pu: &[f64], min_pu: &[f64]) -> Vec<f64> {
        match self {
            OperatingPoint::Directional { p0 } => p0
                .iter()
                .zip(max_pu)
                .map(|(x, pu)| capacity * pu + x)
                .collect(),
            OperatingPoint::Unidirectional { p } => p
                .iter()
                .zip(min_pu)
                .map(|(x, pu)| x - capacity * pu)
                .collect(),
        }
    }
}

/// Upper and lower headroom samples of one component kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchHeadroom {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Headroom of every entity of `kind` over every snapshot.
///
/// Limits come from the `*_max_pu`/`*_min_pu` panels where the entity has a
/// column, otherwise from the static value. A kind without entities yields
/// empty samples; one without a dispatch panel is skipped with a diagnostic.
pub fn dispatch_headroom(
    network: &Network,
    kind: ComponentKind,
    diag: &mut Diagnostics,
) -> LopfResult<DispatchHeadroom> {
    let mut headroom = DispatchHeadroom::default();
    let entries = network.static_entries(kind);
    if entries.is_empty() {
        return Ok(headroom);
    }
    let field = kind.dispatch_field();
    let Some(dispatch) = network.panel(kind, field) else {
        info!(%kind, field, "no dispatch panel, skipping limit check");
        diag.add_info(
            CATEGORY,
            &format!("{kind} limits skipped: no {kind}.{field} panel"),
        );
        return Ok(headroom);
    };
    let max_panel = network.panel(kind, kind.max_pu_field());
    let min_panel = network.panel(kind, kind.min_pu_field());
    let len = network.snapshots.len();

    for StaticEntry {
        name,
        capacity,
        max_pu,
        min_pu,
        ..
    } in &entries
    {
        let series = dispatch
            .values(name)?
            .ok_or_else(|| LopfError::missing_column(kind.name(), field, name.as_str()))?;
        network.snapshots.ensure_len(name, series.len())?;
        let max_pu = match max_panel {
            Some(panel) => panel.dense_or(name, *max_pu, len)?,
            None => network.snapshots.broadcast(*max_pu),
        };
        let min_pu = match min_panel {
            Some(panel) => panel.dense_or(name, *min_pu, len)?,
            None => network.snapshots.broadcast(*min_pu),
        };

        let point = OperatingPoint::new(kind.convention(), series);
        headroom
            .upper
            .extend(point.upper_headroom(capacity.optimal, &max_pu));
        headroom
            .lower
            .extend(point.lower_headroom(capacity.optimal, &max_pu, &min_pu));
    }
    debug!(%kind, samples = headroom.upper.len(), "dispatch headroom");
    Ok(headroom)
}
