use std::collections::BTreeMap;

use crate::components::{
    Bus, Component, Generator, Line, Link, StaticEntry, StorageUnit, Store, Transformer,
};
use crate::error::{LopfError, LopfResult};
use crate::kind::ComponentKind;
use crate::panel::{PanelSet, TimePanel};
use crate::snapshots::Snapshots;
use crate::topology::SubNetwork;

/// A solved network as handed over by the optimiser.
///
/// Static tables are plain vectors of typed rows. Time-varying results live
/// in one [`PanelSet`] per component kind (plus one for buses), and every
/// panel is checked against the snapshot count when it is inserted. The
/// audit only ever reads from a `Network`.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub snapshots: Snapshots,
    pub buses: Vec<Bus>,
    pub generators: Vec<Generator>,
    pub lines: Vec<Line>,
    pub transformers: Vec<Transformer>,
    pub links: Vec<Link>,
    pub storage_units: Vec<StorageUnit>,
    pub stores: Vec<Store>,
    pub sub_networks: Vec<SubNetwork>,
    bus_series: PanelSet,
    series: BTreeMap<ComponentKind, PanelSet>,
}

impl Network {
    pub fn new(snapshots: Snapshots) -> Self {
        Self {
            snapshots,
            ..Self::default()
        }
    }

    /// Insert a time panel for `kind.field`, replacing any previous one.
    pub fn set_series(
        &mut self,
        kind: ComponentKind,
        field: &str,
        panel: TimePanel,
    ) -> LopfResult<()> {
        self.ensure_height(&format!("{kind}.{field}"), &panel)?;
        self.series.entry(kind).or_default().insert(field, panel);
        Ok(())
    }

    pub fn set_bus_series(&mut self, field: &str, panel: TimePanel) -> LopfResult<()> {
        self.ensure_height(&format!("Bus.{field}"), &panel)?;
        self.bus_series.insert(field, panel);
        Ok(())
    }

    fn ensure_height(&self, what: &str, panel: &TimePanel) -> LopfResult<()> {
        if panel.is_empty() {
            return Ok(());
        }
        self.snapshots.ensure_len(what, panel.height())
    }

    /// The panel for `kind.field`, if present and non-empty.
    pub fn panel(&self, kind: ComponentKind, field: &str) -> Option<&TimePanel> {
        self.series.get(&kind).and_then(|set| set.non_empty(field))
    }

    pub fn bus_panel(&self, field: &str) -> Option<&TimePanel> {
        self.bus_series.non_empty(field)
    }

    /// Uniform static rows for any kind, in table order.
    pub fn static_entries(&self, kind: ComponentKind) -> Vec<StaticEntry> {
        fn entries<C: Component>(rows: &[C]) -> Vec<StaticEntry> {
            rows.iter().map(StaticEntry::of).collect()
        }
        match kind {
            ComponentKind::Generator => entries(&self.generators),
            ComponentKind::Line => entries(&self.lines),
            ComponentKind::Transformer => entries(&self.transformers),
            ComponentKind::Link => entries(&self.links),
            ComponentKind::StorageUnit => entries(&self.storage_units),
            ComponentKind::Store => entries(&self.stores),
        }
    }

    /// Carrier of every line, taken from its origin bus.
    ///
    /// The loop-flow check weights lines by reactance on AC and by
    /// resistance elsewhere; it receives this map as an argument rather than
    /// reading a carrier column off the line table.
    pub fn line_carriers(&self) -> LopfResult<BTreeMap<String, String>> {
        let bus_carriers: BTreeMap<&str, &str> = self
            .buses
            .iter()
            .map(|bus| (bus.name.as_str(), bus.carrier.as_str()))
            .collect();
        self.lines
            .iter()
            .map(|line| {
                bus_carriers
                    .get(line.bus0.as_str())
                    .map(|carrier| (line.name.clone(), carrier.to_string()))
                    .ok_or_else(|| LopfError::missing_entity("Bus", line.bus0.clone()))
            })
            .collect()
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            snapshots: self.snapshots.len(),
            buses: self.buses.len(),
            generators: self.generators.len(),
            lines: self.lines.len(),
            transformers: self.transformers.len(),
            links: self.links.len(),
            storage_units: self.storage_units.len(),
            stores: self.stores.len(),
            sub_networks: self.sub_networks.len(),
        }
    }
}

/// Entity counts of a network, logged before an audit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSummary {
    pub snapshots: usize,
    pub buses: usize,
    pub generators: usize,
    pub lines: usize,
    pub transformers: usize,
    pub links: usize,
    pub storage_units: usize,
    pub stores: usize,
    pub sub_networks: usize,
}

impl std::fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} snapshots, {} buses, {} generators, {} lines, {} transformers, {} links, \
             {} storage units, {} stores, {} sub-networks",
            self.snapshots,
            self.buses,
            self.generators,
            self.lines,
            self.transformers,
            self.links,
            self.storage_units,
            self.stores,
            self.sub_networks
        )
    }
}
