//! Static tables: one typed row per entity of each component kind.
//!
//! Defaults follow the usual LOPF conventions so tests and importers only
//! spell out what differs: availability factors of one, lossless storage,
//! non-cyclic boundaries, and a storage-unit floor of `p_min_pu = -1`
//! (full-rate charging).

/// Carrier name of alternating-current buses; every other carrier is
/// treated as direct current by the loop-flow check.
pub const AC: &str = "AC";

/// Nominal capacity before and after expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    pub nominal: f64,
    pub optimal: f64,
}

impl Capacity {
    /// Expansion beyond the base capacity; shrinkage counts as zero.
    pub fn extension(&self) -> f64 {
        (self.optimal - self.nominal).max(0.0)
    }
}

/// Uniform accessors over the static row of any component kind.
pub trait Component {
    fn name(&self) -> &str;
    fn capacity(&self) -> Capacity;
    fn capital_cost(&self) -> f64;
    /// Static upper availability factor (used when no time series exists)
    fn max_pu(&self) -> f64;
    /// Static lower availability factor (used when no time series exists)
    fn min_pu(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct Bus {
    pub name: String,
    pub carrier: String,
}

impl Bus {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            carrier: AC.to_string(),
        }
    }

    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = carrier.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Generator {
    pub name: String,
    pub bus: String,
    pub carrier: String,
    pub p_nom: f64,
    pub p_nom_opt: f64,
    pub p_max_pu: f64,
    pub p_min_pu: f64,
    /// Marginal cost per MWh
    pub marginal_cost: f64,
    pub capital_cost: f64,
    pub start_up_cost: f64,
    pub shut_down_cost: f64,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            name: String::new(),
            bus: String::new(),
            carrier: String::new(),
            p_nom: 0.0,
            p_nom_opt: 0.0,
            p_max_pu: 1.0,
            p_min_pu: 0.0,
            marginal_cost: 0.0,
            capital_cost: 0.0,
            start_up_cost: 0.0,
            shut_down_cost: 0.0,
        }
    }
}

impl Generator {
    pub fn new(name: impl Into<String>, bus: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bus: bus.into(),
            ..Self::default()
        }
    }

    /// Set base and optimised nominal power in MW.
    pub fn with_p_nom(mut self, p_nom: f64, p_nom_opt: f64) -> Self {
        self.p_nom = p_nom;
        self.p_nom_opt = p_nom_opt;
        self
    }

    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = carrier.into();
        self
    }

    pub fn with_marginal_cost(mut self, marginal_cost: f64) -> Self {
        self.marginal_cost = marginal_cost;
        self
    }

    pub fn with_commitment_costs(mut self, start_up: f64, shut_down: f64) -> Self {
        self.start_up_cost = start_up;
        self.shut_down_cost = shut_down;
        self
    }
}

impl Component for Generator {
    fn name(&self) -> &str {
        &self.name
    }
    fn capacity(&self) -> Capacity {
        Capacity {
            nominal: self.p_nom,
            optimal: self.p_nom_opt,
        }
    }
    fn capital_cost(&self) -> f64 {
        self.capital_cost
    }
    fn max_pu(&self) -> f64 {
        self.p_max_pu
    }
    fn min_pu(&self) -> f64 {
        self.p_min_pu
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub name: String,
    pub bus0: String,
    pub bus1: String,
    pub s_nom: f64,
    pub s_nom_opt: f64,
    pub s_max_pu: f64,
    pub capital_cost: f64,
    /// Effective series reactance (per-unit)
    pub x_pu_eff: f64,
    /// Effective series resistance (per-unit)
    pub r_pu_eff: f64,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            name: String::new(),
            bus0: String::new(),
            bus1: String::new(),
            s_nom: 0.0,
            s_nom_opt: 0.0,
            s_max_pu: 1.0,
            capital_cost: 0.0,
            x_pu_eff: 0.0,
            r_pu_eff: 0.0,
        }
    }
}

impl Line {
    pub fn new(name: impl Into<String>, bus0: impl Into<String>, bus1: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bus0: bus0.into(),
            bus1: bus1.into(),
            ..Self::default()
        }
    }

    pub fn with_s_nom(mut self, s_nom: f64, s_nom_opt: f64) -> Self {
        self.s_nom = s_nom;
        self.s_nom_opt = s_nom_opt;
        self
    }

    pub fn with_impedance(mut self, r_pu_eff: f64, x_pu_eff: f64) -> Self {
        self.r_pu_eff = r_pu_eff;
        self.x_pu_eff = x_pu_eff;
        self
    }
}

impl Component for Line {
    fn name(&self) -> &str {
        &self.name
    }
    fn capacity(&self) -> Capacity {
        Capacity {
            nominal: self.s_nom,
            optimal: self.s_nom_opt,
        }
    }
    fn capital_cost(&self) -> f64 {
        self.capital_cost
    }
    fn max_pu(&self) -> f64 {
        self.s_max_pu
    }
    // Branches are bounded symmetrically; the lower limit mirrors the upper one.
    fn min_pu(&self) -> f64 {
        -self.s_max_pu
    }
}

#[derive(Debug, Clone)]
pub struct Transformer {
    pub name: String,
    pub bus0: String,
    pub bus1: String,
    pub s_nom: f64,
    pub s_nom_opt: f64,
    pub s_max_pu: f64,
    pub capital_cost: f64,
    pub x_pu_eff: f64,
    pub r_pu_eff: f64,
}

impl Default for Transformer {
    fn default() -> Self {
        Self {
            name: String::new(),
            bus0: String::new(),
            bus1: String::new(),
            s_nom: 0.0,
            s_nom_opt: 0.0,
            s_max_pu: 1.0,
            capital_cost: 0.0,
            x_pu_eff: 0.0,
            r_pu_eff: 0.0,
        }
    }
}

impl Transformer {
    pub fn new(name: impl Into<String>, bus0: impl Into<String>, bus1: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bus0: bus0.into(),
            bus1: bus1.into(),
            ..Self::default()
        }
    }

    pub fn with_s_nom(mut self, s_nom: f64, s_nom_opt: f64) -> Self {
        self.s_nom = s_nom;
        self.s_nom_opt = s_nom_opt;
        self
    }
}

impl Component for Transformer {
    fn name(&self) -> &str {
        &self.name
    }
    fn capacity(&self) -> Capacity {
        Capacity {
            nominal: self.s_nom,
            optimal: self.s_nom_opt,
        }
    }
    fn capital_cost(&self) -> f64 {
        self.capital_cost
    }
    fn max_pu(&self) -> f64 {
        self.s_max_pu
    }
    fn min_pu(&self) -> f64 {
        -self.s_max_pu
    }
}

/// Controllable point-to-point branch (HVDC link, converter, pipeline).
#[derive(Debug, Clone)]
pub struct Link {
    pub name: String,
    pub bus0: String,
    pub bus1: String,
    pub p_nom: f64,
    pub p_nom_opt: f64,
    pub p_max_pu: f64,
    pub p_min_pu: f64,
    pub efficiency: f64,
    pub capital_cost: f64,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            name: String::new(),
            bus0: String::new(),
            bus1: String::new(),
            p_nom: 0.0,
            p_nom_opt: 0.0,
            p_max_pu: 1.0,
            p_min_pu: 0.0,
            efficiency: 1.0,
            capital_cost: 0.0,
        }
    }
}

impl Link {
    pub fn new(name: impl Into<String>, bus0: impl Into<String>, bus1: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bus0: bus0.into(),
            bus1: bus1.into(),
            ..Self::default()
        }
    }

    pub fn with_p_nom(mut self, p_nom: f64, p_nom_opt: f64) -> Self {
        self.p_nom = p_nom;
        self.p_nom_opt = p_nom_opt;
        self
    }
}

impl Component for Link {
    fn name(&self) -> &str {
        &self.name
    }
    fn capacity(&self) -> Capacity {
        Capacity {
            nominal: self.p_nom,
            optimal: self.p_nom_opt,
        }
    }
    fn capital_cost(&self) -> f64 {
        self.capital_cost
    }
    fn max_pu(&self) -> f64 {
        self.p_max_pu
    }
    fn min_pu(&self) -> f64 {
        self.p_min_pu
    }
}

/// Power-rated storage (batteries, pumped hydro, reservoirs with inflow).
#[derive(Debug, Clone)]
pub struct StorageUnit {
    pub name: String,
    pub bus: String,
    pub carrier: String,
    pub p_nom: f64,
    pub p_nom_opt: f64,
    pub p_max_pu: f64,
    pub p_min_pu: f64,
    pub marginal_cost: f64,
    pub capital_cost: f64,
    pub efficiency_store: f64,
    pub efficiency_dispatch: f64,
    /// Fraction of the state of charge lost per hour
    pub standing_loss: f64,
    pub cyclic_state_of_charge: bool,
    pub state_of_charge_initial: f64,
    /// Static inflow rate in MW, used when no inflow series exists
    pub inflow: f64,
}

impl Default for StorageUnit {
    fn default() -> Self {
        Self {
            name: String::new(),
            bus: String::new(),
            carrier: String::new(),
            p_nom: 0.0,
            p_nom_opt: 0.0,
            p_max_pu: 1.0,
            p_min_pu: -1.0,
            marginal_cost: 0.0,
            capital_cost: 0.0,
            efficiency_store: 1.0,
            efficiency_dispatch: 1.0,
            standing_loss: 0.0,
            cyclic_state_of_charge: false,
            state_of_charge_initial: 0.0,
            inflow: 0.0,
        }
    }
}

impl StorageUnit {
    pub fn new(name: impl Into<String>, bus: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bus: bus.into(),
            ..Self::default()
        }
    }

    pub fn with_p_nom(mut self, p_nom: f64, p_nom_opt: f64) -> Self {
        self.p_nom = p_nom;
        self.p_nom_opt = p_nom_opt;
        self
    }

    pub fn with_efficiencies(mut self, store: f64, dispatch: f64) -> Self {
        self.efficiency_store = store;
        self.efficiency_dispatch = dispatch;
        self
    }

    pub fn with_standing_loss(mut self, standing_loss: f64) -> Self {
        self.standing_loss = standing_loss;
        self
    }

    pub fn with_initial_state(mut self, state_of_charge_initial: f64) -> Self {
        self.state_of_charge_initial = state_of_charge_initial;
        self
    }

    pub fn cyclic(mut self) -> Self {
        self.cyclic_state_of_charge = true;
        self
    }
}

impl Component for StorageUnit {
    fn name(&self) -> &str {
        &self.name
    }
    fn capacity(&self) -> Capacity {
        Capacity {
            nominal: self.p_nom,
            optimal: self.p_nom_opt,
        }
    }
    fn capital_cost(&self) -> f64 {
        self.capital_cost
    }
    fn max_pu(&self) -> f64 {
        self.p_max_pu
    }
    fn min_pu(&self) -> f64 {
        self.p_min_pu
    }
}

/// Energy-rated storage; its net power `p` is positive when discharging.
#[derive(Debug, Clone)]
pub struct Store {
    pub name: String,
    pub bus: String,
    pub carrier: String,
    pub e_nom: f64,
    pub e_nom_opt: f64,
    pub e_max_pu: f64,
    pub e_min_pu: f64,
    pub marginal_cost: f64,
    pub capital_cost: f64,
    pub standing_loss: f64,
    pub e_cyclic: bool,
    pub e_initial: f64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            name: String::new(),
            bus: String::new(),
            carrier: String::new(),
            e_nom: 0.0,
            e_nom_opt: 0.0,
            e_max_pu: 1.0,
            e_min_pu: 0.0,
            marginal_cost: 0.0,
            capital_cost: 0.0,
            standing_loss: 0.0,
            e_cyclic: false,
            e_initial: 0.0,
        }
    }
}

impl Store {
    pub fn new(name: impl Into<String>, bus: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bus: bus.into(),
            ..Self::default()
        }
    }

    pub fn with_e_nom(mut self, e_nom: f64, e_nom_opt: f64) -> Self {
        self.e_nom = e_nom;
        self.e_nom_opt = e_nom_opt;
        self
    }

    pub fn with_standing_loss(mut self, standing_loss: f64) -> Self {
        self.standing_loss = standing_loss;
        self
    }

    pub fn with_initial_energy(mut self, e_initial: f64) -> Self {
        self.e_initial = e_initial;
        self
    }

    pub fn cyclic(mut self) -> Self {
        self.e_cyclic = true;
        self
    }
}

impl Component for Store {
    fn name(&self) -> &str {
        &self.name
    }
    fn capacity(&self) -> Capacity {
        Capacity {
            nominal: self.e_nom,
            optimal: self.e_nom_opt,
        }
    }
    fn capital_cost(&self) -> f64 {
        self.capital_cost
    }
    fn max_pu(&self) -> f64 {
        self.e_max_pu
    }
    fn min_pu(&self) -> f64 {
        self.e_min_pu
    }
}

/// Kind-agnostic view of a static row, as produced by
/// [`crate::Network::static_entries`].
#[derive(Debug, Clone, PartialEq)]
pub struct StaticEntry {
    pub name: String,
    pub capacity: Capacity,
    pub capital_cost: f64,
    pub max_pu: f64,
    pub min_pu: f64,
}

impl StaticEntry {
    pub fn of<C: Component>(component: &C) -> Self {
        Self {
            name: component.name().to_string(),
            capacity: component.capacity(),
            capital_cost: component.capital_cost(),
            max_pu: component.max_pu(),
            min_pu: component.min_pu(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_extension_clamps_shrinkage() {
        let grown = Capacity {
            nominal: 100.0,
            optimal: 150.0,
        };
        let shrunk = Capacity {
            nominal: 100.0,
            optimal: 80.0,
        };
        assert_eq!(grown.extension(), 50.0);
        assert_eq!(shrunk.extension(), 0.0);
    }

    #[test]
    fn test_storage_defaults() {
        let su = StorageUnit::new("battery", "bus0");
        assert_eq!(su.p_min_pu, -1.0);
        assert_eq!(su.efficiency_store, 1.0);
        assert!(!su.cyclic_state_of_charge);
        assert!(su.cyclic().cyclic_state_of_charge);
    }

    #[test]
    fn test_static_entry_uses_kind_accessors() {
        let line = Line::new("l1", "a", "b").with_s_nom(100.0, 120.0);
        let entry = StaticEntry::of(&line);
        assert_eq!(entry.name, "l1");
        assert_eq!(entry.capacity.optimal, 120.0);
        assert_eq!(entry.min_pu, -1.0);
    }
}
