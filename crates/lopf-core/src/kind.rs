//! Component kinds and their static attribute table.
//!
//! Each kind carries a fixed nominal-capacity attribute and a fixed dispatch
//! field. Branch-like kinds (lines, transformers, links) report a flow at
//! each end; everything else reports a single signed quantity. The table is
//! resolved at compile time so no check ever assembles a field name from a
//! string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Panel field names shared by the network and the checks.
pub mod fields {
    pub const P: &str = "p";
    pub const P0: &str = "p0";
    pub const P1: &str = "p1";
    pub const E: &str = "e";
    pub const P_STORE: &str = "p_store";
    pub const P_DISPATCH: &str = "p_dispatch";
    pub const STATE_OF_CHARGE: &str = "state_of_charge";
    pub const INFLOW: &str = "inflow";
    pub const SPILL: &str = "spill";
    pub const MARGINAL_COST: &str = "marginal_cost";
    pub const STATUS: &str = "status";
    pub const P_MAX_PU: &str = "p_max_pu";
    pub const P_MIN_PU: &str = "p_min_pu";
    pub const S_MAX_PU: &str = "s_max_pu";
    pub const S_MIN_PU: &str = "s_min_pu";
    pub const E_MAX_PU: &str = "e_max_pu";
    pub const E_MIN_PU: &str = "e_min_pu";
}

/// How a component reports its operating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchConvention {
    /// Two ends: `p0` withdrawn at the origin bus, `p1` at the destination
    Directional,
    /// One signed field (`p` or `e`)
    Unidirectional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Generator,
    Line,
    Transformer,
    Link,
    StorageUnit,
    Store,
}

impl ComponentKind {
    /// All kinds carrying a nominal capacity, in reporting order.
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Generator,
        ComponentKind::Line,
        ComponentKind::Transformer,
        ComponentKind::Link,
        ComponentKind::StorageUnit,
        ComponentKind::Store,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Generator => "Generator",
            ComponentKind::Line => "Line",
            ComponentKind::Transformer => "Transformer",
            ComponentKind::Link => "Link",
            ComponentKind::StorageUnit => "StorageUnit",
            ComponentKind::Store => "Store",
        }
    }

    /// Nominal capacity attribute; the optimised value is `<attr>_opt`.
    pub fn nominal_attr(self) -> &'static str {
        match self {
            ComponentKind::Line | ComponentKind::Transformer => "s_nom",
            ComponentKind::Store => "e_nom",
            ComponentKind::Generator | ComponentKind::Link | ComponentKind::StorageUnit => {
                "p_nom"
            }
        }
    }

    pub fn convention(self) -> DispatchConvention {
        match self {
            ComponentKind::Line | ComponentKind::Transformer | ComponentKind::Link => {
                DispatchConvention::Directional
            }
            ComponentKind::Generator | ComponentKind::StorageUnit | ComponentKind::Store => {
                DispatchConvention::Unidirectional
            }
        }
    }

    /// Field holding the operating point compared against the capacity.
    pub fn dispatch_field(self) -> &'static str {
        match self {
            ComponentKind::Line | ComponentKind::Transformer | ComponentKind::Link => fields::P0,
            ComponentKind::Store => fields::E,
            ComponentKind::Generator | ComponentKind::StorageUnit => fields::P,
        }
    }

    pub fn max_pu_field(self) -> &'static str {
        match self {
            ComponentKind::Line | ComponentKind::Transformer => fields::S_MAX_PU,
            ComponentKind::Store => fields::E_MAX_PU,
            ComponentKind::Generator | ComponentKind::Link | ComponentKind::StorageUnit => {
                fields::P_MAX_PU
            }
        }
    }

    pub fn min_pu_field(self) -> &'static str {
        match self {
            ComponentKind::Line | ComponentKind::Transformer => fields::S_MIN_PU,
            ComponentKind::Store => fields::E_MIN_PU,
            ComponentKind::Generator | ComponentKind::Link | ComponentKind::StorageUnit => {
                fields::P_MIN_PU
            }
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
