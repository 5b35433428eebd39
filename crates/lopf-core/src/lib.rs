//! # lopf-core: Solved Network Model
//!
//! The read-only view of a solved linear optimal power flow that the
//! post-solve audit in `lopf-stats` works on.
//!
//! ## Design
//!
//! A [`Network`] holds, for every component kind:
//! - a **static table**: one typed row per entity ([`Generator`], [`Line`],
//!   [`StorageUnit`], …) with capacities, efficiencies and cost coefficients;
//! - a **panel set**: one [`TimePanel`] per time-varying field (`p`, `p0`,
//!   `state_of_charge`, …), each a polars frame with one row per snapshot
//!   and one column per entity.
//!
//! Alongside sit the ordered [`Snapshots`] with their weightings and the
//! [`SubNetwork`]s with their cycle matrices.
//!
//! [`ComponentKind`] maps each kind to its attribute names at compile time,
//! so checks never build field names from strings.
//!
//! ## Quick Start
//!
//! ```rust
//! use lopf_core::*;
//!
//! let mut network = Network::new(Snapshots::hourly(2));
//! network.buses.push(Bus::new("north"));
//! network.generators.push(
//!     Generator::new("wind", "north")
//!         .with_carrier("wind")
//!         .with_p_nom(0.0, 100.0),
//! );
//!
//! let dispatch = TimePanel::from_columns([("wind", vec![40.0, 55.0])])?;
//! network.set_series(ComponentKind::Generator, fields::P, dispatch)?;
//!
//! let p = network
//!     .panel(ComponentKind::Generator, fields::P)
//!     .and_then(|panel| panel.values("wind").transpose())
//!     .transpose()?;
//! assert_eq!(p, Some(vec![40.0, 55.0]));
//! # Ok::<(), LopfError>(())
//! ```
//!
//! ## Modules
//!
//! - [`components`] - typed static rows and the [`Component`] accessor trait
//! - [`kind`] - component kinds, dispatch conventions, field names
//! - [`panel`] - time panels on polars frames
//! - [`snapshots`] - snapshot weightings and energy conversion
//! - [`topology`] - sub-networks and cycle bases
//! - [`diagnostics`] - non-fatal findings collected during an audit

pub mod components;
pub mod diagnostics;
pub mod error;
pub mod kind;
pub mod network;
pub mod panel;
pub mod snapshots;
pub mod topology;

pub use components::{
    Bus, Capacity, Component, Generator, Line, Link, StaticEntry, StorageUnit, Store,
    Transformer, AC,
};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{LopfError, LopfResult};
pub use kind::{fields, ComponentKind, DispatchConvention};
pub use network::{Network, NetworkSummary};
pub use panel::{PanelSet, TimePanel};
pub use snapshots::Snapshots;
pub use topology::{determine_sub_networks, SubNetwork};
