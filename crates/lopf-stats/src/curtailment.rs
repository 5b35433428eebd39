//! Curtailed share of variable renewable energy, per carrier.

use std::collections::BTreeMap;

use lopf_core::{fields, ComponentKind, LopfError, LopfResult, Network};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
struct EnergyTally {
    available: f64,
    used: f64,
}

/// Percentage of available energy that was not dispatched, by carrier.
///
/// Only generators with a column in the `p_max_pu` panel take part.
/// Available energy is `p_max_pu × p_nom_opt`, used energy the dispatch,
/// both summed over snapshots without weighting. A carrier with no
/// available energy maps to NaN.
pub fn curtailment(network: &Network) -> LopfResult<BTreeMap<String, f64>> {
    let mut result = BTreeMap::new();
    let Some(profiles) = network.panel(ComponentKind::Generator, fields::P_MAX_PU) else {
        debug!("no generator availability profiles, nothing curtailed");
        return Ok(result);
    };
    let dispatch = network.panel(ComponentKind::Generator, fields::P);
    let snapshots = &network.snapshots;

    let mut tallies: BTreeMap<&str, EnergyTally> = BTreeMap::new();
    for generator in &network.generators {
        let Some(profile) = profiles.values(&generator.name)? else {
            continue;
        };
        let p = dispatch
            .map(|panel| panel.values(&generator.name))
            .transpose()?
            .flatten()
            .ok_or_else(|| {
                LopfError::missing_column(ComponentKind::Generator.name(), fields::P, &generator.name)
            })?;

        snapshots.ensure_len(&generator.name, profile.len())?;
        snapshots.ensure_len(&generator.name, p.len())?;
        let tally = tallies.entry(generator.carrier.as_str()).or_default();
        tally.available += profile.iter().map(|pu| pu * generator.p_nom_opt).sum::<f64>();
        tally.used += p.iter().sum::<f64>();
    }

    for (carrier, tally) in tallies {
        let share = if tally.available == 0.0 {
            warn!(carrier, "no available energy, curtailment undefined");
            f64::NAN
        } else {
            round3((tally.available - tally.used) / tally.available * 100.0)
        };
        result.insert(carrier.to_string(), share);
    }
    Ok(result)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopf_core::{Generator, Snapshots, TimePanel};

    fn panel<const N: usize>(columns: [(&str, Vec<f64>); N]) -> TimePanel {
        TimePanel::from_columns(columns).unwrap()
    }

    fn network() -> Network {
        let mut network = Network::new(Snapshots::hourly(2));
        network.generators = vec![
            Generator::new("wind", "north")
                .with_carrier("wind")
                .with_p_nom(0.0, 100.0),
            Generator::new("solar", "south")
                .with_carrier("solar")
                .with_p_nom(0.0, 30.0),
            Generator::new("gas", "south")
                .with_carrier("gas")
                .with_p_nom(0.0, 500.0),
        ];
        network
    }

    #[test]
    fn test_curtailment_per_carrier() {
        let mut network = network();
        network
            .set_series(
                ComponentKind::Generator,
                fields::P_MAX_PU,
                panel([("wind", vec![0.5, 1.0]), ("solar", vec![0.0, 0.0])]),
            )
            .unwrap();
        network
            .set_series(
                ComponentKind::Generator,
                fields::P,
                panel([
                    ("wind", vec![40.0, 80.0]),
                    ("solar", vec![0.0, 0.0]),
                    ("gas", vec![100.0, 100.0]),
                ]),
            )
            .unwrap();

        let shares = curtailment(&network).unwrap();
        // 150 available, 120 used
        assert_eq!(shares["wind"], 20.0);
        assert!(shares["solar"].is_nan());
        assert!(!shares.contains_key("gas"));
    }

    #[test]
    fn test_weightings_are_ignored() {
        let mut network = network();
        network.snapshots = Snapshots::hourly(2).with_weightings(vec![1.0, 3.0]).unwrap();
        network
            .set_series(
                ComponentKind::Generator,
                fields::P_MAX_PU,
                panel([("wind", vec![1.0, 1.0])]),
            )
            .unwrap();
        network
            .set_series(ComponentKind::Generator, fields::P, panel([("wind", vec![100.0, 0.0])]))
            .unwrap();

        // available 200, used 100
        let shares = curtailment(&network).unwrap();
        assert_eq!(shares["wind"], 50.0);
    }

    #[test]
    fn test_rounding() {
        let mut network = network();
        network.snapshots = Snapshots::hourly(3);
        network
            .set_series(
                ComponentKind::Generator,
                fields::P_MAX_PU,
                panel([("wind", vec![1.0, 1.0, 1.0])]),
            )
            .unwrap();
        network
            .set_series(
                ComponentKind::Generator,
                fields::P,
                panel([("wind", vec![100.0, 0.0, 0.0])]),
            )
            .unwrap();

        // two thirds curtailed
        let shares = curtailment(&network).unwrap();
        assert_eq!(shares["wind"], 66.667);
    }

    #[test]
    fn test_round3_ties_to_even() {
        // exact binary ties at the third decimal
        assert_eq!(round3(12.0625), 12.062);
        assert_eq!(round3(12.1875), 12.188);
        assert_eq!(round3(-12.0625), -12.062);
        assert_eq!(round3(12.25), 12.25);
    }

    #[test]
    fn test_missing_dispatch_is_an_error() {
        let mut network = network();
        network
            .set_series(
                ComponentKind::Generator,
                fields::P_MAX_PU,
                panel([("wind", vec![1.0, 1.0])]),
            )
            .unwrap();
        assert!(matches!(
            curtailment(&network),
            Err(LopfError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_no_profiles_yields_empty_map() {
        assert!(curtailment(&network()).unwrap().is_empty());
    }
}
