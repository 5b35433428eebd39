//! Cycle bases derived from line tables

use lopf_core::{determine_sub_networks, Bus, Line, Network, Snapshots};

/// Square a-b-c-d with a diagonal a-c and a pendant bus e
fn create_meshed_network() -> Network {
    let mut network = Network::new(Snapshots::hourly(1));
    network.buses = ["a", "b", "c", "d", "e"].into_iter().map(Bus::new).collect();
    network.lines = vec![
        Line::new("ab", "a", "b"),
        Line::new("cb", "c", "b"),
        Line::new("cd", "c", "d"),
        Line::new("da", "d", "a"),
        Line::new("ac", "a", "c"),
        Line::new("de", "d", "e"),
    ];
    network
}

fn angle(bus: &str) -> f64 {
    match bus {
        "a" => 0.0,
        "b" => -0.12,
        "c" => 0.31,
        "d" => -0.07,
        _ => 0.5,
    }
}

#[test]
fn test_mesh_has_independent_cycles() {
    let network = create_meshed_network();
    let subs = determine_sub_networks(&network).unwrap();
    assert_eq!(subs.len(), 1);
    // lines − buses + 1
    assert_eq!(subs[0].cycle_count(), 6 - 5 + 1);
    assert_eq!(subs[0].buses.len(), 5);
}

#[test]
fn test_every_cycle_sums_angle_differences_to_zero() {
    let network = create_meshed_network();
    let subs = determine_sub_networks(&network).unwrap();

    for members in subs[0].cycle_members() {
        assert!(members.len() >= 3);
        let sum: f64 = members
            .iter()
            .map(|(name, coefficient)| {
                let line = network.lines.iter().find(|l| l.name == *name).unwrap();
                coefficient * (angle(&line.bus0) - angle(&line.bus1))
            })
            .sum();
        assert!(sum.abs() < 1e-12, "cycle {members:?} sums to {sum}");
    }
}

#[test]
fn test_pendant_line_is_on_no_cycle() {
    let network = create_meshed_network();
    let subs = determine_sub_networks(&network).unwrap();
    assert!(subs[0]
        .cycle_members()
        .iter()
        .all(|members| members.iter().all(|(name, _)| *name != "de")));
}
