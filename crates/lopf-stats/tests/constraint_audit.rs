//! End-to-end audit of a small hand-solved network

use lopf_core::{
    determine_sub_networks, fields, Bus, ComponentKind, Generator, Line, Network, Snapshots,
    StorageUnit, Store, TimePanel,
};
use lopf_stats::{
    check_constraints, constraint_statistics, constraint_statistics_with, investment_cost,
    operational_cost, CheckConfig, CheckError, ConstraintSense,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Voltage angles per snapshot for buses a, b, c
const ANGLES: [[f64; 3]; 2] = [[0.0, -0.1, -0.25], [0.0, 0.05, -0.3]];

/// Triangle a-b-c over two snapshots, with flows that follow the angles:
/// a gas generator at a, a battery at b and a hydrogen tank at c.
fn create_triangle_network() -> Network {
    let mut network = Network::new(Snapshots::hourly(2));
    network.buses = vec![Bus::new("a"), Bus::new("b"), Bus::new("c")];
    network.lines = vec![
        Line::new("ab", "a", "b").with_s_nom(200.0, 200.0).with_impedance(0.01, 0.1),
        Line::new("bc", "b", "c").with_s_nom(200.0, 200.0).with_impedance(0.01, 0.2),
        Line::new("ac", "a", "c").with_s_nom(200.0, 200.0).with_impedance(0.01, 0.4),
    ];
    network.generators = vec![Generator {
        capital_cost: 3.0,
        ..Generator::new("gas", "a")
            .with_p_nom(50.0, 100.0)
            .with_marginal_cost(20.0)
    }];
    network.storage_units = vec![StorageUnit::new("battery", "b")
        .with_p_nom(10.0, 10.0)
        .with_initial_state(5.0)];
    network.stores = vec![Store::new("tank", "c")
        .with_e_nom(50.0, 50.0)
        .with_initial_energy(8.0)];

    let ends = [(0, 1), (1, 2), (0, 2)];
    let p0: Vec<Vec<f64>> = network
        .lines
        .iter()
        .zip(ends)
        .map(|(line, (i, j))| {
            ANGLES
                .iter()
                .map(|theta| (theta[i] - theta[j]) / line.x_pu_eff)
                .collect()
        })
        .collect();

    // Injection leaving each bus through its lines, in line order.
    let mut injection = vec![vec![0.0; 2]; 3];
    for (flows, (i, j)) in p0.iter().zip(ends) {
        for t in 0..2 {
            injection[i][t] += flows[t];
        }
        for t in 0..2 {
            injection[j][t] += -flows[t];
        }
    }

    let line_names = ["ab", "bc", "ac"];
    let p1: Vec<Vec<f64>> = p0
        .iter()
        .map(|flows| flows.iter().map(|f| -f).collect())
        .collect();
    network
        .set_series(
            ComponentKind::Line,
            fields::P0,
            TimePanel::from_columns(line_names.iter().copied().zip(p0)).unwrap(),
        )
        .unwrap();
    network
        .set_series(
            ComponentKind::Line,
            fields::P1,
            TimePanel::from_columns(line_names.iter().copied().zip(p1)).unwrap(),
        )
        .unwrap();
    network
        .set_bus_series(
            fields::P,
            TimePanel::from_columns(["a", "b", "c"].into_iter().zip(injection.clone())).unwrap(),
        )
        .unwrap();

    let series = [
        (ComponentKind::Generator, fields::P, "gas", injection[0].clone()),
        (ComponentKind::StorageUnit, fields::P, "battery", vec![-2.0, 1.0]),
        (ComponentKind::StorageUnit, fields::P_STORE, "battery", vec![2.0, 0.0]),
        (ComponentKind::StorageUnit, fields::P_DISPATCH, "battery", vec![0.0, 1.0]),
        (ComponentKind::StorageUnit, fields::STATE_OF_CHARGE, "battery", vec![7.0, 6.0]),
        (ComponentKind::Store, fields::P, "tank", vec![-2.0, -2.0]),
        (ComponentKind::Store, fields::E, "tank", vec![10.0, 12.0]),
    ];
    for (kind, field, entity, values) in series {
        network
            .set_series(kind, field, TimePanel::from_columns([(entity, values)]).unwrap())
            .unwrap();
    }

    network.sub_networks = determine_sub_networks(&network).unwrap();
    network
}

#[test]
fn test_consistent_network_passes() {
    init_tracing();
    let network = create_triangle_network();

    let stats = check_constraints(&network, 1e-6).expect("hand-solved network is feasible");
    let names: Vec<&str> = stats.rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Cycle Constr.",
            "SOC Balance Store",
            "SOC Balance StorageUnit",
            "Nodal Balance Constr.",
            "Generator Lower Limit",
            "Line Lower Limit",
            "StorageUnit Lower Limit",
            "Store Lower Limit",
            "Generator Upper Limit",
            "Line Upper Limit",
            "StorageUnit Upper Limit",
            "Store Upper Limit",
        ]
    );

    let cycles = stats.get("Cycle Constr.").unwrap();
    assert_eq!(cycles.stats.count, 2);
    assert_eq!(cycles.sense, ConstraintSense::Equality);
    assert_eq!(stats.get("Nodal Balance Constr.").unwrap().stats.count, 6);
    assert_eq!(
        stats.get("Line Upper Limit").unwrap().sense,
        ConstraintSense::Inequality
    );
    assert!(stats.diagnostics.is_empty(), "{}", stats.diagnostics);
}

#[test]
fn test_statistics_are_idempotent() {
    let network = create_triangle_network();
    let first = serde_json::to_string(&constraint_statistics(&network).unwrap()).unwrap();
    let second = serde_json::to_string(&constraint_statistics(&network).unwrap()).unwrap();
    assert_eq!(first, second);

    let sequential =
        constraint_statistics_with(&network, &CheckConfig::default().sequential()).unwrap();
    assert_eq!(first, serde_json::to_string(&sequential).unwrap());
}

#[test]
fn test_tampered_state_of_charge_is_reported() {
    init_tracing();
    let mut network = create_triangle_network();
    network
        .set_series(
            ComponentKind::StorageUnit,
            fields::STATE_OF_CHARGE,
            TimePanel::from_columns([("battery", vec![7.0, 6.5])]).unwrap(),
        )
        .unwrap();

    let Err(CheckError::Violation(violation)) = check_constraints(&network, 1e-3) else {
        panic!("expected a tolerance violation");
    };
    assert_eq!(violation.tolerance, 1e-3);
    assert_eq!(violation.violations.len(), 1);
    let row = &violation.violations[0];
    assert_eq!(row.name, "SOC Balance StorageUnit");
    assert_eq!(row.min, -0.5);
    assert_eq!(row.max, 0.0);
    assert!(violation.to_string().contains("tolerance of 0.001"));
}

#[test]
fn test_missing_decomposition_is_diagnosed_not_fatal() {
    let mut network = create_triangle_network();
    network
        .set_series(
            ComponentKind::StorageUnit,
            fields::P_STORE,
            TimePanel::default(),
        )
        .unwrap();

    let stats = check_constraints(&network, 1e-6).unwrap();
    assert!(stats.get("SOC Balance StorageUnit").is_none());
    assert_eq!(stats.diagnostics.issues_by_category("storage").count(), 1);
}

#[test]
fn test_costs_of_the_solved_network() {
    let network = create_triangle_network();

    // 50 MW of gas expansion at 3 per MW
    let investment = investment_cost(&network);
    assert_eq!(investment.total, 150.0);

    let operational = operational_cost(&network).unwrap();
    let gas_energy: f64 = (0..2)
        .map(|t| {
            let theta = ANGLES[t];
            (theta[0] - theta[1]) / 0.1 + (theta[0] - theta[2]) / 0.4
        })
        .sum();
    assert!((operational.total - 20.0 * gas_energy).abs() < 1e-9);
    assert_eq!(operational.commitment, 0.0);
}
