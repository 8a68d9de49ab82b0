use elecalc::frequency::{angular, Frequency};
use elecalc::impedance::{gamma_from_vswr, vswr, Impedance};
use elecalc::matching::response::{input_impedance, sweep};
use elecalc::matching::{min_q, synthesize, MatchingConfigBuilder, NetworkKind, Topology};
use elecalc::prelude::*;
use elecalc::smith::impedance_path;
use elecalc::util::comp_rel;

#[test]
fn test_l_network_step_up() {
    let config = MatchingConfigBuilder::new()
        .source(Impedance::resistive(50.0))
        .load(Impedance::new(100.0, 50.0))
        .freq(100e6)
        .network(NetworkKind::L)
        .topology(Topology::LowPass)
        .build();
    let result = synthesize(&config).unwrap();

    assert_eq!(2, result.components.len());
    let series = &result.components[0];
    let shunt = &result.components[1];
    assert_eq!(ElemType::Inductor, series.kind());
    assert_eq!(Placement::Series, series.placement());
    assert_eq!(ElemType::Capacitor, shunt.kind());
    assert_eq!(Placement::Shunt, shunt.placement());
    for comp in result.components.iter() {
        assert!(comp.value().is_finite() && comp.value() > 0.0, "{}", comp);
        assert!(!comp.modified());
    }
    assert_eq!("Series inductor (source side)", series.label());

    // Btot = sqrt(0.008/50 - 0.008²), series X = Btot / (G/r)
    let btot = (0.008_f64 / 50.0 - 0.008 * 0.008).sqrt();
    comp_rel(&(btot * 50.0 / 0.008), &series.reactance(), 1e-9, "series reactance");
    comp_rel(&((btot + 0.004) / angular(100e6)), &shunt.value(), 1e-9, "shunt capacitance");

    comp_rel(&50.0, &result.input_impedance.r, 1e-9, "input_impedance.r");
    assert!(result.input_impedance.x.abs() < 1e-6);
    comp_rel(&1.0, &result.min_q, 1e-12, "min_q");
}

#[test]
fn test_l_network_conjugate_ports() {
    let config = MatchingConfigBuilder::new()
        .source(Impedance::new(50.0, 20.0))
        .load(Impedance::new(50.0, -20.0))
        .build();
    let result = synthesize(&config).unwrap();
    assert!(result.components.is_empty());

    let config = MatchingConfigBuilder::new()
        .source(Impedance::new(50.0, 20.0))
        .load(Impedance::new(50.0, 10.0))
        .build();
    let result = synthesize(&config).unwrap();
    assert_eq!(1, result.components.len());
    comp_rel(&-30.0, &result.components[0].reactance(), 1e-12, "cancelling reactance");
    assert_eq!(ElemType::Capacitor, result.components[0].kind());
}

#[test]
fn test_pi_t_insufficient_q() {
    for network in [NetworkKind::Pi, NetworkKind::T] {
        let config = MatchingConfigBuilder::new()
            .source(Impedance::resistive(50.0))
            .load(Impedance::resistive(10.0))
            .network(network)
            .q(1.5)
            .build();
        let report: Report<_> = synthesize(&config).into();
        assert!(!report.is_ready());
        assert!(
            report.message().unwrap().starts_with("Q must be at least 2.000"),
            "{:?}",
            report.message()
        );
    }
}

#[test]
fn test_pi_t_conjugate_match() {
    for network in [NetworkKind::Pi, NetworkKind::T] {
        for topology in [Topology::LowPass, Topology::HighPass] {
            let source = Impedance::new(25.0, 10.0);
            let load = Impedance::new(120.0, -40.0);
            let config = MatchingConfigBuilder::new()
                .source(source)
                .load(load)
                .freq(433e6)
                .network(network)
                .topology(topology)
                .build();
            let result = synthesize(&config).unwrap();

            assert_eq!(3, result.components.len());
            let zin = input_impedance(&result.components, load, angular(433e6));
            comp_rel(&25.0, &zin.re, 1e-9, "zin.re");
            assert!((zin.im + 10.0).abs() < 1e-6, "{} {} zin.im {}", network, topology, zin.im);
        }
    }
}

#[test]
fn test_conjugate_match_grid() {
    let resistances = [10.0, 25.0, 50.0, 75.0, 200.0, 1000.0];
    let source_x = [-30.0, 0.0, 40.0];
    let load_x = [-50.0, 0.0, 25.0];
    let w = angular(100e6);
    let (mut matched, mut degenerate) = (0, 0);

    for rs in resistances {
        for rl in resistances {
            let qmin = min_q(rs, rl);
            for xs in source_x {
                for xl in load_x {
                    for network in [NetworkKind::L, NetworkKind::Pi, NetworkKind::T] {
                        for topology in [Topology::LowPass, Topology::HighPass] {
                            for q in [None, Some(qmin), Some(qmin + 0.7)] {
                                let source = Impedance::new(rs, xs);
                                let load = Impedance::new(rl, xl);
                                let mut builder = MatchingConfigBuilder::new()
                                    .source(source)
                                    .load(load)
                                    .network(network)
                                    .topology(topology);
                                if let Some(q) = q {
                                    builder = builder.q(q);
                                }
                                let case = format!("{} {} {} -> {} q={:?}", network, topology, source, load, q);

                                match synthesize(&builder.build()) {
                                    Ok(result) => {
                                        let target = source.z().conj();
                                        let zin = input_impedance(&result.components, load, w);
                                        let tol = 1e-7 * target.norm().max(load.z().norm());
                                        assert!((zin - target).norm() <= tol, "{}: zin {}", case, zin);
                                        assert!(result.components.len() <= 3, "{}", case);
                                        for comp in result.components.iter() {
                                            assert!(comp.value().is_finite() && comp.value() > 0.0, "{}: {}", case, comp);
                                        }
                                        matched += 1;
                                    }
                                    Err(CalcError::DegenerateElement { .. }) => degenerate += 1,
                                    Err(err) => panic!("{}: {}", case, err),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    assert!(degenerate * 100 < matched, "{} degenerate of {}", degenerate, matched + degenerate);
}

#[test]
fn test_vswr_round_trip() {
    for gamma in [0.0, 0.05, 0.2, 0.5, 0.9, 0.999] {
        comp_rel(&gamma, &gamma_from_vswr(vswr(gamma)), 1e-12, "gamma round trip");
    }
    for v in [1.0, 1.5, 2.0, 10.0] {
        comp_rel(&v, &vswr(gamma_from_vswr(v)), 1e-12, "vswr round trip");
    }
    assert!(vswr(1.0).is_infinite());
}

#[test]
fn test_sweep_and_smith_path() {
    let config = MatchingConfigBuilder::new()
        .source(Impedance::resistive(50.0))
        .load(Impedance::new(100.0, 50.0))
        .freq(100e6)
        .build();
    let result = synthesize(&config).unwrap();

    let freq = Frequency::from_center_span(100e6, 20e6, 21).unwrap();
    let points = sweep(&config, &result, &freq).unwrap();
    assert_eq!(21, points.len());
    assert_eq!(100e6, points[10].freq);
    assert!(points[10].gamma < 1e-9);
    assert!(points[0].gamma > points[10].gamma);
    assert!(points[20].gamma > points[10].gamma);
    assert!(points[0].vswr > 1.0);

    let path = impedance_path(&result.components, config.load, angular(100e6), 50.0).unwrap();
    assert_eq!(3, path.len());
    // ends at the centre of the chart
    assert!(path[2].magnitude() < 1e-9);
}
