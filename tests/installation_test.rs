use elecalc::cable::Insulation;
use elecalc::fuse::Conductor;
use elecalc::prelude::*;
use elecalc::protection::Circuit;
use elecalc::util::comp_rel;

#[test]
fn test_three_phase_balance() {
    let config = BalanceConfig {
        currents: [400.0, 425.0, 370.0],
        ..BalanceConfig::default()
    };
    let report = run(&config, check_balance);
    let result = report.result().unwrap();

    assert_eq!("398.33", format!("{:.2}", result.average));
    assert_eq!("26.67", format!("{:.2}", result.max_deviation));
    assert_eq!("6.70", format!("{:.2}", result.unbalance_percent));
    assert!(result.compliant);
}

#[test]
fn test_balance_limit_exceeded() {
    let config = BalanceConfig {
        currents: [100.0, 60.0, 50.0],
        limit: 10.0,
    };
    let result = check_balance(&config).unwrap();
    // average 70, deviation 30
    comp_rel(&(30.0 / 70.0 * 100.0), &result.unbalance_percent, 1e-12, "unbalance_percent");
    assert!(!result.compliant);
}

#[test]
fn test_power_factor_correction() {
    let config: PfcConfig = serde_json::from_str(r#"{ "active_power": 100.0, "existing_pf": 0.8, "target_pf": 0.95 }"#).unwrap();
    let result = correct_power_factor(&config).unwrap();
    comp_rel(&42.13, &result.required_kvar, 1e-3, "required_kvar");
    assert!(result.reactive_after < result.reactive_before);

    let report = run(
        &PfcConfig {
            target_pf: 1.5,
            ..PfcConfig::default()
        },
        correct_power_factor,
    );
    assert_eq!(
        Some("Invalid input for target power factor: must be greater than 0 and at most 1"),
        report.message()
    );
}

#[test]
fn test_protection_with_loop_impedance() {
    let config = ProtectionConfigBuilder::new()
        .design_current(18.0)
        .cable_capacity(27.0)
        .device(Device::McbB)
        .circuit(Circuit {
            ze: 0.8,
            line_size: 2.5,
            cpc_size: Some(1.5),
            length: 25.0,
            insulation: Insulation::Pvc,
        })
        .build();
    let result = check_protection(&config).unwrap();

    assert_eq!(20.0, result.rating);
    comp_rel(&(0.95 * 230.0 / 100.0), &result.zs_max, 1e-12, "zs_max");
    // 0.8 + 19.51 · 0.025 · 1.2
    comp_rel(&1.3853, &result.zs_actual.unwrap(), 1e-12, "zs_actual");
    assert_eq!(Some(true), result.disconnection_ok);
    assert!(result.compliant);
}

#[test]
fn test_fuse_operation() {
    let result = check_fuse(&FuseConfig {
        rating: 63.0,
        current: 520.0,
        conductor: Some(Conductor {
            size: 16.0,
            insulation: Insulation::Pvc,
        }),
    })
    .unwrap();
    comp_rel(&0.4, &result.operation.time().unwrap(), 1e-9, "operating time");
    assert_eq!(Some(true), result.conductor_protected);

    let result = check_fuse(&FuseConfig {
        rating: 63.0,
        current: 70.0,
        conductor: None,
    })
    .unwrap();
    assert_eq!(FuseOperation::NoOperation, result.operation);
    assert_eq!("does not operate", result.operation.to_string());
}

#[test]
fn test_lighting_density() {
    let config = LightingConfig {
        area: 50.0,
        groups: vec![LuminaireGroup { count: 10, watts: 36.0 }],
        space: SpaceType::Classroom,
        ..LightingConfig::default()
    };
    let result = lighting_density(&config).unwrap();
    comp_rel(&7.2, &result.lpd, 1e-12, "lpd");
    assert_eq!(7.64, result.allowance);
    assert!(result.compliant);
}

#[test]
fn test_history_export() {
    let mut history = MemoryHistory::new();

    let balance = BalanceConfig {
        currents: [400.0, 425.0, 370.0],
        ..BalanceConfig::default()
    };
    let report = run(&balance, check_balance);
    history.save_calculation("balance", &balance, &report).unwrap();

    let lighting = LightingConfig::default();
    let report = run(&lighting, lighting_density);
    history.save_calculation("lighting", &lighting, &report).unwrap();

    assert_eq!(2, history.len());
    let records: Vec<ExportRecord> = serde_json::from_str(&history.export().unwrap()).unwrap();
    assert_eq!("balance", records[0].calculator);
    assert!(records[1].results.get("failed").is_some());

    let single = prepare_export_data("balance", &balance, &history.records()[0].results).unwrap();
    assert_eq!(history.records()[0], single);
}
