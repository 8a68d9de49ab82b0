use crate::error::CalcError;
use crate::matching::{equal_resistance, min_q, nearly_equal, partial_q, Design, Synthesis, DEFAULT_Q};

/// Half of a T: series arm at a port of resistance `r` feeding a shunt arm
/// up to the virtual resistance `rv`.
///
/// Returns (total series reactance, shunt susceptance, partial Q).
fn half_section(r: f64, rv: f64, sign: f64) -> (f64, f64, f64) {
    let q = partial_q(rv / r);
    (sign * r * q, sign * q / rv, q)
}

/// Three-element T network: series at source, shunt, series at load.
/// Built as two L sections meeting at `rv = min(rs, rl) · (Q² + 1)`.
pub(crate) fn synthesize(design: &Design, q: Option<f64>) -> Result<Synthesis, CalcError> {
    let min_q = min_q(design.rs, design.rl);
    if q == Some(0.0) && nearly_equal(design.rs, design.rl) {
        return equal_resistance(design);
    }
    let q = q.unwrap_or_else(|| DEFAULT_Q.max(min_q + 1.0));
    if q < min_q {
        return Err(CalcError::InsufficientQ { min_q, q });
    }

    let sign = design.topology.sign();
    let rv = design.rmin() * (q * q + 1.0);
    let (xt1, b1, q1) = half_section(design.rs, rv, sign);
    let (xt2, b2, q2) = half_section(design.rl, rv, sign);
    tracing::debug!(rv, q1, q2, "T network sections");

    // At Q == min Q the side at rmax has q = 0 and only an L remains
    let components = [
        design.section_series(xt1 - design.xs, q1, "source side")?,
        Some(design.shunt(b1 + b2, "middle")?),
        design.section_series(xt2 - design.xl, q2, "load side")?,
    ];

    Ok(Synthesis {
        components: components.into_iter().flatten().collect(),
        calculated_q: q1.max(q2),
    })
}

#[cfg(test)]
mod tnet_tests {
    use super::*;
    use crate::element::{ElemType, Placement};
    use crate::frequency::angular;
    use crate::impedance::Impedance;
    use crate::matching::response::input_impedance;
    use crate::matching::Topology;
    use crate::util::comp_rel;

    fn design(zs: Impedance, zl: Impedance, topology: Topology) -> Design {
        Design {
            rs: zs.r,
            xs: zs.x,
            rl: zl.r,
            xl: zl.x,
            w: angular(2.4e9),
            topology,
        }
    }

    #[test]
    fn tnet_resistive() {
        let d = design(Impedance::resistive(50.0), Impedance::resistive(10.0), Topology::HighPass);
        let syn = synthesize(&d, Some(4.0)).unwrap();

        assert_eq!(3, syn.components.len());
        assert_eq!(Placement::Series, syn.components[0].placement());
        assert_eq!(ElemType::Capacitor, syn.components[0].kind());
        assert_eq!(Placement::Shunt, syn.components[1].placement());
        assert_eq!(ElemType::Inductor, syn.components[1].kind());
        assert_eq!(ElemType::Capacitor, syn.components[2].kind());

        // rv = 10 · 17 = 170, load side q = 4
        comp_rel(&4.0, &syn.calculated_q, 1e-12, "calculated_q");
        comp_rel(&-40.0, &syn.components[2].reactance(), 1e-12, "load series");

        let zin = input_impedance(&syn.components, d.load(), d.w);
        comp_rel(&50.0, &zin.re, 1e-9, "zin.re");
        assert!(zin.im.abs() < 1e-6);
    }

    #[test]
    fn tnet_complex_ports() {
        for topology in [Topology::LowPass, Topology::HighPass] {
            let d = design(Impedance::new(12.0, -8.0), Impedance::new(75.0, 30.0), topology);
            let syn = synthesize(&d, Some(6.0)).unwrap();

            let zin = input_impedance(&syn.components, d.load(), d.w);
            comp_rel(&12.0, &zin.re, 1e-9, "zin.re");
            assert!((zin.im - 8.0).abs() < 1e-6, "zin.im {}", zin.im);
        }
    }

    #[test]
    fn tnet_insufficient_q() {
        let d = design(Impedance::resistive(50.0), Impedance::resistive(10.0), Topology::LowPass);
        match synthesize(&d, Some(1.5)) {
            Err(CalcError::InsufficientQ { min_q, .. }) => comp_rel(&2.0, &min_q, 1e-12, "min_q"),
            _ => panic!("Q below minimum accepted"),
        }
    }

    #[test]
    fn tnet_at_min_q() {
        for (rs, rl) in [(50.0, 200.0), (10.0, 50.0), (200.0, 50.0)] {
            let d = design(Impedance::resistive(rs), Impedance::resistive(rl), Topology::HighPass);
            let syn = synthesize(&d, Some(min_q(rs, rl))).unwrap();

            assert_eq!(2, syn.components.len(), "{} -> {}", rs, rl);
            assert!(syn.components.iter().any(|c| c.position() == "middle"));
            comp_rel(&min_q(rs, rl), &syn.calculated_q, 1e-9, "calculated_q");

            let zin = input_impedance(&syn.components, d.load(), d.w);
            comp_rel(&rs, &zin.re, 1e-9, "zin.re");
            assert!(zin.im.abs() < 1e-6, "zin.im {}", zin.im);
        }
    }

    #[test]
    fn tnet_min_q_keeps_cancelling_arm() {
        // The 200 ohm side needs no transformation but its 30 ohm still has to go
        let d = design(Impedance::resistive(50.0), Impedance::new(200.0, 30.0), Topology::LowPass);
        let syn = synthesize(&d, Some(min_q(50.0, 200.0))).unwrap();

        assert_eq!(3, syn.components.len());
        assert_eq!("load side", syn.components[2].position());
        comp_rel(&-30.0, &syn.components[2].reactance(), 1e-9, "load side reactance");
        let zin = input_impedance(&syn.components, d.load(), d.w);
        comp_rel(&50.0, &zin.re, 1e-9, "zin.re");
        assert!(zin.im.abs() < 1e-6, "zin.im {}", zin.im);
    }

    #[test]
    fn tnet_degenerate_series() {
        // Source reactance cancels the source side series arm exactly
        let d = design(Impedance::new(50.0, 50.0 * 2.4_f64.sqrt()), Impedance::resistive(10.0), Topology::LowPass);
        match synthesize(&d, Some(4.0)) {
            Err(CalcError::DegenerateElement { position }) => assert_eq!("source side", position),
            other => panic!("expected degenerate element, got {:?}", other),
        }
    }
}
