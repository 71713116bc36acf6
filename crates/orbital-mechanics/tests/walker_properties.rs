//! Walker Delta generator properties

use fuzz_harness::prelude::*;
use orbital_mechanics::{
    orbital_period_minutes, ConstellationGenerator, GeneratorConfig, OrbitalError,
    OverflowPolicy, ValidationError, WalkerDelta,
};

fn generator() -> ConstellationGenerator {
    ConstellationGenerator::new(GeneratorConfig::new(OverflowPolicy::Strict))
}

proptest! {
    #![proptest_config(FuzzConfig::from_env().to_proptest_config())]

    #[test]
    fn every_slot_is_generated_once(shape in walker_shape(), base in orbital_elements(), epoch in epoch()) {
        let (t, p, f) = shape;
        let walker = WalkerDelta::new(base.clone(), t, p, f, epoch);
        let constellation = generator().generate(&walker).unwrap();

        prop_assert_eq!(constellation.members.len(), t as usize);
        let per_plane = t / p;
        for (i, member) in constellation.members.iter().enumerate() {
            let i = i as u32;
            prop_assert_eq!(member.plane, i / per_plane);
            prop_assert_eq!(member.slot, i % per_plane);
            prop_assert_eq!(&member.name, &format!("P{}_S{}", member.plane, member.slot));
            prop_assert_eq!(member.element_set.satellite_number(), Some(base.satellite_number + i));
        }
        prop_assert!((constellation.period_minutes - orbital_period_minutes(base.semi_major_axis_km)).abs() < 1e-9);
    }

    #[test]
    fn members_share_shape_and_epoch(shape in walker_shape(), base in orbital_elements(), epoch in epoch()) {
        let (t, p, f) = shape;
        let walker = WalkerDelta::new(base.clone(), t, p, f, epoch);
        for member in walker.members().unwrap() {
            prop_assert_eq!(member.elements.epoch, epoch);
            prop_assert_eq!(member.elements.semi_major_axis_km, base.semi_major_axis_km);
            prop_assert_eq!(member.elements.eccentricity, base.eccentricity);
            prop_assert_eq!(member.elements.inclination_deg, base.inclination_deg);
            prop_assert_eq!(member.elements.arg_perigee_deg, base.arg_perigee_deg);
            prop_assert!((0.0..360.0).contains(&member.elements.raan_deg));
            prop_assert!((0.0..360.0).contains(&member.elements.mean_anomaly_deg));
        }
    }

    #[test]
    fn parallel_and_sequential_agree(shape in walker_shape(), base in orbital_elements(), epoch in epoch()) {
        let (t, p, f) = shape;
        let walker = WalkerDelta::new(base, t, p, f, epoch);
        let sequential = ConstellationGenerator::new(
            GeneratorConfig::new(OverflowPolicy::Strict).sequential(),
        );
        prop_assert_eq!(
            generator().generate(&walker).unwrap().members,
            sequential.generate(&walker).unwrap().members
        );
    }

    #[test]
    fn uneven_shapes_are_rejected(planes in 2u32..=20, per_plane in 1u32..=20, extra in 1u32..20, base in orbital_elements(), epoch in epoch()) {
        let extra = extra % planes;
        prop_assume!(extra != 0);
        let walker = WalkerDelta::new(base, planes * per_plane + extra, planes, 1, epoch);

        let mut out = Vec::new();
        let err = generator().generate_into(&walker, &mut out).unwrap_err();
        let uneven = matches!(err, OrbitalError::Validation(ValidationError::UnevenPlanes { .. }));
        prop_assert!(uneven);
        prop_assert!(out.is_empty());
    }
}
