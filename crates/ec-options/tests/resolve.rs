//! Resolving raw option maps.

use ec_options::{
    CurrentCollector, OptionError, OptionValue, Options, RawOptions, SeiMechanism, SideReaction,
    SurfaceForm,
};
use proptest::prelude::*;

#[test]
fn minimal_sei_options() {
    let raw = RawOptions::new()
        .with("SEI", "reaction limited")
        .with("SEI on cracks", false)
        .with("current collector", "uniform")
        .with("side reactions", OptionValue::List(Vec::new()));
    let options = Options::resolve(&raw).unwrap();
    assert_eq!(options.sei(), SeiMechanism::ReactionLimited);
    assert_eq!(options.current_collector(), CurrentCollector::Uniform);
    assert!(options.side_reactions().is_empty());
}

#[test]
fn false_is_accepted_for_surface_form_and_convection() {
    let raw = RawOptions::new()
        .with("surface form", false)
        .with("convection", false);
    let options = Options::resolve(&raw).unwrap();
    assert_eq!(options.surface_form(), SurfaceForm::False);
}

#[test]
fn unknown_key_is_rejected() {
    let raw = RawOptions::new().with("thermal", "lumped");
    assert!(matches!(
        Options::resolve(&raw),
        Err(OptionError::UnknownOption { key }) if key == "thermal"
    ));
}

#[test]
fn unsupported_dimensionality_fails_at_construction() {
    let raw = RawOptions::new()
        .with("current collector", "potential pair")
        .with("dimensionality", 3_i64);
    assert!(matches!(
        Options::resolve(&raw),
        Err(OptionError::InvalidValue {
            option: "dimensionality",
            ..
        })
    ));
}

#[test]
fn cracks_without_sei_is_incompatible() {
    let raw = RawOptions::new()
        .with("SEI", "none")
        .with("SEI on cracks", true)
        .with("dimensionality", 3_i64);
    assert!(matches!(
        Options::resolve(&raw),
        Err(OptionError::InvalidValue { .. })
    ));

    let raw = RawOptions::new()
        .with("SEI", "none")
        .with("SEI on cracks", true);
    assert!(matches!(
        Options::resolve(&raw),
        Err(OptionError::Incompatible { .. })
    ));
}

#[test]
fn to_raw_resolves_to_the_same_options() {
    let options = Options::builder()
        .sei(SeiMechanism::SolventDiffusionLimited)
        .sei_on_cracks(true)
        .current_collector(CurrentCollector::PotentialPairQuiteConductive)
        .dimensionality(1)
        .side_reaction(SideReaction::Oxygen)
        .surface_form(SurfaceForm::Differential)
        .build()
        .unwrap();
    assert_eq!(Options::resolve(&options.to_raw()).unwrap(), options);
}

#[test]
fn load_yaml_reads_file() {
    let dir = std::env::temp_dir().join(format!("ec-options-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("options.yaml");
    std::fs::write(&path, "SEI: ec reaction limited\nSEI on cracks: true\n").unwrap();
    let options = ec_options::load_yaml(&path).unwrap();
    assert_eq!(options.sei(), SeiMechanism::EcReactionLimited);
    assert!(options.sei_on_cracks());
    std::fs::remove_dir_all(&dir).unwrap();
}

fn raw_options() -> impl Strategy<Value = RawOptions> {
    (
        prop::sample::select(SeiMechanism::ALL),
        any::<bool>(),
        prop::sample::select(CurrentCollector::ALL),
        0_i64..4,
        prop::sample::select(SurfaceForm::ALL),
        any::<bool>(),
    )
        .prop_map(|(sei, cracks, cc, dim, form, oxygen)| {
            let reactions = if oxygen { vec!["oxygen".to_string()] } else { Vec::new() };
            RawOptions::new()
                .with("SEI", sei.as_str())
                .with("SEI on cracks", cracks)
                .with("current collector", cc.as_str())
                .with("dimensionality", dim)
                .with("surface form", form.as_str())
                .with("side reactions", reactions)
        })
}

proptest! {
    #[test]
    fn resolution_is_deterministic(raw in raw_options()) {
        let first = Options::resolve(&raw);
        let second = Options::resolve(&raw);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "resolution changed outcome"),
        }
    }

    #[test]
    fn illegal_combinations_are_option_errors(raw in raw_options()) {
        let cracks = raw.get("SEI on cracks") == Some(&OptionValue::Bool(true));
        let no_sei = raw.get("SEI") == Some(&OptionValue::Str("none".into()));
        if cracks && no_sei {
            let resolved = Options::resolve(&raw);
            prop_assert!(resolved.is_err(), "{:?}", resolved);
            let legal_dimension = matches!(raw.get("dimensionality"), Some(OptionValue::Int(0..=2)));
            let incompatible = matches!(resolved, Err(OptionError::Incompatible { .. }));
            if legal_dimension {
                prop_assert!(incompatible, "{:?}", resolved);
            }
        }
    }
}
