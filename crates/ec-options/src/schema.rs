//! Option types and the validated [`Options`] structure.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{OptionError, OptionResult};
use crate::raw::{OptionValue, RawOptions};
use crate::validate;

/// Declare a string-valued option enum with `FromStr`/`Display` over the
/// human-readable option strings.
macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($key:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Key of this option in a raw options map.
            pub const KEY: &'static str = $key;
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl core::str::FromStr for $name {
            type Err = OptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| OptionError::InvalidValue {
                        option: $key,
                        value: s.to_string(),
                        expected: expected_list(Self::ALL.iter().map(|v| v.as_str())),
                    })
            }
        }
    };
}

pub(crate) fn expected_list<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

option_enum! {
    /// SEI growth mechanism.
    #[derive(Default)]
    pub enum SeiMechanism ("SEI") {
        #[default]
        None => "none",
        ReactionLimited => "reaction limited",
        ElectronMigrationLimited => "electron-migration limited",
        InterstitialDiffusionLimited => "interstitial-diffusion limited",
        SolventDiffusionLimited => "solvent-diffusion limited",
        EcReactionLimited => "ec reaction limited",
    }
}

option_enum! {
    #[derive(Default)]
    pub enum CurrentCollector ("current collector") {
        #[default]
        Uniform => "uniform",
        PotentialPair => "potential pair",
        PotentialPairQuiteConductive => "potential pair quite conductive",
        PotentialPairQuiteConductiveAveraged => "potential pair quite conductive averaged",
    }
}

impl CurrentCollector {
    /// True when the collector is resolved in space (needs dimensionality 1 or 2).
    pub fn is_spatially_resolved(self) -> bool {
        matches!(
            self,
            CurrentCollector::PotentialPair | CurrentCollector::PotentialPairQuiteConductive
        )
    }
}

option_enum! {
    /// Interfacial kinetics law.
    #[derive(Default)]
    pub enum Kinetics ("kinetics") {
        #[default]
        SymmetricButlerVolmer => "symmetric Butler-Volmer",
        AsymmetricButlerVolmer => "asymmetric Butler-Volmer",
    }
}

option_enum! {
    /// Whether the surface potential difference is a state, and of which kind.
    #[derive(Default)]
    pub enum SurfaceForm ("surface form") {
        #[default]
        False => "false",
        Differential => "differential",
        Algebraic => "algebraic",
    }
}

option_enum! {
    pub enum SideReaction ("side reactions") {
        Oxygen => "oxygen",
    }
}

option_enum! {
    #[derive(Default)]
    pub enum Convection ("convection") {
        #[default]
        None => "none",
        UniformTransverse => "uniform transverse",
        FullTransverse => "full transverse",
    }
}

option_enum! {
    /// Order of the asymptotic electrolyte diffusion approximation used by
    /// higher-order lead-acid models.
    #[derive(Default)]
    pub enum DiffusionOrder ("diffusion order") {
        FirstOrder => "first order",
        FirstOrderAverageCorrection => "first order average correction",
        #[default]
        Composite => "composite",
        CompositeExtendedDistributed => "composite extended distributed",
        CompositeExtendedAveraged => "composite extended averaged",
    }
}

impl DiffusionOrder {
    /// First-order quasi-static variants (no full porosity submodel).
    pub fn is_first_order(self) -> bool {
        matches!(
            self,
            DiffusionOrder::FirstOrder | DiffusionOrder::FirstOrderAverageCorrection
        )
    }
}

/// Number of spatial dimensions of the current collector: 0, 1 or 2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Dimensionality(u8);

impl Dimensionality {
    pub const KEY: &'static str = "dimensionality";

    pub fn new(value: i64) -> OptionResult<Self> {
        match value {
            0..=2 => Ok(Self(value as u8)),
            _ => Err(OptionError::InvalidValue {
                option: Self::KEY,
                value: value.to_string(),
                expected: "0, 1, 2".to_string(),
            }),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Validated, immutable model options.
///
/// Built either from a raw string-keyed map with [`Options::resolve`] or in
/// code with [`Options::builder`]. Both paths run the same legality checks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Options {
    #[serde(rename = "SEI")]
    sei: SeiMechanism,
    #[serde(rename = "SEI on cracks")]
    sei_on_cracks: bool,
    #[serde(rename = "current collector")]
    current_collector: CurrentCollector,
    dimensionality: Dimensionality,
    kinetics: Kinetics,
    #[serde(rename = "surface form")]
    surface_form: SurfaceForm,
    #[serde(rename = "side reactions")]
    side_reactions: BTreeSet<SideReaction>,
    convection: Convection,
    #[serde(rename = "diffusion order")]
    diffusion_order: DiffusionOrder,
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Resolve a raw options map: parse every key, fill defaults, then check
    /// the combination.
    pub fn resolve(raw: &RawOptions) -> OptionResult<Options> {
        let mut builder = Options::builder();
        for (key, value) in raw.iter() {
            builder = match key {
                SeiMechanism::KEY => builder.sei(value.parse_as(SeiMechanism::KEY)?),
                "SEI on cracks" => builder.sei_on_cracks(value.as_flag("SEI on cracks")?),
                CurrentCollector::KEY => {
                    builder.current_collector(value.parse_as(CurrentCollector::KEY)?)
                }
                Dimensionality::KEY => builder.dimensionality(value.as_int(Dimensionality::KEY)?),
                Kinetics::KEY => builder.kinetics(value.parse_as(Kinetics::KEY)?),
                SurfaceForm::KEY => match value {
                    OptionValue::Bool(false) => builder.surface_form(SurfaceForm::False),
                    _ => builder.surface_form(value.parse_as(SurfaceForm::KEY)?),
                },
                SideReaction::KEY => {
                    let mut b = builder;
                    for item in value.as_list(SideReaction::KEY)? {
                        b = b.side_reaction(item.parse()?);
                    }
                    b
                }
                Convection::KEY => match value {
                    OptionValue::Bool(false) => builder.convection(Convection::None),
                    _ => builder.convection(value.parse_as(Convection::KEY)?),
                },
                DiffusionOrder::KEY => builder.diffusion_order(value.parse_as(DiffusionOrder::KEY)?),
                other => {
                    return Err(OptionError::UnknownOption {
                        key: other.to_string(),
                    });
                }
            };
        }
        builder.build()
    }

    /// The full option set, defaults included, as a raw map.
    pub fn to_raw(&self) -> RawOptions {
        let mut raw = RawOptions::new();
        raw.insert(SeiMechanism::KEY, self.sei.as_str());
        raw.insert("SEI on cracks", self.sei_on_cracks);
        raw.insert(CurrentCollector::KEY, self.current_collector.as_str());
        raw.insert(Dimensionality::KEY, i64::from(self.dimensionality.get()));
        raw.insert(Kinetics::KEY, self.kinetics.as_str());
        raw.insert(SurfaceForm::KEY, self.surface_form.as_str());
        raw.insert(
            SideReaction::KEY,
            OptionValue::List(
                self.side_reactions
                    .iter()
                    .map(|r| r.as_str().to_string())
                    .collect(),
            ),
        );
        raw.insert(Convection::KEY, self.convection.as_str());
        raw.insert(DiffusionOrder::KEY, self.diffusion_order.as_str());
        raw
    }

    pub fn sei(&self) -> SeiMechanism {
        self.sei
    }

    pub fn sei_on_cracks(&self) -> bool {
        self.sei_on_cracks
    }

    pub fn current_collector(&self) -> CurrentCollector {
        self.current_collector
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    pub fn kinetics(&self) -> Kinetics {
        self.kinetics
    }

    pub fn surface_form(&self) -> SurfaceForm {
        self.surface_form
    }

    pub fn side_reactions(&self) -> &BTreeSet<SideReaction> {
        &self.side_reactions
    }

    pub fn has_oxygen(&self) -> bool {
        self.side_reactions.contains(&SideReaction::Oxygen)
    }

    pub fn convection(&self) -> Convection {
        self.convection
    }

    pub fn diffusion_order(&self) -> DiffusionOrder {
        self.diffusion_order
    }
}

/// Builder for [`Options`]; unset fields keep their defaults.
#[derive(Clone, Debug, Default)]
pub struct OptionsBuilder {
    options: Options,
    dimensionality: i64,
}

impl OptionsBuilder {
    pub fn sei(mut self, mechanism: SeiMechanism) -> Self {
        self.options.sei = mechanism;
        self
    }

    pub fn sei_on_cracks(mut self, on: bool) -> Self {
        self.options.sei_on_cracks = on;
        self
    }

    pub fn current_collector(mut self, collector: CurrentCollector) -> Self {
        self.options.current_collector = collector;
        self
    }

    pub fn dimensionality(mut self, dimensionality: i64) -> Self {
        self.dimensionality = dimensionality;
        self
    }

    pub fn kinetics(mut self, kinetics: Kinetics) -> Self {
        self.options.kinetics = kinetics;
        self
    }

    pub fn surface_form(mut self, form: SurfaceForm) -> Self {
        self.options.surface_form = form;
        self
    }

    pub fn side_reaction(mut self, reaction: SideReaction) -> Self {
        self.options.side_reactions.insert(reaction);
        self
    }

    pub fn convection(mut self, convection: Convection) -> Self {
        self.options.convection = convection;
        self
    }

    pub fn diffusion_order(mut self, order: DiffusionOrder) -> Self {
        self.options.diffusion_order = order;
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> OptionResult<Options> {
        let mut options = self.options;
        options.dimensionality = Dimensionality::new(self.dimensionality)?;
        validate::check_consistency(&options)?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_strings_round_trip() {
        for m in SeiMechanism::ALL {
            assert_eq!(m.as_str().parse::<SeiMechanism>().unwrap(), *m);
        }
        assert_eq!(
            "potential pair quite conductive"
                .parse::<CurrentCollector>()
                .unwrap(),
            CurrentCollector::PotentialPairQuiteConductive
        );
    }

    #[test]
    fn unknown_string_lists_expected_values() {
        let err = "diffusion limited".parse::<SeiMechanism>().unwrap_err();
        match err {
            OptionError::InvalidValue {
                option, expected, ..
            } => {
                assert_eq!(option, "SEI");
                assert!(expected.contains("'reaction limited'"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let o = Options::builder().build().unwrap();
        assert_eq!(o.sei(), SeiMechanism::None);
        assert!(!o.sei_on_cracks());
        assert_eq!(o.current_collector(), CurrentCollector::Uniform);
        assert_eq!(o.dimensionality().get(), 0);
        assert_eq!(o.surface_form(), SurfaceForm::False);
        assert!(o.side_reactions().is_empty());
        assert_eq!(o.diffusion_order(), DiffusionOrder::Composite);
    }

    #[test]
    fn dimensionality_out_of_range() {
        assert!(Dimensionality::new(3).is_err());
        assert!(Dimensionality::new(-1).is_err());
        assert_eq!(Dimensionality::new(2).unwrap().get(), 2);
    }

    #[test]
    fn serialized_with_option_strings() {
        let o = Options::builder()
            .sei(SeiMechanism::EcReactionLimited)
            .build()
            .unwrap();
        let yaml = serde_yaml::to_string(&o).unwrap();
        assert!(yaml.contains("SEI: ec reaction limited"));
    }
}
