use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that names no known category or metric.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form doubles as the serde wire name.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: s.into(),
                        expected: Self::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Upload category, declared by the caller rather than inferred from content.
    Category {
        Labs => "labs",
        Dexa => "dexa",
        Vo2max => "vo2max",
    }
);

str_enum!(
    /// Every numeric field a record can carry. Each metric belongs to exactly
    /// one category.
    Metric {
        Cholesterol => "cholesterol",
        Triglycerides => "triglycerides",
        Ldl => "ldl",
        Hdl => "hdl",
        Glucose => "glucose",
        Hba1c => "hba1c",
        BodyFat => "bodyFat",
        LeanMass => "leanMass",
        FatTissue => "fatTissue",
        VisceralFat => "visceralFat",
        BoneDensity => "boneDensity",
        Vo2max => "vo2max",
        HeartRateMax => "heartRateMax",
        /// Reports without a resting heart rate are stored as 60 bpm, so a
        /// value of exactly 60 may be synthetic.
        RestingHr => "restingHR",
    }
);

impl Category {
    /// Human-readable label used in status lines and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Labs => "Lab Panel",
            Self::Dexa => "Body Composition",
            Self::Vo2max => "Cardio Fitness",
        }
    }

    /// Metrics recorded for this category, in display order.
    pub fn metrics(&self) -> &'static [Metric] {
        match self {
            Self::Labs => &[
                Metric::Cholesterol,
                Metric::Triglycerides,
                Metric::Ldl,
                Metric::Hdl,
                Metric::Glucose,
                Metric::Hba1c,
            ],
            Self::Dexa => &[
                Metric::BodyFat,
                Metric::LeanMass,
                Metric::FatTissue,
                Metric::VisceralFat,
                Metric::BoneDensity,
            ],
            Self::Vo2max => &[Metric::Vo2max, Metric::HeartRateMax, Metric::RestingHr],
        }
    }
}

impl Metric {
    pub fn category(&self) -> Category {
        match self {
            Self::Cholesterol
            | Self::Triglycerides
            | Self::Ldl
            | Self::Hdl
            | Self::Glucose
            | Self::Hba1c => Category::Labs,
            Self::BodyFat
            | Self::LeanMass
            | Self::FatTissue
            | Self::VisceralFat
            | Self::BoneDensity => Category::Dexa,
            Self::Vo2max | Self::HeartRateMax | Self::RestingHr => Category::Vo2max,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Cholesterol | Self::Triglycerides | Self::Ldl | Self::Hdl | Self::Glucose => {
                "mg/dL"
            }
            Self::Hba1c | Self::BodyFat => "%",
            Self::LeanMass => "kg",
            Self::FatTissue => "lbs",
            Self::VisceralFat => "cm²",
            Self::BoneDensity => "T-score",
            Self::Vo2max => "ml/kg/min",
            Self::HeartRateMax | Self::RestingHr => "bpm",
        }
    }
}
