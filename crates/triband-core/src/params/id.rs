//! Parameter identities, ranges and defaults
//!
//! Every externally controllable value has a stable [`ParamId`] and display
//! name. The declared [`ParamSpec`] is the single source of truth for the
//! range, step and default of each parameter; the store snaps every write
//! to it, so downstream code can trust the values it reads.

use crate::types::{Band, NUM_BANDS};

/// Total number of parameters
pub const NUM_PARAMS: usize = 25;

/// Selectable compression ratios. The last entry acts as a limiter.
pub const RATIO_CHOICES: [f32; 14] = [
    1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 15.0, 20.0, 50.0, 100.0,
];

/// Default ratio index (3:1)
pub const DEFAULT_RATIO_INDEX: usize = 3;

/// Lowest selectable frequency in Hz
pub const MIN_FREQ: f32 = 20.0;
/// Highest selectable frequency in Hz
pub const MAX_FREQ: f32 = 20000.0;
/// Lowest threshold in dB
pub const MIN_THRESHOLD_DB: f32 = -60.0;
/// Highest threshold in dB
pub const MAX_DB: f32 = 12.0;

/// Stable parameter identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    LowMidCrossover,
    MidHighCrossover,
    Threshold(Band),
    Attack(Band),
    Release(Band),
    Ratio(Band),
    Bypassed(Band),
    Mute(Band),
    Solo(Band),
    GainIn,
    GainOut,
}

/// Display names, indexed by [`ParamId::index`]
const NAMES: [&str; NUM_PARAMS] = [
    "Low-Mid Crossover Frequency",
    "Mid-High Crossover Frequency",
    "Threshold Low Band",
    "Threshold Mid Band",
    "Threshold High Band",
    "Attack Low Band",
    "Attack Mid Band",
    "Attack High Band",
    "Release Low Band",
    "Release Mid Band",
    "Release High Band",
    "Ratio Low Band",
    "Ratio Mid Band",
    "Ratio High Band",
    "Bypassed Low Band",
    "Bypassed Mid Band",
    "Bypassed High Band",
    "Mute Low Band",
    "Mute Mid Band",
    "Mute High Band",
    "Solo Low Band",
    "Solo Mid Band",
    "Solo High Band",
    "Gain In",
    "Gain Out",
];

impl ParamId {
    /// All parameters in storage order
    pub const ALL: [ParamId; NUM_PARAMS] = [
        ParamId::LowMidCrossover,
        ParamId::MidHighCrossover,
        ParamId::Threshold(Band::Low),
        ParamId::Threshold(Band::Mid),
        ParamId::Threshold(Band::High),
        ParamId::Attack(Band::Low),
        ParamId::Attack(Band::Mid),
        ParamId::Attack(Band::High),
        ParamId::Release(Band::Low),
        ParamId::Release(Band::Mid),
        ParamId::Release(Band::High),
        ParamId::Ratio(Band::Low),
        ParamId::Ratio(Band::Mid),
        ParamId::Ratio(Band::High),
        ParamId::Bypassed(Band::Low),
        ParamId::Bypassed(Band::Mid),
        ParamId::Bypassed(Band::High),
        ParamId::Mute(Band::Low),
        ParamId::Mute(Band::Mid),
        ParamId::Mute(Band::High),
        ParamId::Solo(Band::Low),
        ParamId::Solo(Band::Mid),
        ParamId::Solo(Band::High),
        ParamId::GainIn,
        ParamId::GainOut,
    ];

    /// Position of this parameter in the store
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ParamId::LowMidCrossover => 0,
            ParamId::MidHighCrossover => 1,
            ParamId::Threshold(b) => 2 + b.index(),
            ParamId::Attack(b) => 2 + NUM_BANDS + b.index(),
            ParamId::Release(b) => 2 + 2 * NUM_BANDS + b.index(),
            ParamId::Ratio(b) => 2 + 3 * NUM_BANDS + b.index(),
            ParamId::Bypassed(b) => 2 + 4 * NUM_BANDS + b.index(),
            ParamId::Mute(b) => 2 + 5 * NUM_BANDS + b.index(),
            ParamId::Solo(b) => 2 + 6 * NUM_BANDS + b.index(),
            ParamId::GainIn => 2 + 7 * NUM_BANDS,
            ParamId::GainOut => 3 + 7 * NUM_BANDS,
        }
    }

    /// Stable display name, e.g. "Attack Mid Band"
    pub fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    /// Look up a parameter by display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<ParamId> {
        let name = name.trim();
        ParamId::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }

    /// Declared range, step and default
    pub fn spec(self) -> ParamSpec {
        let name = self.name();
        match self {
            ParamId::LowMidCrossover => ParamSpec::float(name, MIN_FREQ, 999.0, 1.0, 400.0, "Hz"),
            ParamId::MidHighCrossover => ParamSpec::float(name, 1000.0, MAX_FREQ, 1.0, 2000.0, "Hz"),
            ParamId::Threshold(_) => ParamSpec::float(name, MIN_THRESHOLD_DB, MAX_DB, 1.0, 0.0, "dB"),
            ParamId::Attack(_) => ParamSpec::float(name, 5.0, 500.0, 1.0, 50.0, "ms"),
            ParamId::Release(_) => ParamSpec::float(name, 5.0, 500.0, 1.0, 250.0, "ms"),
            ParamId::Ratio(_) => ParamSpec {
                name,
                kind: ParamKind::Choice { choices: &RATIO_CHOICES },
                default: DEFAULT_RATIO_INDEX as f32,
                unit: ":1",
            },
            ParamId::Bypassed(_) | ParamId::Mute(_) | ParamId::Solo(_) => ParamSpec {
                name,
                kind: ParamKind::Bool,
                default: 0.0,
                unit: "",
            },
            ParamId::GainIn | ParamId::GainOut => ParamSpec::float(name, -24.0, 24.0, 0.5, 0.0, "dB"),
        }
    }
}

impl std::fmt::Display for ParamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a parameter's value domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Continuous value in `[min, max]`, quantized to `step` (0 = unquantized)
    Float { min: f32, max: f32, step: f32 },
    /// Index into an ordered list of values
    Choice { choices: &'static [f32] },
    /// Flag stored as 0.0 / 1.0
    Bool,
}

/// Parameter declaration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Display name
    pub name: &'static str,
    /// Value domain
    pub kind: ParamKind,
    /// Default raw value (choice index for choices, 0/1 for flags)
    pub default: f32,
    /// Unit label (e.g. "Hz", "dB", "ms")
    pub unit: &'static str,
}

impl ParamSpec {
    fn float(name: &'static str, min: f32, max: f32, step: f32, default: f32, unit: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Float { min, max, step },
            default,
            unit,
        }
    }

    /// Bring a raw value into the declared domain
    ///
    /// Floats are clamped then snapped to the step grid, choices are rounded
    /// to the nearest valid index and flags are thresholded at 0.5.
    /// NaN falls back to the default.
    pub fn sanitize(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        match self.kind {
            ParamKind::Float { min, max, step } => {
                let clamped = value.clamp(min, max);
                if step > 0.0 {
                    (min + ((clamped - min) / step).round() * step).clamp(min, max)
                } else {
                    clamped
                }
            }
            ParamKind::Choice { choices } => {
                let last = choices.len().saturating_sub(1) as f32;
                value.round().clamp(0.0, last)
            }
            ParamKind::Bool => {
                if value >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Value with its unit, as the controls display it
    pub fn display(&self, raw: f32) -> String {
        match self.kind {
            ParamKind::Float { .. } => super::format_value(raw, self.unit),
            ParamKind::Choice { choices } => {
                let idx = (raw.max(0.0) as usize).min(choices.len().saturating_sub(1));
                let value = choices.get(idx).copied().unwrap_or(1.0);
                format!("{}{}", value, self.unit)
            }
            ParamKind::Bool => (if raw >= 0.5 { "On" } else { "Off" }).to_string(),
        }
    }
}
