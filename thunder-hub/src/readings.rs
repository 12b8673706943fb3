use std::collections::BTreeMap;
use std::fmt;

use thunder_proto::SensorKind;

/// Last decoded value per sensor kind. No history is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readings(BTreeMap<SensorKind, f64>);

impl Readings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins
    pub fn insert(&mut self, kind: SensorKind, value: f64) {
        self.0.insert(kind, value);
    }

    pub fn get(&self, kind: SensorKind) -> Option<f64> {
        self.0.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorKind, f64)> + '_ {
        self.0.iter().map(|(kind, value)| (*kind, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SensorKind, f64)> for Readings {
    fn from_iter<I: IntoIterator<Item = (SensorKind, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Readings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (kind, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}: {value:.2}")?;
            if !kind.unit().is_empty() {
                write!(f, " {}", kind.unit())?;
            }
        }
        f.write_str("}")
    }
}
