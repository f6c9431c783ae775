//! Flow regime classification by Reynolds number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper Reynolds number of the laminar band (exclusive).
pub const LAMINAR_LIMIT: f64 = 2000.0;
/// Lower Reynolds number of the fully turbulent band (exclusive).
pub const TURBULENT_LIMIT: f64 = 4000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    Laminar,
    Transitional,
    Turbulent,
}

impl FlowRegime {
    /// Classify a Reynolds number. The transition band includes both limits.
    pub fn classify(reynolds: f64) -> Self {
        if reynolds < LAMINAR_LIMIT {
            FlowRegime::Laminar
        } else if reynolds <= TURBULENT_LIMIT {
            FlowRegime::Transitional
        } else {
            FlowRegime::Turbulent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowRegime::Laminar => "laminar",
            FlowRegime::Transitional => "transitional",
            FlowRegime::Turbulent => "turbulent",
        }
    }
}

impl fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_thresholds() {
        assert_eq!(FlowRegime::classify(1999.9), FlowRegime::Laminar);
        assert_eq!(FlowRegime::classify(2000.0), FlowRegime::Transitional);
        assert_eq!(FlowRegime::classify(3000.0), FlowRegime::Transitional);
        assert_eq!(FlowRegime::classify(4000.0), FlowRegime::Transitional);
        assert_eq!(FlowRegime::classify(4000.1), FlowRegime::Turbulent);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(FlowRegime::Transitional.to_string(), "transitional");
        assert_eq!(format!("{}", FlowRegime::Laminar), "laminar");
    }
}
