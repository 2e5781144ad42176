use serde::{Deserialize, Serialize};

/// Celsius to whole degrees Fahrenheit.
pub fn to_fahrenheit(celsius: f64) -> i64 {
    (celsius * 1.8 + 32.0).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "℃",
            TemperatureUnit::Fahrenheit => "℉",
        }
    }

    /// Render a Celsius reading in this unit, value and symbol.
    pub fn format(self, celsius: f64) -> String {
        match self {
            TemperatureUnit::Celsius => format!("{celsius} {}", self.symbol()),
            TemperatureUnit::Fahrenheit => format!("{} {}", to_fahrenheit(celsius), self.symbol()),
        }
    }
}
