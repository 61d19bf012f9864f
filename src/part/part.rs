use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Parameter;

/// A stocked component, identified by its manufacturer part number.
///
/// Parameter values are kept as raw strings; the numeric accessors parse on
/// read and fall back to zero for missing or unparseable values, leaving the
/// stored string untouched. Cloning a `Part` is the snapshot mechanism used
/// for history diffing; a clone is fully independent of the live entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    mpn: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<Parameter, String>,
}

impl Part {
    pub fn new(mpn: impl Into<String>) -> Self {
        Part {
            mpn: mpn.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`Part::set`] for constructing literals.
    pub fn with(mut self, parameter: Parameter, value: impl Into<String>) -> Self {
        self.set(parameter, value);
        self
    }

    pub fn mpn(&self) -> &str {
        &self.mpn
    }

    /// Only the store's rename path may re-key a part.
    pub(crate) fn set_mpn(&mut self, mpn: impl Into<String>) {
        self.mpn = mpn.into();
    }

    pub fn get(&self, parameter: Parameter) -> Option<&str> {
        self.parameters.get(&parameter).map(|value| value.as_str())
    }

    pub fn set(&mut self, parameter: Parameter, value: impl Into<String>) {
        self.parameters.insert(parameter, value.into());
    }

    /// All set parameters, in a fixed stable order.
    pub fn parameters(&self) -> impl Iterator<Item = (Parameter, &str)> {
        self.parameters
            .iter()
            .map(|(parameter, value)| (*parameter, value.as_str()))
    }

    pub fn stock(&self) -> i64 {
        self.parse_int(Parameter::Stock)
    }

    pub fn low_stock(&self) -> i64 {
        self.parse_int(Parameter::LowStock)
    }

    pub fn price(&self) -> f64 {
        self.get(Parameter::Price)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0.0)
    }

    /// Whether stock has fallen to or below the low-stock threshold.
    /// A part without a positive threshold is never flagged.
    pub fn is_low_stock(&self) -> bool {
        let threshold = self.low_stock();
        threshold > 0 && self.stock() <= threshold
    }

    fn parse_int(&self, parameter: Parameter) -> i64 {
        self.get(parameter)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }
}
