use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Name of the identifying field, used to route [`crate::Datastore::edit_part`]
/// to the rename path. The MPN is the part's map key, not a [`Parameter`].
pub const MPN_FIELD: &str = "MPN";

/// The fixed set of named part parameters.
///
/// Values are always stored as strings, even for the numeric fields; parsing
/// happens at read time via the typed accessors on [`crate::Part`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Parameter {
    Manufacturer,
    Description,
    Category,
    /// Storage location.
    Location,
    /// Stock quantity.
    Stock,
    /// Low-stock warning threshold.
    LowStock,
    Price,
    /// Preferred supplier.
    Supplier,
    /// Supplier part number.
    #[serde(rename = "SPN")]
    Spn,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::Manufacturer,
        Parameter::Description,
        Parameter::Category,
        Parameter::Location,
        Parameter::Stock,
        Parameter::LowStock,
        Parameter::Price,
        Parameter::Supplier,
        Parameter::Spn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Manufacturer => "Manufacturer",
            Parameter::Description => "Description",
            Parameter::Category => "Category",
            Parameter::Location => "Location",
            Parameter::Stock => "Stock",
            Parameter::LowStock => "LowStock",
            Parameter::Price => "Price",
            Parameter::Supplier => "Supplier",
            Parameter::Spn => "SPN",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Parameter {
    type Err = StoreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Manufacturer" => Ok(Parameter::Manufacturer),
            "Description" => Ok(Parameter::Description),
            "Category" => Ok(Parameter::Category),
            "Location" => Ok(Parameter::Location),
            "Stock" => Ok(Parameter::Stock),
            "LowStock" => Ok(Parameter::LowStock),
            "Price" => Ok(Parameter::Price),
            "Supplier" => Ok(Parameter::Supplier),
            "SPN" => Ok(Parameter::Spn),
            _ => Err(StoreError::UnknownParameter(name.to_string())),
        }
    }
}
