use serde::{Deserialize, Serialize};

/// One BOM row: a part reference with the quantity a build requires.
///
/// The part is referenced by MPN only, never by an owning handle, so a
/// deleted or renamed part shows up as a failed lookup ("orphaned"), not a
/// dangling reference. Resolution happens through
/// [`crate::Datastore::resolve`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub mpn: String,
    pub quantity: f64,
    /// Free-text reference designators, e.g. `"R1, R4"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Material {
    pub fn new(mpn: impl Into<String>, quantity: f64) -> Self {
        Material {
            mpn: mpn.into(),
            quantity,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
