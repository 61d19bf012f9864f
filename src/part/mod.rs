mod parameter;
mod part;

pub use parameter::{Parameter, MPN_FIELD};
pub use part::Part;
