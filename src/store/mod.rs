mod dataset;
mod datastore;

pub use datastore::{Datastore, StoreOptions, PARTS_CHANGED, PROJECTS_CHANGED};
