pub mod reconcile;
pub mod scheme;
pub mod scorer;
