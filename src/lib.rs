pub mod aggregator;
pub mod models;
pub mod notifications;
pub mod router;
pub mod settings;
pub mod storage;
pub mod types;

#[cfg(test)]
mod testing;
