pub mod analytics;
pub mod config;
pub mod models;
pub mod storage;
#[cfg(test)]
pub mod test_helpers;
