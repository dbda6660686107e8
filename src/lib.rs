pub mod configuration;
pub mod data_providers;
pub mod entities;
pub mod result;
pub mod use_cases;

#[cfg(test)]
mod testingtools;
