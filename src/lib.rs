//! Rental data pipeline shared by the dashboard and the sample generator.

pub mod data;
