//! Pricing model and the ports the quote service depends on.

pub mod account;
pub mod breakdown;
pub mod ports;
pub mod pricing;
pub mod rates;
pub mod request;
pub mod subscription;
