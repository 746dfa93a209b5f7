//! Application layer orchestrating quotes.
//!
//! `QuoteService` ties the pricing engine to the rate configuration and the
//! credit ledger. Pricing stays pure; credits are only charged once a
//! calculation has succeeded.

pub mod service;
