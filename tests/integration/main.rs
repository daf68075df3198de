//! Integration tests for bibliodesk

mod exchange_tests;
mod scanner_tests;
