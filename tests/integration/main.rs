//! Integration tests for cert-lookup

mod fetch_tests;
mod lookup_tests;
