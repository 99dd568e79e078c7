//! Integration test suite

mod crawl_tests;
