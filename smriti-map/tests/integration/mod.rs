//! Integration tests for smriti-map persistence
//!
//! These tests drive the public save/load API end to end: on-disk round
//! trips through `tempfile`, hand-assembled malformed streams, and a
//! property test over random sparse maps.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration -- --nocapture
//!
//! # With codec logging
//! RUST_LOG=smriti_map=trace cargo test --test integration
//! ```

mod properties;
mod roundtrip;
