//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no real light
//! attached.

mod mock_hw;
mod poller_tests;
mod runner_tests;
mod selection_tests;
