/*!
# sysprobe DevKit - stubs and fixtures for testing collectors

Test support for the sysprobe collectors:
- Stub command runner returning canned diagnostic output
- Temporary `/proc`-style fixture trees for the Linux host
- Fixture `HostProbe` with fixed data and call counters
- Harness wiring a fixture host into a `Collector`
*/

pub mod command_stub;
pub mod fixtures;
pub mod harness;

pub use command_stub::{StubCall, StubRunner};
pub use fixtures::FixtureTree;
pub use harness::{FixtureHost, TestHarness};
