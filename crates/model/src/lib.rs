pub use serde_with;

pub mod broadcast;
pub mod course;
pub mod home;
pub mod pace;
pub mod race;
pub mod route;
pub mod runner;

/// Canonical sample values. The mock backend and the tests build their
/// datasets from these, so the wire format stays exercised end to end.
pub trait ExampleData {
    fn example_data() -> Self;
}
