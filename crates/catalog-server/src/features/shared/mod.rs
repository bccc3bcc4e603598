//! Cross-feature building blocks: request validation and test fixtures.

pub mod test_helpers;
pub mod validation;
