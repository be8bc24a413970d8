pub mod cleanup;
pub mod validation;
