pub mod layout;
pub mod ops;


#[cfg(test)]
mod integration_tests;
