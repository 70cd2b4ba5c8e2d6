pub mod app;
pub mod clock_source;
pub mod controller;
pub mod position;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
