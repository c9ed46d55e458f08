mod lock;
mod mutex;
mod state;
#[cfg(test)]
mod tests;

pub use lock::*;
pub use state::*;
