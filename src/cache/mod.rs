mod cache;
mod instrument;
mod replay;

#[cfg(test)]
mod tests;

pub use self::cache::*;
pub use self::instrument::*;
pub use self::replay::*;
