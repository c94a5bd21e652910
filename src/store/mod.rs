mod inmem;
mod redis;
mod store;
mod traits;


pub use self::inmem::*;
pub use self::redis::*;
pub use self::store::*;
pub use self::traits::*;
