// (C) Coralbits SL 2025
// This file is part of Cachetrace and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

pub mod cache;
pub mod config;
pub mod store;
pub mod types;
pub mod utils;

pub use cache::*;
pub use config::*;
pub use store::*;
pub use types::*;
pub use utils::*;
