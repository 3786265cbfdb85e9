pub mod keys;
pub mod store;
pub mod traits;

pub use store::*;
pub use traits::*;
