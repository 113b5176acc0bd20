//! Request vars containers.
//!
//! - [`Storage`]: key/value vars where missing keys read as `None`
//! - [`StorageList`]: missing keys read as an empty, growable array
//! - [`List`]: positional args with cast/default/otherwise lookups

pub mod errors;
pub mod list;
pub mod storage;
pub mod storage_list;

pub use errors::{BadRequest, StorageError};
pub use list::{At, List, Otherwise};
pub use storage::{Slot, Storage};
pub use storage_list::StorageList;
