pub mod impact_pool;
pub mod position;
pub mod registry;
pub mod vault;

pub use impact_pool::*;
pub use position::*;
pub use registry::*;
pub use vault::*;
