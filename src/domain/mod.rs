pub mod clock;
pub mod gazetteer;
pub mod query;
pub mod types;

pub use clock::*;
pub use gazetteer::*;
pub use query::*;
pub use types::*;
