pub mod conversion;
pub mod definition;
pub mod graph;
pub mod traversal;

pub use conversion::*;
pub use definition::*;
pub use graph::*;
pub use traversal::*;
