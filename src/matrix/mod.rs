// Output matrix structures

pub mod block;
pub mod config;
pub mod region;

pub use block::{MatrixBlock, RegionAxis, SparseRow};
pub use config::{DatagenConfig, SystemParameters};
pub use region::BlockRegion;
