pub mod analyse;
pub mod cluster;
pub mod reflect;
pub mod sample;
pub mod stats;
pub mod tree;
pub mod utils;
