//! 拓扑构建

pub mod leaf_spine;

pub use leaf_spine::{LeafSpineOpts, LeafSpineTopology, build_leaf_spine};
