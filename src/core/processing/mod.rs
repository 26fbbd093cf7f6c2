//! Array-level primitives behind the transforms: N-D padding, foreground
//! bounding boxes, random patch placement, and transform pipelines.
pub mod bbox;
pub mod padding;
pub mod patch;
pub mod pipeline;
