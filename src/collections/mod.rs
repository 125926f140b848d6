//! Supporting data structures used by the sparse elimination engines:
//! an indexed min-heap for column selection and an integer-keyed hashmap
//! for column incidence tracking.

pub mod hashmap;
pub mod heap;

pub use hashmap::IntHashMap;
pub use heap::IndexedHeap;
