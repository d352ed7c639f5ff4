pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Add, Delete, Init, List, Types, Verify, Version};
