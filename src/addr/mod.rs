//! 链路编址

mod allocator;
mod block;

pub use allocator::{AddressAllocator, AddressingSpec};
pub use block::{AddressBlock, InterfaceAddr};
