mod byte_order;
mod store;

pub use byte_order::{ByteOrder, BYTE_ORDER_BIG_ENDIAN, BYTE_ORDER_LITTLE_ENDIAN};
pub use store::{AccessMode, ByteStore};
