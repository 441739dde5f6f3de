pub use libbeacon_core::*;
