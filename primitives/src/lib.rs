#![cfg_attr(not(feature = "std"), no_std)]

pub mod guard;
pub mod pool;
pub mod reserves;

pub use guard::*;
pub use pool::*;
pub use reserves::*;
