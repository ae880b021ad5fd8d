#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn act() -> Weight;
}

/// Decoding and routing only; the tracker's emergency action is added by the router.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn act() -> Weight {
		Weight::from_parts(9_000_000, 0)
	}
}

impl WeightInfo for () {
	fn act() -> Weight {
		Weight::from_parts(9_000_000, 0)
	}
}
