#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn set_feed() -> Weight;
	fn set_feed_with_bridge_wrapper() -> Weight;
	fn clear_feed() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn set_feed() -> Weight {
		Weight::from_parts(12_000_000, 1600)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_feed_with_bridge_wrapper() -> Weight {
		Weight::from_parts(18_000_000, 2600)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn clear_feed() -> Weight {
		Weight::from_parts(12_000_000, 1600)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn set_feed() -> Weight {
		Weight::from_parts(12_000_000, 1600)
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn set_feed_with_bridge_wrapper() -> Weight {
		Weight::from_parts(18_000_000, 2600)
			.saturating_add(RocksDbWeight::get().reads(1))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn clear_feed() -> Weight {
		Weight::from_parts(12_000_000, 1600)
			.saturating_add(RocksDbWeight::get().reads(1))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
}
