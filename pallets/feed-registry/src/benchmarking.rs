use crate::*;
use frame::deps::frame_support::traits::EnsureOrigin;
use polkadot_sdk::frame_benchmarking::v2::*;
use primitives::FeedEntry;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn set_feed() -> Result<(), BenchmarkError> {
    let origin =
      T::RegistryOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    let asset = T::BenchmarkHelper::asset(0);
    let feed = T::BenchmarkHelper::feed(0);

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, asset, feed);

    assert_eq!(Pallet::<T>::feed(&asset), Some(feed));
    Ok(())
  }

  #[benchmark]
  fn set_feed_with_bridge_wrapper() -> Result<(), BenchmarkError> {
    let origin =
      T::RegistryOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    let asset = T::BenchmarkHelper::asset(0);
    let feed = T::BenchmarkHelper::feed(0);
    let bridge_wrapper = T::BenchmarkHelper::bridge_wrapper();

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, asset, feed, bridge_wrapper);

    assert_eq!(Pallet::<T>::bridge_wrapper(&asset), Some(bridge_wrapper));
    Ok(())
  }

  #[benchmark]
  fn clear_feed() -> Result<(), BenchmarkError> {
    let origin =
      T::RegistryOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    let asset = T::BenchmarkHelper::asset(0);
    Feeds::<T>::insert(
      &asset,
      FeedEntry {
        feed: T::BenchmarkHelper::feed(0),
        bridge_wrapper: Some(T::BenchmarkHelper::bridge_wrapper()),
      },
    );

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, asset);

    assert_eq!(Pallet::<T>::feed(&asset), None);
    Ok(())
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
