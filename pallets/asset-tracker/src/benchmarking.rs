use crate::*;
use alloc::vec::Vec;
use frame::deps::{
  frame_support::traits::{EnsureOrigin, Get},
  sp_runtime::BoundedVec,
};
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;

fn assets<T: Config<I>, I: 'static>(n: u32) -> Vec<T::AssetId> {
  (0..n).map(T::BenchmarkHelper::asset).collect()
}

#[instance_benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn enable_assets(n: Linear<1, { T::MaxAssets::get() }>) -> Result<(), BenchmarkError> {
    let origin = T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    let assets = assets::<T, I>(n);

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, assets);

    assert_eq!(Pallet::<T, I>::assets().len() as u32, n);
    Ok(())
  }

  #[benchmark]
  fn disable_assets(n: Linear<1, { T::MaxAssets::get() }>) -> Result<(), BenchmarkError> {
    let origin = T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    let assets = assets::<T, I>(n);
    EnabledAssets::<T, I>::put(BoundedVec::truncate_from(assets.clone()));

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, assets);

    assert!(Pallet::<T, I>::assets().is_empty());
    Ok(())
  }

  #[benchmark]
  fn execute_emergency_action(
    n: Linear<1, { T::MaxAssets::get() }>,
    m: Linear<1, { T::MaxMarkets::get() }>,
  ) {
    let caller: T::AccountId = whitelisted_caller();
    let assets = assets::<T, I>(n);
    for asset in &assets {
      T::BenchmarkHelper::make_unbacked(asset);
    }
    // Markets for the first `m` seeds, so at least one tracked asset is mitigated
    for seed in 0..m {
      T::BenchmarkHelper::list_market(&T::BenchmarkHelper::asset(seed));
    }
    EnabledAssets::<T, I>::put(BoundedVec::truncate_from(assets));
    assert!(Pallet::<T, I>::is_emergency_action_possible());

    #[extrinsic_call]
    _(RawOrigin::Signed(caller));

    assert!(!Pallet::<T, I>::is_emergency_action_possible());
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
