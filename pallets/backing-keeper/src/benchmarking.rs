use crate::*;
use codec::Encode;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::TrackerRouter;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn act() {
    let caller: T::AccountId = whitelisted_caller();
    let tracker = T::BenchmarkHelper::tracker();
    assert_eq!(T::Trackers::is_emergency_action_possible(&tracker), Some(false));
    let payload = tracker.encode();

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), payload);

    assert_eq!(T::Trackers::is_emergency_action_possible(&tracker), Some(false));
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
