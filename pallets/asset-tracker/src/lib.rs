//! Asset Tracker Pallet
//!
//! Keeps the set of reserve-backed assets a lending pool version cares about and, when any of
//! them is reported unbacked, applies the configured [`EmergencyAction`] to the pool.
//!
//! The pallet is instantiable: one instance per protocol version, each wired to its own pool and
//! mitigation strategy. V2 pools use [`FreezeReserves`], V3 pools use [`ZeroCollateralLtv`].
//! Both strategies also disable every borrowing mode on every market of the pool.
//!
//! Executing an emergency action is permissionless: it only ever acts on a reserve the backing
//! verifier reports as unbacked, and does nothing once mitigation is in place.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod mitigation;
pub use mitigation::{EmergencyAction, FreezeReserves, ZeroCollateralLtv};

pub mod weights;
pub use weights::WeightInfo;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AssetId> {
  fn asset(seed: u32) -> AssetId;
  /// Makes the feed of `asset` report less than its supply.
  fn make_unbacked(asset: &AssetId);
  /// Lists an open market for `asset` in the pool the tracker mitigates.
  fn list_market(asset: &AssetId);
}

const LOG_TARGET: &str = "runtime::asset-tracker";

#[frame::pallet]
pub mod pallet {
  use crate::{mitigation::EmergencyAction, weights::WeightInfo as _};
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::{storage::with_storage_layer, traits::EnsureOrigin},
    sp_runtime::traits::MaybeSerializeDeserialize,
  };
  use frame::prelude::*;
  use primitives::{BackingGuard, BackingVerifier};

  #[pallet::config]
  pub trait Config<I: 'static = ()>:
    frame_system::Config<RuntimeEvent: From<Event<Self, I>>>
  {
    /// Origin allowed to enable and disable tracked assets (e.g. Governance or Root)
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Identifier of a reserve-backed asset.
    type AssetId: Parameter + Member + MaxEncodedLen + Copy + MaybeSerializeDeserialize;

    /// Verdict source for the tracked assets.
    type Backing: BackingVerifier<Self::AssetId>;

    /// Strategy applied to the pool when an asset is unbacked.
    type Mitigation: EmergencyAction<Self::AssetId>;

    /// Upper bound on the number of tracked assets.
    #[pallet::constant]
    type MaxAssets: Get<u32>;

    /// Upper bound on the number of markets the pool lists. Emergency actions are charged for
    /// this many markets up front and refunded down to the markets actually walked.
    #[pallet::constant]
    type MaxMarkets: Get<u32>;

    type WeightInfo: crate::weights::WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AssetId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T, I = ()>(PhantomData<(T, I)>);

  /// Tracked assets in the order they were enabled.
  #[pallet::storage]
  pub type EnabledAssets<T: Config<I>, I: 'static = ()> =
    StorageValue<_, BoundedVec<T::AssetId, T::MaxAssets>, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config<I>, I: 'static = ()> {
    /// An asset started or stopped being tracked.
    AssetStateChanged { asset: T::AssetId, enabled: bool },
    /// Mitigation was applied to an unbacked asset.
    AssetNotBacked { asset: T::AssetId },
    /// An emergency action completed, including the pool-wide borrowing shutdown.
    EmergencyActionExecuted { mitigated: u32 },
  }

  #[pallet::error]
  pub enum Error<T, I = ()> {
    /// Enabling the assets would exceed `MaxAssets`.
    TooManyAssets,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config<I>, I: 'static = ()> {
    /// Assets tracked from genesis, duplicates ignored.
    pub assets: Vec<T::AssetId>,
    #[serde(skip)]
    pub _marker: PhantomData<I>,
  }

  #[pallet::genesis_build]
  impl<T: Config<I>, I: 'static> BuildGenesisConfig for GenesisConfig<T, I> {
    fn build(&self) {
      let mut enabled = BoundedVec::<T::AssetId, T::MaxAssets>::default();
      for asset in &self.assets {
        if !enabled.contains(asset) {
          enabled
            .try_push(*asset)
            .expect("genesis assets must not exceed MaxAssets");
        }
      }
      EnabledAssets::<T, I>::put(enabled);
    }
  }

  #[pallet::call]
  impl<T: Config<I>, I: 'static> Pallet<T, I> {
    /// Start tracking `assets`.
    ///
    /// Assets already tracked are skipped and emit nothing.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::enable_assets(assets.len() as u32))]
    pub fn enable_assets(origin: OriginFor<T>, assets: Vec<T::AssetId>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      EnabledAssets::<T, I>::try_mutate(|enabled| -> DispatchResult {
        for asset in assets {
          if enabled.contains(&asset) {
            continue;
          }
          enabled
            .try_push(asset)
            .map_err(|_| Error::<T, I>::TooManyAssets)?;
          Self::deposit_event(Event::AssetStateChanged {
            asset,
            enabled: true,
          });
        }
        Ok(())
      })
    }

    /// Stop tracking `assets`.
    ///
    /// Assets not tracked are skipped and emit nothing.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::disable_assets(assets.len() as u32))]
    pub fn disable_assets(origin: OriginFor<T>, assets: Vec<T::AssetId>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      EnabledAssets::<T, I>::mutate(|enabled| {
        for asset in assets {
          if let Some(index) = enabled.iter().position(|tracked| *tracked == asset) {
            enabled.remove(index);
            Self::deposit_event(Event::AssetStateChanged {
              asset,
              enabled: false,
            });
          }
        }
      });
      Ok(())
    }

    /// Mitigate every unbacked asset that is not mitigated yet.
    ///
    /// Callable by any signed origin. Succeeds without side effects when nothing is due.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::execute_emergency_action(
      T::MaxAssets::get(),
      T::MaxMarkets::get()
    ))]
    pub fn execute_emergency_action(origin: OriginFor<T>) -> DispatchResultWithPostInfo {
      ensure_signed(origin)?;
      let used = Self::do_execute_emergency_action()?;
      Ok(Some(used).into())
    }
  }

  impl<T: Config<I>, I: 'static> Pallet<T, I> {
    /// Tracked assets in the order they were enabled.
    pub fn assets() -> Vec<T::AssetId> {
      EnabledAssets::<T, I>::get().into_inner()
    }

    /// `true` when no tracked asset is reported unbacked.
    pub fn are_all_reserves_backed() -> bool {
      let assets = EnabledAssets::<T, I>::get();
      T::Backing::are_all_backed(&assets).0
    }

    /// `true` while some unbacked asset still has a market the strategy would change.
    pub fn is_emergency_action_possible() -> bool {
      !Self::pending_mitigation(&EnabledAssets::<T, I>::get()).is_empty()
    }

    /// Runs the emergency action and returns the weight it used.
    pub fn do_execute_emergency_action() -> Result<Weight, DispatchError> {
      let assets = EnabledAssets::<T, I>::get();
      let tracked = assets.len() as u32;
      let pending = Self::pending_mitigation(&assets);
      if pending.is_empty() {
        log::debug!(target: crate::LOG_TARGET, "no emergency action due");
        return Ok(T::WeightInfo::execute_emergency_action(tracked, 0));
      }

      let markets = T::Mitigation::market_count();
      if markets > T::MaxMarkets::get() {
        log::warn!(
          target: crate::LOG_TARGET,
          "pool lists {} markets, above MaxMarkets {}",
          markets,
          T::MaxMarkets::get()
        );
      }

      for asset in &pending {
        T::Mitigation::mitigate(asset)?;
        Self::deposit_event(Event::AssetNotBacked { asset: *asset });
      }
      T::Mitigation::restrict_borrowing()?;

      log::warn!(
        target: crate::LOG_TARGET,
        "emergency action executed for {} unbacked asset(s)",
        pending.len()
      );
      Self::deposit_event(Event::EmergencyActionExecuted {
        mitigated: pending.len() as u32,
      });
      Ok(T::WeightInfo::execute_emergency_action(tracked, markets))
    }

    /// Unbacked tracked assets whose market is not fully mitigated, in tracking order.
    fn pending_mitigation(assets: &[T::AssetId]) -> Vec<T::AssetId> {
      let (all_backed, unbacked_flags) = T::Backing::are_all_backed(assets);
      if all_backed {
        return Vec::new();
      }
      assets
        .iter()
        .zip(unbacked_flags)
        .filter(|(_, unbacked)| *unbacked)
        .map(|(asset, _)| *asset)
        .filter(|asset| T::Mitigation::is_mitigation_pending(asset))
        .collect()
    }
  }

  impl<T: Config<I>, I: 'static> BackingGuard for Pallet<T, I> {
    fn is_emergency_action_possible() -> bool {
      Pallet::<T, I>::is_emergency_action_possible()
    }

    fn execute_emergency_action() -> Result<Weight, DispatchError> {
      with_storage_layer(Pallet::<T, I>::do_execute_emergency_action)
    }

    fn emergency_action_weight() -> Weight {
      T::WeightInfo::execute_emergency_action(T::MaxAssets::get(), T::MaxMarkets::get())
    }
  }
}
