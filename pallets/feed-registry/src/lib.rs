//! Feed Registry Pallet
//!
//! Maps each tracked asset to a proof-of-reserve feed and, when the asset's backing also covers a
//! deprecated token form, to a bridge wrapper. The registry is the single [`BackingVerifier`] the
//! asset trackers consult: an asset is unbacked when its feed reports less than the supply it
//! must cover, or a negative reserve.
//!
//! [`BackingVerifier`]: primitives::BackingVerifier

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

mod backing;

pub mod weights;
pub use weights::WeightInfo;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AssetId, FeedId, BridgeWrapperId> {
  fn asset(seed: u32) -> AssetId;
  fn feed(seed: u32) -> FeedId;
  /// A wrapper that resolves through the configured `BridgeWrappers`.
  fn bridge_wrapper() -> BridgeWrapperId;
}

const LOG_TARGET: &str = "runtime::feed-registry";

#[frame::pallet]
pub mod pallet {
  use crate::weights::WeightInfo as _;
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::traits::{EnsureOrigin, fungibles::Inspect},
    sp_runtime::traits::MaybeSerializeDeserialize,
  };
  use frame::prelude::*;
  use primitives::{BridgeWrapperInspect, FeedEntry, ReserveFeed};

  pub type FeedEntryOf<T> = FeedEntry<<T as Config>::FeedId, <T as Config>::BridgeWrapperId>;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Origin allowed to register and clear feeds (e.g. Governance or Root)
    type RegistryOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Identifier of a reserve-backed asset.
    type AssetId: Parameter + Member + MaxEncodedLen + Copy + MaybeSerializeDeserialize;

    /// Reference to a proof-of-reserve feed.
    type FeedId: Parameter + Member + MaxEncodedLen + Copy + MaybeSerializeDeserialize;

    /// Reference to a bridge wrapper covering a current and a deprecated representation.
    type BridgeWrapperId: Parameter + Member + MaxEncodedLen + Copy + MaybeSerializeDeserialize;

    /// Source of feed answers.
    type ReserveFeeds: ReserveFeed<Self::FeedId>;

    /// Resolves bridge wrappers into their token representations.
    type BridgeWrappers: BridgeWrapperInspect<Self::BridgeWrapperId, Self::AssetId>;

    /// Circulating supply of the tracked assets (`total_issuance`).
    type Supply: Inspect<Self::AccountId, AssetId = Self::AssetId, Balance = u128>;

    /// When `true`, clearing an asset without a feed fails with `FeedNotFound` instead of
    /// re-emitting the disabled state.
    #[pallet::constant]
    type StrictFeedRemoval: Get<bool>;

    type WeightInfo: crate::weights::WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AssetId, Self::FeedId, Self::BridgeWrapperId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Active feed per asset. Absence means the asset is disabled.
  #[pallet::storage]
  pub type Feeds<T: Config> = StorageMap<_, Blake2_128Concat, T::AssetId, FeedEntryOf<T>, OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// The feed of an asset was set, replaced or cleared.
    FeedStateChanged {
      asset: T::AssetId,
      feed: Option<T::FeedId>,
      bridge_wrapper: Option<T::BridgeWrapperId>,
      enabled: bool,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// The bridge wrapper does not resolve to a pair of representations.
    InvalidBridgeWrapper,
    /// No feed is registered for the asset (strict removal only).
    FeedNotFound,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// `(asset, feed, bridge_wrapper)` triples registered at genesis. Every bridge wrapper must
    /// resolve through `BridgeWrappers`.
    pub feeds: Vec<(T::AssetId, T::FeedId, Option<T::BridgeWrapperId>)>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      for (asset, feed, bridge_wrapper) in &self.feeds {
        if let Some(wrapper) = bridge_wrapper {
          assert!(
            T::BridgeWrappers::representations(wrapper).is_some(),
            "genesis bridge wrapper must resolve"
          );
        }
        Feeds::<T>::insert(
          asset,
          FeedEntry {
            feed: *feed,
            bridge_wrapper: *bridge_wrapper,
          },
        );
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Register or replace the reserve feed of `asset`.
    ///
    /// Any bridge wrapper previously attached to the asset is dropped.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::set_feed())]
    pub fn set_feed(origin: OriginFor<T>, asset: T::AssetId, feed: T::FeedId) -> DispatchResult {
      T::RegistryOrigin::ensure_origin(origin)?;
      Self::write_feed(asset, feed, None);
      Ok(())
    }

    /// Register or replace the reserve feed of `asset` together with a bridge wrapper.
    ///
    /// Verification then compares the feed against the combined supply of the wrapper's
    /// current and deprecated representations.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::set_feed_with_bridge_wrapper())]
    pub fn set_feed_with_bridge_wrapper(
      origin: OriginFor<T>,
      asset: T::AssetId,
      feed: T::FeedId,
      bridge_wrapper: T::BridgeWrapperId,
    ) -> DispatchResult {
      T::RegistryOrigin::ensure_origin(origin)?;
      ensure!(
        T::BridgeWrappers::representations(&bridge_wrapper).is_some(),
        Error::<T>::InvalidBridgeWrapper
      );
      Self::write_feed(asset, feed, Some(bridge_wrapper));
      Ok(())
    }

    /// Drop the feed and bridge wrapper of `asset`.
    ///
    /// Clearing an asset that has no feed succeeds and emits the same event, unless
    /// `StrictFeedRemoval` is set.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::clear_feed())]
    pub fn clear_feed(origin: OriginFor<T>, asset: T::AssetId) -> DispatchResult {
      T::RegistryOrigin::ensure_origin(origin)?;
      let previous = Feeds::<T>::take(&asset);
      if previous.is_none() {
        ensure!(!T::StrictFeedRemoval::get(), Error::<T>::FeedNotFound);
        log::debug!(target: crate::LOG_TARGET, "clearing asset {:?} without a feed", asset);
      }
      Self::deposit_event(Event::FeedStateChanged {
        asset,
        feed: None,
        bridge_wrapper: None,
        enabled: false,
      });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Reserve feed registered for `asset`, if any.
    pub fn feed(asset: &T::AssetId) -> Option<T::FeedId> {
      Feeds::<T>::get(asset).map(|entry| entry.feed)
    }

    /// Bridge wrapper registered for `asset`, if any.
    pub fn bridge_wrapper(asset: &T::AssetId) -> Option<T::BridgeWrapperId> {
      Feeds::<T>::get(asset).and_then(|entry| entry.bridge_wrapper)
    }

    fn write_feed(asset: T::AssetId, feed: T::FeedId, bridge_wrapper: Option<T::BridgeWrapperId>) {
      Feeds::<T>::insert(
        &asset,
        FeedEntry {
          feed,
          bridge_wrapper,
        },
      );
      Self::deposit_event(Event::FeedStateChanged {
        asset,
        feed: Some(feed),
        bridge_wrapper,
        enabled: true,
      });
    }
  }
}
