//! Backing verification against the registered feeds.

use crate::{Config, Feeds, Pallet};
use alloc::vec::Vec;
use frame::deps::frame_support::traits::fungibles::Inspect;
use primitives::{BackingVerdict, BackingVerifier, BridgeWrapperInspect, ReserveFeed, is_unbacked};

impl<T: Config> Pallet<T> {
  /// Checks every asset in `assets` against its feed.
  ///
  /// Returns the aggregate verdict and, in input order, one flag per asset that is `true` when
  /// the asset is unbacked. Assets without a registered feed are not checked and count as backed.
  pub fn are_all_backed(assets: &[T::AssetId]) -> (bool, Vec<bool>) {
    let unbacked_flags: Vec<bool> = assets.iter().map(Self::is_asset_unbacked).collect();
    let all_backed = !unbacked_flags.iter().any(|unbacked| *unbacked);
    (all_backed, unbacked_flags)
  }

  /// Per-asset verdicts for `assets`, in input order.
  pub fn verdicts(assets: &[T::AssetId]) -> Vec<BackingVerdict<T::AssetId>> {
    assets
      .iter()
      .map(|asset| BackingVerdict {
        asset: *asset,
        is_backed: !Self::is_asset_unbacked(asset),
      })
      .collect()
  }

  /// Supply the feed of `asset` has to cover.
  ///
  /// With a bridge wrapper this is the sum of both representations; a wrapper that no longer
  /// resolves falls back to the asset's own supply.
  pub fn committed_supply(asset: &T::AssetId, bridge_wrapper: Option<&T::BridgeWrapperId>) -> u128 {
    match bridge_wrapper.and_then(|wrapper| T::BridgeWrappers::representations(wrapper)) {
      Some((current, deprecated)) => {
        T::Supply::total_issuance(current).saturating_add(T::Supply::total_issuance(deprecated))
      }
      None => T::Supply::total_issuance(*asset),
    }
  }

  fn is_asset_unbacked(asset: &T::AssetId) -> bool {
    let Some(entry) = Feeds::<T>::get(asset) else {
      return false;
    };
    let reserve = T::ReserveFeeds::latest_answer(&entry.feed);
    let supply = Self::committed_supply(asset, entry.bridge_wrapper.as_ref());
    let unbacked = is_unbacked(reserve, supply);
    if unbacked {
      log::debug!(
        target: crate::LOG_TARGET,
        "asset {:?} unbacked: reserve={}, supply={}",
        asset,
        reserve,
        supply
      );
    }
    unbacked
  }
}

impl<T: Config> BackingVerifier<T::AssetId> for Pallet<T> {
  fn are_all_backed(assets: &[T::AssetId]) -> (bool, Vec<bool>) {
    Pallet::<T>::are_all_backed(assets)
  }
}
