//! Proof-of-reserve building blocks shared by the feed registry and the asset trackers.
//!
//! A reserve feed publishes how much off-ledger collateral stands behind a wrapped asset. The
//! registry pairs each tracked asset with such a feed (and optionally a bridge wrapper), and the
//! trackers only ever see the result through [`BackingVerifier`].

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Registered reserve source for a single asset.
///
/// An asset without an entry is considered disabled: it has neither a feed nor a bridge wrapper.
#[derive(Clone, Copy, Debug, Decode, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo)]
pub struct FeedEntry<FeedId, BridgeWrapperId> {
  /// Reserve feed whose answer is compared against the circulating supply.
  pub feed: FeedId,
  /// Optional wrapper whose current and deprecated representations are summed instead of the
  /// asset's own supply.
  pub bridge_wrapper: Option<BridgeWrapperId>,
}

/// Backing status of one asset at the time of the query.
#[derive(Clone, Copy, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct BackingVerdict<AssetId> {
  pub asset: AssetId,
  pub is_backed: bool,
}

/// Read side of an external proof-of-reserve oracle.
pub trait ReserveFeed<FeedId> {
  /// Latest published reserve. Negative answers are valid readings and mean "not backed".
  fn latest_answer(feed: &FeedId) -> i128;
}

/// Resolves a bridge wrapper into the two token representations it covers.
pub trait BridgeWrapperInspect<BridgeWrapperId, AssetId> {
  /// Returns `(current, deprecated)` or `None` if the wrapper is unknown.
  fn representations(wrapper: &BridgeWrapperId) -> Option<(AssetId, AssetId)>;
}

/// Decides whether a set of assets is fully backed by its reserves.
pub trait BackingVerifier<AssetId> {
  /// Returns the aggregate verdict and one `unbacked` flag per input asset, in input order.
  fn are_all_backed(assets: &[AssetId]) -> (bool, Vec<bool>);
}

impl<FeedId> ReserveFeed<FeedId> for () {
  fn latest_answer(_feed: &FeedId) -> i128 {
    0
  }
}

impl<BridgeWrapperId, AssetId> BridgeWrapperInspect<BridgeWrapperId, AssetId> for () {
  fn representations(_wrapper: &BridgeWrapperId) -> Option<(AssetId, AssetId)> {
    None
  }
}

/// Treats every asset as backed.
impl<AssetId> BackingVerifier<AssetId> for () {
  fn are_all_backed(assets: &[AssetId]) -> (bool, Vec<bool>) {
    (true, assets.iter().map(|_| false).collect())
  }
}

/// Compares a signed reserve answer with the supply it has to cover.
///
/// A negative answer can never cover anything, so it is unbacked regardless of supply.
pub fn is_unbacked(reserve: i128, committed_supply: u128) -> bool {
  u128::try_from(reserve).map_or(true, |reserve| reserve < committed_supply)
}
