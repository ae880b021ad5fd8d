//! Pool Control Plane interface.
//!
//! The lending market engine is not part of this workspace. Mitigation strategies read the
//! current market configuration through this trait and write back only what changes.

use codec::{Decode, Encode, MaxEncodedLen};
use polkadot_sdk::sp_runtime::DispatchResult;
use scale_info::TypeInfo;

pub use sp_arithmetic::Permill;
use sp_arithmetic::traits::Zero;

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Snapshot of one market as reported by the control plane.
#[derive(Clone, Copy, Debug, Decode, Default, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo)]
pub struct MarketConfiguration {
  /// Loan-to-value granted to the asset when used as collateral.
  pub ltv: Permill,
  /// Collateral ratio at which positions become liquidatable.
  pub liquidation_threshold: Permill,
  /// Premium paid to liquidators on top of the repaid debt.
  pub liquidation_bonus: Permill,
  /// Frozen markets reject new supply and borrow.
  pub frozen: bool,
  pub borrowing_enabled: bool,
  pub stable_rate_borrowing_enabled: bool,
}

impl MarketConfiguration {
  /// Whether any borrowing mode is still open on this market.
  pub fn allows_borrowing(&self) -> bool {
    self.borrowing_enabled || self.stable_rate_borrowing_enabled
  }

  /// Whether the asset still counts as collateral for new borrows.
  pub fn grants_ltv(&self) -> bool {
    !self.ltv.is_zero()
  }
}

/// Queries and mutations the reserve trackers need from the lending market engine.
///
/// Implementations enforce their own authority model; a rejected write surfaces as a dispatch
/// error and reverts the calling extrinsic.
pub trait PoolControlPlane<AssetId> {
  /// Every market listed in the pool, in the pool's own order.
  fn markets() -> Vec<AssetId>;

  /// Current configuration of `asset`, `None` if the pool does not list it.
  fn configuration(asset: &AssetId) -> Option<MarketConfiguration>;

  fn freeze(asset: &AssetId) -> DispatchResult;

  fn set_borrowing(asset: &AssetId, enabled: bool) -> DispatchResult;

  fn set_stable_rate_borrowing(asset: &AssetId, enabled: bool) -> DispatchResult;

  fn configure_collateral(
    asset: &AssetId,
    ltv: Permill,
    liquidation_threshold: Permill,
    liquidation_bonus: Permill,
  ) -> DispatchResult;
}

/// Pool without markets; every write is accepted and ignored.
impl<AssetId> PoolControlPlane<AssetId> for () {
  fn markets() -> Vec<AssetId> {
    Vec::new()
  }

  fn configuration(_asset: &AssetId) -> Option<MarketConfiguration> {
    None
  }

  fn freeze(_asset: &AssetId) -> DispatchResult {
    Ok(())
  }

  fn set_borrowing(_asset: &AssetId, _enabled: bool) -> DispatchResult {
    Ok(())
  }

  fn set_stable_rate_borrowing(_asset: &AssetId, _enabled: bool) -> DispatchResult {
    Ok(())
  }

  fn configure_collateral(
    _asset: &AssetId,
    _ltv: Permill,
    _liquidation_threshold: Permill,
    _liquidation_bonus: Permill,
  ) -> DispatchResult {
    Ok(())
  }
}
