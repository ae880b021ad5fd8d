//! Emergency mitigation strategies applied to a lending pool.
//!
//! Every strategy reads the market configuration before writing and skips writes that would not
//! change it, so repeated execution leaves the pool untouched once mitigation is in place.

use core::{fmt::Debug, marker::PhantomData};
use frame::deps::sp_runtime::DispatchResult;
use primitives::{Permill, PoolControlPlane};

/// Pool-side reaction to an unbacked reserve.
pub trait EmergencyAction<AssetId> {
  /// `true` while `asset` still has a market that this strategy would change.
  fn is_mitigation_pending(asset: &AssetId) -> bool;

  /// Applies the per-asset part of the strategy to `asset`.
  fn mitigate(asset: &AssetId) -> DispatchResult;

  /// Disables every borrowing mode on every market of the pool.
  fn restrict_borrowing() -> DispatchResult;

  /// Number of markets [`EmergencyAction::restrict_borrowing`] walks.
  fn market_count() -> u32;
}

impl<AssetId> EmergencyAction<AssetId> for () {
  fn is_mitigation_pending(_asset: &AssetId) -> bool {
    false
  }

  fn mitigate(_asset: &AssetId) -> DispatchResult {
    Ok(())
  }

  fn restrict_borrowing() -> DispatchResult {
    Ok(())
  }

  fn market_count() -> u32 {
    0
  }
}

/// Freezes the market of an unbacked asset (V2 pools).
pub struct FreezeReserves<Pool>(PhantomData<Pool>);

impl<AssetId: Debug, Pool: PoolControlPlane<AssetId>> EmergencyAction<AssetId>
  for FreezeReserves<Pool>
{
  fn is_mitigation_pending(asset: &AssetId) -> bool {
    Pool::configuration(asset).is_some_and(|market| !market.frozen || market.allows_borrowing())
  }

  fn mitigate(asset: &AssetId) -> DispatchResult {
    match Pool::configuration(asset) {
      Some(market) if !market.frozen => {
        log::warn!(target: crate::LOG_TARGET, "freezing market {:?}", asset);
        Pool::freeze(asset)
      }
      Some(_) => Ok(()),
      None => {
        log::warn!(target: crate::LOG_TARGET, "no market listed for {:?}", asset);
        Ok(())
      }
    }
  }

  fn restrict_borrowing() -> DispatchResult {
    disable_borrowing_everywhere::<AssetId, Pool>()
  }

  fn market_count() -> u32 {
    Pool::markets().len() as u32
  }
}

/// Sets the collateral LTV of an unbacked asset to zero (V3 pools).
///
/// Liquidation threshold and bonus are written back unchanged so open positions keep their
/// liquidation parameters.
pub struct ZeroCollateralLtv<Pool>(PhantomData<Pool>);

impl<AssetId: Debug, Pool: PoolControlPlane<AssetId>> EmergencyAction<AssetId>
  for ZeroCollateralLtv<Pool>
{
  fn is_mitigation_pending(asset: &AssetId) -> bool {
    Pool::configuration(asset).is_some_and(|market| market.grants_ltv() || market.allows_borrowing())
  }

  fn mitigate(asset: &AssetId) -> DispatchResult {
    match Pool::configuration(asset) {
      Some(market) if market.grants_ltv() => {
        log::warn!(target: crate::LOG_TARGET, "zeroing collateral ltv of {:?}", asset);
        Pool::configure_collateral(
          asset,
          Permill::from_parts(0),
          market.liquidation_threshold,
          market.liquidation_bonus,
        )
      }
      Some(_) => Ok(()),
      None => {
        log::warn!(target: crate::LOG_TARGET, "no market listed for {:?}", asset);
        Ok(())
      }
    }
  }

  fn restrict_borrowing() -> DispatchResult {
    disable_borrowing_everywhere::<AssetId, Pool>()
  }

  fn market_count() -> u32 {
    Pool::markets().len() as u32
  }
}

fn disable_borrowing_everywhere<AssetId, Pool: PoolControlPlane<AssetId>>() -> DispatchResult {
  for market in Pool::markets() {
    let Some(configuration) = Pool::configuration(&market) else {
      continue;
    };
    if configuration.stable_rate_borrowing_enabled {
      Pool::set_stable_rate_borrowing(&market, false)?;
    }
    if configuration.borrowing_enabled {
      Pool::set_borrowing(&market, false)?;
    }
  }
  Ok(())
}
