//! Polling contract between the backing keeper and the per-version asset trackers.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use core::marker::PhantomData;
use polkadot_sdk::sp_runtime::{DispatchError, Weight};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Major version of the lending protocol an asset tracker is attached to.
///
/// `V2` markets are mitigated by freezing, `V3` markets by zeroing collateral LTV.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum ProtocolVersion {
  V2,
  V3,
}

/// A tracker that can tell whether mitigation is due and apply it.
///
/// `()` stands for a protocol version that has no tracker deployed.
pub trait BackingGuard {
  /// `true` while some tracked reserve is unbacked and not yet mitigated.
  fn is_emergency_action_possible() -> bool;

  /// Applies mitigation and returns the weight actually used. Succeeds without side effects
  /// when nothing is due.
  fn execute_emergency_action() -> Result<Weight, DispatchError>;

  /// Upper bound of what [`BackingGuard::execute_emergency_action`] may consume.
  fn emergency_action_weight() -> Weight;

  fn is_deployed() -> bool {
    true
  }
}

impl BackingGuard for () {
  fn is_emergency_action_possible() -> bool {
    false
  }

  fn execute_emergency_action() -> Result<Weight, DispatchError> {
    Ok(Weight::zero())
  }

  fn emergency_action_weight() -> Weight {
    Weight::zero()
  }

  fn is_deployed() -> bool {
    false
  }
}

/// Maps a tracker reference decoded from a keeper payload to a concrete tracker.
///
/// Both dispatching methods return `None` for trackers the runtime does not know about.
pub trait TrackerRouter<TrackerId> {
  fn is_emergency_action_possible(tracker: &TrackerId) -> Option<bool>;

  fn execute_emergency_action(tracker: &TrackerId) -> Option<Result<Weight, DispatchError>>;

  /// Heaviest emergency action among the routed trackers.
  fn max_emergency_action_weight() -> Weight;
}

impl<TrackerId> TrackerRouter<TrackerId> for () {
  fn is_emergency_action_possible(_tracker: &TrackerId) -> Option<bool> {
    None
  }

  fn execute_emergency_action(_tracker: &TrackerId) -> Option<Result<Weight, DispatchError>> {
    None
  }

  fn max_emergency_action_weight() -> Weight {
    Weight::zero()
  }
}

/// Routes [`ProtocolVersion`] references to the V2 (`Legacy`) and V3 (`Current`) trackers.
pub struct VersionedTrackers<Legacy, Current>(PhantomData<(Legacy, Current)>);

impl<Legacy: BackingGuard, Current: BackingGuard> VersionedTrackers<Legacy, Current> {
  fn route<R>(
    version: &ProtocolVersion,
    legacy: impl FnOnce() -> R,
    current: impl FnOnce() -> R,
  ) -> Option<R> {
    match version {
      ProtocolVersion::V2 => Legacy::is_deployed().then(legacy),
      ProtocolVersion::V3 => Current::is_deployed().then(current),
    }
  }
}

impl<Legacy: BackingGuard, Current: BackingGuard> TrackerRouter<ProtocolVersion>
  for VersionedTrackers<Legacy, Current>
{
  fn is_emergency_action_possible(version: &ProtocolVersion) -> Option<bool> {
    Self::route(
      version,
      Legacy::is_emergency_action_possible,
      Current::is_emergency_action_possible,
    )
  }

  fn execute_emergency_action(version: &ProtocolVersion) -> Option<Result<Weight, DispatchError>> {
    Self::route(
      version,
      Legacy::execute_emergency_action,
      Current::execute_emergency_action,
    )
  }

  fn max_emergency_action_weight() -> Weight {
    Legacy::emergency_action_weight().max(Current::emergency_action_weight())
  }
}
