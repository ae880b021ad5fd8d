//! Backing Keeper Pallet
//!
//! Automation adapter between an off-chain keeper and the asset trackers. The keeper polls
//! [`Pallet::check`] with an opaque payload naming a tracker and, when it reports `true`, submits
//! the same payload to [`Pallet::act`], which runs the tracker's emergency action.
//!
//! The payload is the SCALE encoding of a single `TrackerId`. The pallet keeps no storage.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<TrackerId> {
  /// A routed tracker with nothing to mitigate; its own work is charged separately.
  fn tracker() -> TrackerId;
}

const LOG_TARGET: &str = "runtime::backing-keeper";

#[frame::pallet]
pub mod pallet {
  use crate::weights::WeightInfo as _;
  use alloc::vec::Vec;
  use codec::DecodeAll;
  use frame::prelude::*;
  use primitives::TrackerRouter;

  #[pallet::config]
  pub trait Config: frame_system::Config {
    /// Reference to a tracker, as carried in keeper payloads.
    type TrackerId: Parameter + Member + MaxEncodedLen;

    /// Resolves tracker references to the trackers of this runtime.
    type Trackers: TrackerRouter<Self::TrackerId>;

    type WeightInfo: crate::weights::WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::TrackerId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  #[pallet::error]
  pub enum Error<T> {
    /// The payload is not the encoding of exactly one tracker reference.
    InvalidPayload,
    /// The runtime has no tracker under that reference.
    UnknownTracker,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Run the emergency action of the tracker encoded in `payload`.
    ///
    /// Callable by any signed origin. Succeeds without side effects when the tracker has nothing
    /// to mitigate. Charged for the heaviest routed tracker and refunded to the work done.
    #[pallet::call_index(0)]
    #[pallet::weight(
      T::WeightInfo::act().saturating_add(T::Trackers::max_emergency_action_weight())
    )]
    pub fn act(origin: OriginFor<T>, payload: Vec<u8>) -> DispatchResultWithPostInfo {
      let who = ensure_signed(origin)?;
      let tracker = Self::decode_tracker(&payload).ok_or(Error::<T>::InvalidPayload)?;
      log::debug!(target: crate::LOG_TARGET, "{:?} acting on tracker {:?}", who, tracker);
      let used = T::Trackers::execute_emergency_action(&tracker)
        .ok_or(Error::<T>::UnknownTracker)??;
      Ok(Some(T::WeightInfo::act().saturating_add(used)).into())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Whether the tracker encoded in `payload` has an emergency action due.
    ///
    /// The payload is returned unchanged so the keeper can hand it to [`Pallet::act`]. Payloads
    /// that do not decode, or name an unknown tracker, report `false`.
    pub fn check(payload: Vec<u8>) -> (bool, Vec<u8>) {
      let needed = Self::decode_tracker(&payload)
        .and_then(|tracker| T::Trackers::is_emergency_action_possible(&tracker))
        .unwrap_or(false);
      (needed, payload)
    }

    fn decode_tracker(payload: &[u8]) -> Option<T::TrackerId> {
      if payload.len() > <T::TrackerId as MaxEncodedLen>::max_encoded_len() {
        return None;
      }
      <T::TrackerId as DecodeAll>::decode_all(&mut &payload[..]).ok()
    }
  }
}
