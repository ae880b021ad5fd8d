use crate as pallet_backing_keeper;
use codec::{Decode, Encode};
use core::cell::RefCell;
use pallet_asset_tracker::{FreezeReserves, ZeroCollateralLtv};
use polkadot_sdk::frame_support::{
  assert_ok, construct_runtime,
  instances::Instance1,
  parameter_types,
  storage::unhashed,
  traits::{ConstU32, ConstU64, ConstU128, Get},
};
use polkadot_sdk::frame_system::{EnsureRoot, EnsureSigned};
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult, Weight,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  BackingGuard, MarketConfiguration, Permill, PoolControlPlane, ProtocolVersion, ReserveFeed,
  VersionedTrackers,
};
use std::collections::BTreeMap;

type Block = polkadot_sdk::frame_system::mocking::MockBlock<Test>;
type Balance = u128;
pub type AccountId = u64;
pub type AssetId = u32;
pub type FeedId = u64;

pub const OWNER: AccountId = 1;
pub const ALICE: AccountId = 2;
pub const KEEPER: AccountId = 3;

pub const USDC: AssetId = 1;
pub const USDT: AssetId = 2;
pub const DAI: AssetId = 3;
pub const WETH: AssetId = 4;

pub const RESERVES: [AssetId; 4] = [USDC, USDT, DAI, WETH];
pub const SUPPLY: Balance = 1_000_000;

construct_runtime!(
  pub enum Test {
    System: polkadot_sdk::frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    FeedRegistry: pallet_feed_registry,
    AssetTrackerV2: pallet_asset_tracker,
    AssetTrackerV3: pallet_asset_tracker::<Instance1>,
    BackingKeeper: pallet_backing_keeper,
  }
);

impl polkadot_sdk::frame_system::Config for Test {
  type BaseCallFilter = polkadot_sdk::frame_support::traits::Everything;
  type BlockWeights = ();
  type BlockLength = ();
  type DbWeight = ();
  type RuntimeOrigin = RuntimeOrigin;
  type RuntimeCall = RuntimeCall;
  type Nonce = u64;
  type Hash = polkadot_sdk::sp_core::H256;
  type Hashing = BlakeTwo256;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Block = Block;
  type RuntimeEvent = RuntimeEvent;
  type BlockHashCount = ConstU64<250>;
  type Version = ();
  type PalletInfo = PalletInfo;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<Balance>;
  type OnNewAccount = ();
  type OnKilledAccount = ();
  type SystemWeightInfo = ();
  type SS58Prefix = ();
  type OnSetCode = ();
  type MaxConsumers = ConstU32<16>;
  type RuntimeTask = ();
  type ExtensionsWeightInfo = ();
  type SingleBlockMigrations = ();
  type MultiBlockMigrator = ();
  type PreInherents = ();
  type PostInherents = ();
  type PostTransactions = ();
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ConstU32<50>;
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = Balance;
  type RuntimeEvent = RuntimeEvent;
  type DustRemoval = ();
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = RuntimeHoldReason;
  type RuntimeFreezeReason = RuntimeFreezeReason;
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = Balance;
  type AssetId = AssetId;
  type AssetIdParameter = AssetId;
  type Currency = Balances;
  type CreateOrigin = EnsureSigned<AccountId>;
  type ForceOrigin = EnsureRoot<AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<1000>;
  type CallbackHandle = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = ();
  type Holder = ();
}

thread_local! {
  static FEED_ANSWERS: RefCell<BTreeMap<FeedId, i128>> = RefCell::new(BTreeMap::new());
}

parameter_types! {
  /// When set, the pools reject changes to the borrowing switches.
  pub static PoolAdminRevoked: bool = false;
  /// When set, the V2 tracker is reported as not deployed.
  pub static LegacyRetired: bool = false;
}

pub struct MockReserveFeeds;
impl ReserveFeed<FeedId> for MockReserveFeeds {
  fn latest_answer(feed: &FeedId) -> i128 {
    FEED_ANSWERS.with(|answers| answers.borrow().get(feed).copied().unwrap_or_default())
  }
}

#[cfg(feature = "runtime-benchmarks")]
pub struct FeedRegistryBenchmarkHelper;
#[cfg(feature = "runtime-benchmarks")]
impl pallet_feed_registry::BenchmarkHelper<AssetId, FeedId, u64> for FeedRegistryBenchmarkHelper {
  fn asset(seed: u32) -> AssetId {
    1_000 + seed
  }

  fn feed(seed: u32) -> FeedId {
    10_000 + u64::from(seed)
  }

  fn bridge_wrapper() -> u64 {
    0
  }
}

impl pallet_feed_registry::Config for Test {
  type RegistryOrigin = EnsureRoot<AccountId>;
  type AssetId = AssetId;
  type FeedId = FeedId;
  type BridgeWrapperId = u64;
  type ReserveFeeds = MockReserveFeeds;
  type BridgeWrappers = ();
  type Supply = Assets;
  type StrictFeedRemoval = polkadot_sdk::frame_support::traits::ConstBool<false>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = FeedRegistryBenchmarkHelper;
}

/// Change recorded by a mock pool, in the order it was applied.
#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq)]
pub enum PoolEvent {
  ReserveFrozen {
    asset: AssetId,
  },
  BorrowingChanged {
    asset: AssetId,
    enabled: bool,
  },
  StableRateBorrowingChanged {
    asset: AssetId,
    enabled: bool,
  },
  CollateralConfigurationChanged {
    asset: AssetId,
    ltv: Permill,
    liquidation_threshold: Permill,
    liquidation_bonus: Permill,
  },
}

/// Lending pool kept in unhashed storage so that reverted extrinsics revert it too.
pub struct MockPool<const POOL: u8>;
pub type LegacyPool = MockPool<2>;
pub type CurrentPool = MockPool<3>;

impl<const POOL: u8> MockPool<POOL> {
  fn markets_key() -> Vec<u8> {
    (b"mock-pool:markets", POOL).encode()
  }

  fn market_key(asset: &AssetId) -> Vec<u8> {
    (b"mock-pool:market:", POOL, asset).encode()
  }

  fn events_key() -> Vec<u8> {
    (b"mock-pool:events", POOL).encode()
  }

  pub fn list_market(asset: AssetId, configuration: MarketConfiguration) {
    let mut markets = <Self as PoolControlPlane<AssetId>>::markets();
    if !markets.contains(&asset) {
      markets.push(asset);
      unhashed::put(&Self::markets_key(), &markets);
    }
    unhashed::put(&Self::market_key(&asset), &configuration);
  }

  pub fn market(asset: AssetId) -> MarketConfiguration {
    <Self as PoolControlPlane<AssetId>>::configuration(&asset).expect("market is listed")
  }

  pub fn events() -> Vec<PoolEvent> {
    unhashed::get(&Self::events_key()).unwrap_or_default()
  }

  fn update(
    asset: &AssetId,
    change: impl FnOnce(&mut MarketConfiguration),
    event: PoolEvent,
  ) -> DispatchResult {
    let mut configuration = <Self as PoolControlPlane<AssetId>>::configuration(asset)
      .ok_or(DispatchError::Other("market not listed"))?;
    change(&mut configuration);
    unhashed::put(&Self::market_key(asset), &configuration);
    let mut events = Self::events();
    events.push(event);
    unhashed::put(&Self::events_key(), &events);
    Ok(())
  }

  fn ensure_pool_admin() -> DispatchResult {
    if PoolAdminRevoked::get() {
      return Err(DispatchError::Other("pool admin revoked"));
    }
    Ok(())
  }
}

impl<const POOL: u8> PoolControlPlane<AssetId> for MockPool<POOL> {
  fn markets() -> Vec<AssetId> {
    unhashed::get(&Self::markets_key()).unwrap_or_default()
  }

  fn configuration(asset: &AssetId) -> Option<MarketConfiguration> {
    unhashed::get(&Self::market_key(asset))
  }

  fn freeze(asset: &AssetId) -> DispatchResult {
    Self::update(
      asset,
      |market| market.frozen = true,
      PoolEvent::ReserveFrozen { asset: *asset },
    )
  }

  fn set_borrowing(asset: &AssetId, enabled: bool) -> DispatchResult {
    Self::ensure_pool_admin()?;
    Self::update(
      asset,
      |market| market.borrowing_enabled = enabled,
      PoolEvent::BorrowingChanged {
        asset: *asset,
        enabled,
      },
    )
  }

  fn set_stable_rate_borrowing(asset: &AssetId, enabled: bool) -> DispatchResult {
    Self::ensure_pool_admin()?;
    Self::update(
      asset,
      |market| market.stable_rate_borrowing_enabled = enabled,
      PoolEvent::StableRateBorrowingChanged {
        asset: *asset,
        enabled,
      },
    )
  }

  fn configure_collateral(
    asset: &AssetId,
    ltv: Permill,
    liquidation_threshold: Permill,
    liquidation_bonus: Permill,
  ) -> DispatchResult {
    Self::update(
      asset,
      |market| {
        market.ltv = ltv;
        market.liquidation_threshold = liquidation_threshold;
        market.liquidation_bonus = liquidation_bonus;
      },
      PoolEvent::CollateralConfigurationChanged {
        asset: *asset,
        ltv,
        liquidation_threshold,
        liquidation_bonus,
      },
    )
  }
}

#[cfg(feature = "runtime-benchmarks")]
pub struct TrackerBenchmarkHelper;
#[cfg(feature = "runtime-benchmarks")]
impl pallet_asset_tracker::BenchmarkHelper<AssetId> for TrackerBenchmarkHelper {
  fn asset(seed: u32) -> AssetId {
    100 + seed
  }

  fn make_unbacked(asset: &AssetId) {
    back_asset(*asset, SUPPLY, 0);
  }

  fn list_market(asset: &AssetId) {
    LegacyPool::list_market(*asset, open_market());
    CurrentPool::list_market(*asset, open_market());
  }
}

impl pallet_asset_tracker::Config for Test {
  type AdminOrigin = EnsureRoot<AccountId>;
  type AssetId = AssetId;
  type Backing = FeedRegistry;
  type Mitigation = FreezeReserves<LegacyPool>;
  type MaxAssets = ConstU32<8>;
  type MaxMarkets = ConstU32<16>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = TrackerBenchmarkHelper;
}

impl pallet_asset_tracker::Config<Instance1> for Test {
  type AdminOrigin = EnsureRoot<AccountId>;
  type AssetId = AssetId;
  type Backing = FeedRegistry;
  type Mitigation = ZeroCollateralLtv<CurrentPool>;
  // Heavier than V2, so the keeper is charged for V3 on every call.
  type MaxAssets = ConstU32<12>;
  type MaxMarkets = ConstU32<16>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = TrackerBenchmarkHelper;
}

/// Tracker `G`, reported as not deployed while `Retired` is set.
pub struct Retirable<G, Retired>(core::marker::PhantomData<(G, Retired)>);
impl<G: BackingGuard, Retired: Get<bool>> BackingGuard for Retirable<G, Retired> {
  fn is_emergency_action_possible() -> bool {
    G::is_emergency_action_possible()
  }

  fn execute_emergency_action() -> Result<Weight, DispatchError> {
    G::execute_emergency_action()
  }

  fn emergency_action_weight() -> Weight {
    G::emergency_action_weight()
  }

  fn is_deployed() -> bool {
    !Retired::get() && G::is_deployed()
  }
}

pub type RuntimeTrackers =
  VersionedTrackers<Retirable<AssetTrackerV2, LegacyRetired>, AssetTrackerV3>;

#[cfg(feature = "runtime-benchmarks")]
pub struct KeeperBenchmarkHelper;
#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<ProtocolVersion> for KeeperBenchmarkHelper {
  fn tracker() -> ProtocolVersion {
    ProtocolVersion::V2
  }
}

impl pallet_backing_keeper::Config for Test {
  type TrackerId = ProtocolVersion;
  type Trackers = RuntimeTrackers;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = KeeperBenchmarkHelper;
}

/// A market accepting collateral and both borrowing modes.
pub fn open_market() -> MarketConfiguration {
  MarketConfiguration {
    ltv: Permill::from_percent(75),
    liquidation_threshold: Permill::from_percent(80),
    liquidation_bonus: Permill::from_percent(5),
    frozen: false,
    borrowing_enabled: true,
    stable_rate_borrowing_enabled: true,
  }
}

pub fn feed_of(asset: AssetId) -> FeedId {
  10 + u64::from(asset)
}

pub fn set_answer(asset: AssetId, answer: i128) {
  FEED_ANSWERS.with(|answers| answers.borrow_mut().insert(feed_of(asset), answer));
}

/// Creates `asset` with `supply` minted to Alice and registers a feed reporting `reserve`.
pub fn back_asset(asset: AssetId, supply: Balance, reserve: i128) {
  assert_ok!(Assets::force_create(RuntimeOrigin::root(), asset, OWNER, true, 1));
  assert_ok!(Assets::mint(RuntimeOrigin::signed(OWNER), asset, ALICE, supply));
  assert_ok!(FeedRegistry::set_feed(RuntimeOrigin::root(), asset, feed_of(asset)));
  set_answer(asset, reserve);
}

/// Makes the feed of `asset` report one unit less than its supply.
pub fn break_backing(asset: AssetId) {
  set_answer(asset, SUPPLY as i128 - 1);
}

/// Every reserve backed, listed as an open market in both pools and tracked by both trackers.
pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  FEED_ANSWERS.with(|answers| answers.borrow_mut().clear());
  PoolAdminRevoked::set(false);
  LegacyRetired::set(false);

  let mut t = polkadot_sdk::frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: vec![(OWNER, 1000), (ALICE, 1000), (KEEPER, 1000)],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_asset_tracker::GenesisConfig::<Test> {
    assets: RESERVES.to_vec(),
    _marker: Default::default(),
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_asset_tracker::GenesisConfig::<Test, Instance1> {
    assets: RESERVES.to_vec(),
    _marker: Default::default(),
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| {
    polkadot_sdk::frame_system::Pallet::<Test>::set_block_number(1);
    for asset in RESERVES {
      back_asset(asset, SUPPLY, SUPPLY as i128);
      LegacyPool::list_market(asset, open_market());
      CurrentPool::list_market(asset, open_market());
    }
    System::reset_events();
  });
  ext
}
