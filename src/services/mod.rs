//! Application service layer.
//!
//! Services sit between the HTTP handlers and the upstream fetchers. They
//! own cache keys and TTLs, normalization, and the cross-source join for the
//! NFT aggregation. Every operation takes a [`RequestContext`] captured once
//! when the request entered.

pub mod aggregator;
pub mod context;
pub mod explorer;
pub mod market;
pub mod nft;
pub mod resources;

pub use aggregator::{group_catalogue, image_url_for, NftInfoAggregator};
pub use context::{ChainReaders, ContextFactory, RequestContext};
pub use explorer::ExplorerFetcher;
pub use market::MarketFetcher;
pub use nft::{fetch_nft_earnings, read_distributor, read_nft_contract, read_token_earnings};
pub use resources::{canonical_address, ResourceService, DEFAULT_LIMIT, DEFAULT_PAGE};
