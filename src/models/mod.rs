//! Upstream and response data models.
//!
//! Explorer and market payloads that only pass through are handled as JSON
//! by the normalizers; the types here cover the envelope check and the NFT
//! aggregation, which need typed joins.

pub mod explorer;
pub mod nft;

pub use explorer::ExplorerEnvelope;
pub use nft::{
    CatalogueItem, CataloguePage, DistributorDetail, EarningStatus, NftContractDetail, NftEarning,
    NftEarningsResponse, NftGroup, NftInfoResponse,
};
