//! Pure transforms from upstream response shapes to the gateway's output shapes.
//!
//! Every normalizer goes through [`schema::apply_schema`], so missing or null
//! fields get the same documented defaults everywhere and a wrong JSON type
//! is always reported as malformed upstream data.

pub mod explorer;
pub mod market;
pub mod schema;

pub use explorer::{
    normalize_address_info, normalize_address_tokens, normalize_balance, normalize_token_balances,
    normalize_transactions,
};
pub use market::normalize_market_info;
pub use schema::{apply_schema, DefaultValue, FieldKind, FieldSpec, SchemaError, UNKNOWN};
