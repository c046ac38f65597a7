//! Shared fakes for integration tests.

pub mod fake_chain_reader;
pub mod fake_http;
pub mod fake_rpc_node;

#[allow(unused_imports)]
pub use fake_chain_reader::FakeChainReader;
#[allow(unused_imports)]
pub use fake_http::FakeHttp;
#[allow(unused_imports)]
pub use fake_rpc_node::FakeRpcNode;
