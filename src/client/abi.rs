//! Minimal ABI encoding for the view calls the gateway makes.
//!
//! Only static `uint256` arguments and `uint256`, `address` and `string`
//! return values are supported.

use crate::domain::Address;
use crate::error::{ChainError, ChainResult};
use alloy_primitives::{keccak256, U256};

const WORD: usize = 32;

/// Return type of a contract method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiType {
    Uint,
    Address,
    String,
}

/// A decoded return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Uint(U256),
    Address(Address),
    String(String),
}

impl AbiValue {
    pub fn as_uint(&self) -> ChainResult<U256> {
        match self {
            Self::Uint(v) => Ok(*v),
            other => Err(ChainError::Decode(format!("expected uint, got {:?}", other))),
        }
    }

    pub fn as_address(&self) -> ChainResult<&Address> {
        match self {
            Self::Address(a) => Ok(a),
            other => Err(ChainError::Decode(format!("expected address, got {:?}", other))),
        }
    }

    pub fn as_string(&self) -> ChainResult<&str> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(ChainError::Decode(format!("expected string, got {:?}", other))),
        }
    }
}

/// A view method: canonical signature plus its single return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractMethod {
    pub signature: &'static str,
    pub output: AbiType,
}

impl ContractMethod {
    pub const fn new(signature: &'static str, output: AbiType) -> Self {
        Self { signature, output }
    }

    /// First four bytes of keccak256 of the signature.
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Calldata for this method with `args` as `uint256` words.
    pub fn encode_call(&self, args: &[U256]) -> Vec<u8> {
        let mut data = Vec::with_capacity(4 + WORD * args.len());
        data.extend_from_slice(&self.selector());
        for arg in args {
            data.extend_from_slice(&arg.to_be_bytes::<WORD>());
        }
        data
    }

    /// Calldata as a `0x`-prefixed hex string.
    pub fn encode_call_hex(&self, args: &[U256]) -> String {
        format!("0x{}", hex::encode(self.encode_call(args)))
    }

    /// Decode return data according to `self.output`.
    pub fn decode(&self, data: &[u8]) -> ChainResult<AbiValue> {
        decode(self.output, data)
    }
}

// NFT contract views
pub const NAME: ContractMethod = ContractMethod::new("name()", AbiType::String);
pub const SYMBOL: ContractMethod = ContractMethod::new("symbol()", AbiType::String);
pub const TOTAL_SUPPLY: ContractMethod = ContractMethod::new("totalSupply()", AbiType::Uint);

// Gas fee distributor views
pub const NFT_CONTRACT: ContractMethod = ContractMethod::new("nftContract()", AbiType::Address);
pub const VIEW_TOTAL_EARNINGS: ContractMethod =
    ContractMethod::new("viewTotalEarnings()", AbiType::Uint);
pub const TOTAL_DISTRIBUTED: ContractMethod =
    ContractMethod::new("totalDistributed()", AbiType::Uint);
pub const CALCULATE_USER_EARNINGS: ContractMethod =
    ContractMethod::new("calculateUserEarnings(uint256)", AbiType::Uint);
pub const USER_WITHDRAWN_PER_NFT_ID: ContractMethod =
    ContractMethod::new("userWithdrawnPerNFTID(uint256)", AbiType::Uint);

/// Decode `0x`-prefixed hex return data.
pub fn decode_hex(output: AbiType, data: &str) -> ChainResult<AbiValue> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    let bytes = hex::decode(stripped).map_err(|e| ChainError::Decode(e.to_string()))?;
    decode(output, &bytes)
}

pub fn decode(output: AbiType, data: &[u8]) -> ChainResult<AbiValue> {
    if data.is_empty() {
        return Err(ChainError::Decode("empty return data".to_string()));
    }

    match output {
        AbiType::Uint => Ok(AbiValue::Uint(U256::from_be_slice(word(data, 0)?))),
        AbiType::Address => {
            let w = word(data, 0)?;
            let address = Address::from_slice(&w[12..])
                .map_err(|e| ChainError::Decode(e.to_string()))?;
            Ok(AbiValue::Address(address))
        }
        AbiType::String => {
            let offset = to_usize(word(data, 0)?)?;
            let len = to_usize(word(data, offset)?)?;
            let start = offset + WORD;
            let end = start
                .checked_add(len)
                .filter(|end| *end <= data.len())
                .ok_or_else(|| ChainError::Decode("string out of bounds".to_string()))?;
            let s = String::from_utf8(data[start..end].to_vec())
                .map_err(|e| ChainError::Decode(e.to_string()))?;
            Ok(AbiValue::String(s))
        }
    }
}

fn word(data: &[u8], offset: usize) -> ChainResult<&[u8]> {
    data.get(offset..offset.saturating_add(WORD))
        .filter(|w| w.len() == WORD)
        .ok_or_else(|| ChainError::Decode(format!("no 32-byte word at offset {}", offset)))
}

/// A word used as an offset or length.
fn to_usize(word: &[u8]) -> ChainResult<usize> {
    usize::try_from(U256::from_be_slice(word)).map_err(|e| ChainError::Decode(e.to_string()))
}
