//! Wallet actions and the transaction payload built around them.

use super::{
    CastAction, CastForwardParams, CastParams, IAvoForwarder, IERC20, Nonce, SignatureParams,
};
use crate::constants::{
    MARKER_ACTION_DATA, MARKER_ACTION_TARGET, MOCK_SIGNATURE_LEN, MOCK_SIGNER, PAYLOAD_SOURCE,
};
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    sol_types::SolCall,
};
use serde::{Deserialize, Serialize};

/// A call the wallet executes as part of a cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Call target.
    pub target: Address,
    /// Calldata.
    #[serde(default)]
    pub data: Bytes,
    /// Native value sent along.
    #[serde(default)]
    pub value: U256,
    /// Operation kind (call, delegate call, flashloan).
    #[serde(default)]
    pub operation: U256,
}

impl Action {
    /// An ERC20 `transfer(to, amount)` on `token`.
    pub fn erc20_transfer(token: Address, to: Address, amount: U256) -> Self {
        Self {
            target: token,
            data: IERC20::transferCall { to, amount }.abi_encode().into(),
            value: U256::ZERO,
            operation: U256::ZERO,
        }
    }

    /// The marker action appended to every sourcing transfer.
    pub fn marker() -> Self {
        Self {
            target: MARKER_ACTION_TARGET,
            data: Bytes::from_static(&MARKER_ACTION_DATA),
            value: U256::ZERO,
            operation: U256::ZERO,
        }
    }

    /// The action set used to quote a sourcing transfer of `token` to `eoa`.
    pub fn sourcing_transfer(token: Address, eoa: Address) -> Vec<Self> {
        vec![Self::erc20_transfer(token, eoa, U256::from(1)), Self::marker()]
    }
}

impl From<&Action> for CastAction {
    fn from(action: &Action) -> Self {
        Self {
            target: action.target,
            data: action.data.clone(),
            value: action.value,
            operation: action.operation,
        }
    }
}

/// Cast parameters of a [`TransactionPayload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionParams {
    /// Actions to execute.
    pub actions: Vec<Action>,
    /// Action set id.
    pub id: U256,
    /// Wallet nonce.
    pub avo_nonce: Nonce,
    /// Salt, the ABI encoded creation timestamp in milliseconds.
    pub salt: B256,
    /// Source tag.
    pub source: Address,
    /// Arbitrary metadata emitted with the cast.
    pub metadata: Bytes,
}

/// Forwarding bounds. Always zero for estimations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardParams {
    /// Gas limit.
    pub gas: U256,
    /// Gas price.
    pub gas_price: U256,
    /// Lower validity bound.
    pub valid_after: U256,
    /// Upper validity bound.
    pub valid_until: U256,
    /// Native value.
    pub value: U256,
}

/// A cast built for a single estimation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPayload {
    /// Cast parameters.
    pub params: TransactionParams,
    /// Forwarding parameters.
    pub forward_params: ForwardParams,
}

impl TransactionPayload {
    /// Builds a payload for `actions` at `nonce`, salted with the current time.
    pub fn new(actions: Vec<Action>, nonce: Nonce) -> Self {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        Self::with_salt(actions, nonce, B256::from(U256::from(now)))
    }

    /// Builds a payload with an explicit salt.
    pub fn with_salt(actions: Vec<Action>, nonce: Nonce, salt: B256) -> Self {
        Self {
            params: TransactionParams {
                actions,
                id: U256::ZERO,
                avo_nonce: nonce,
                salt,
                source: PAYLOAD_SOURCE,
                metadata: Bytes::new(),
            },
            forward_params: ForwardParams::default(),
        }
    }

    /// Sets the action set id.
    pub fn with_id(mut self, id: U256) -> Self {
        self.params.id = id;
        self
    }

    /// Sets the metadata.
    pub fn with_metadata(mut self, metadata: Bytes) -> Self {
        self.params.metadata = metadata;
        self
    }
}

impl From<&TransactionParams> for CastParams {
    fn from(params: &TransactionParams) -> Self {
        Self {
            actions: params.actions.iter().map(Into::into).collect(),
            id: params.id,
            avoNonce: params.avo_nonce.as_signed(),
            salt: params.salt,
            source: params.source,
            metadata: params.metadata.clone(),
        }
    }
}

impl From<&ForwardParams> for CastForwardParams {
    fn from(params: &ForwardParams) -> Self {
        Self {
            gas: params.gas,
            gasPrice: params.gas_price,
            validAfter: params.valid_after,
            validUntil: params.valid_until,
            value: params.value,
        }
    }
}

/// Placeholder signatures, one per required signer.
///
/// These are max-length so signature verification is sized conservatively.
pub fn mock_signatures(count: u8) -> Vec<SignatureParams> {
    (0..count.max(1))
        .map(|_| SignatureParams {
            signature: Bytes::from(vec![0xff; MOCK_SIGNATURE_LEN]),
            signer: MOCK_SIGNER,
        })
        .collect()
}

/// A forwarder call for a given wallet and payload.
#[derive(Debug, Clone)]
pub struct ForwarderCall {
    /// Wallet owner.
    pub owner: Address,
    /// Wallet index.
    pub index: u32,
    /// Payload to execute.
    pub payload: TransactionPayload,
    /// Signatures attached to the cast.
    pub signatures: Vec<SignatureParams>,
}

impl ForwarderCall {
    /// The `simulateV1` call.
    pub fn simulate_call(&self) -> IAvoForwarder::simulateV1Call {
        IAvoForwarder::simulateV1Call {
            from_: self.owner,
            index_: self.index,
            params_: (&self.payload.params).into(),
            forwardParams_: (&self.payload.forward_params).into(),
            signaturesParams_: self.signatures.clone(),
        }
    }

    /// ABI encoded `executeV1` calldata.
    pub fn execute_calldata(&self) -> Bytes {
        IAvoForwarder::executeV1Call {
            from_: self.owner,
            index_: self.index,
            params_: (&self.payload.params).into(),
            forwardParams_: (&self.payload.forward_params).into(),
            signaturesParams_: self.signatures.clone(),
        }
        .abi_encode()
        .into()
    }
}

/// The `from`, `to` and `data` of a transaction built for sizing only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedTransaction {
    /// Sender.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Calldata.
    pub data: Bytes,
}
