//! Call envelope and results as they cross the host boundary.
//!
//! A host hands the engine one [`Call`] per operation, usually as JSON, and
//! gets back one [`Outcome`].

use agora_auth::Caller;
use agora_crypto::validate_identity;
use agora_governance::{Proposal, ProposalStatus, Voter};
use agora_lending::{Loan, LoanStatus};
use agora_types::Identity;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Proposal,
    Loan,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::Loan => "loan",
        }
    }
}

/// One operation against one entity.
///
/// `id` is absent for `create` and required by every other method. `args`
/// are positional, in the order each method documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub sender: String,
    /// Co-signatures the host counted on the call.
    #[serde(default = "default_co_signers")]
    pub co_signers: u32,
    pub entity: Entity,
    #[serde(default)]
    pub id: Option<u64>,
    pub method: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

fn default_co_signers() -> u32 {
    1
}

impl Call {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::MalformedCall(e.to_string()))
    }

    /// The sender as a checked identity, with the call's co-signer count.
    pub fn caller(&self) -> Result<Caller, EngineError> {
        let sender = wire_identity(&self.sender)?;
        Ok(Caller::new(sender).with_co_signers(self.co_signers))
    }
}

/// Parse an identity received from outside, including its checksum.
pub fn wire_identity(raw: &str) -> Result<Identity, EngineError> {
    if !validate_identity(raw) {
        return Err(EngineError::InvalidIdentity(raw.to_string()));
    }
    Identity::parse(raw).map_err(|_| EngineError::InvalidIdentity(raw.to_string()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Proposal(ProposalStatus),
    Loan(LoanStatus),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A new entity was stored under `id`.
    Created { id: u64 },
    /// A mutation was committed; the entity is now in `status`.
    Committed { status: Status },
    Proposal(Proposal),
    Voter(Voter),
    Loan(Loan),
}

impl Outcome {
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|e| EngineError::Codec(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_crypto::{derive_identity, public_key_from_seed};

    fn identity(seed: u8) -> Identity {
        derive_identity(&public_key_from_seed(&[seed; 32]))
    }

    #[test]
    fn parses_minimal_call() {
        let sender = identity(1);
        let json = format!(
            r#"{{"sender":"{}","entity":"loan","method":"create","args":[1000000,"rent",10,30,0]}}"#,
            sender
        );
        let call = Call::from_json(&json).unwrap();
        assert_eq!(call.entity, Entity::Loan);
        assert_eq!(call.co_signers, 1);
        assert_eq!(call.id, None);
        assert_eq!(call.args.len(), 5);
        assert_eq!(call.caller().unwrap().sender, sender);
    }

    #[test]
    fn rejects_bad_sender_and_malformed_json() {
        let call = Call::from_json(
            r#"{"sender":"agr_nobody","entity":"proposal","id":1,"method":"info"}"#,
        )
        .unwrap();
        assert!(matches!(call.caller(), Err(EngineError::InvalidIdentity(_))));
        assert!(matches!(
            Call::from_json(r#"{"sender":1}"#),
            Err(EngineError::MalformedCall(_))
        ));
    }

    #[test]
    fn outcome_json_shape() {
        let json = Outcome::Committed {
            status: Status::Loan(LoanStatus::Active),
        }
        .to_json()
        .unwrap();
        assert_eq!(json, r#"{"committed":{"status":{"loan":"Active"}}}"#);
        assert_eq!(
            Outcome::Created { id: 4 }.to_json().unwrap(),
            r#"{"created":{"id":4}}"#
        );
    }
}
