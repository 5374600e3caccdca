//! Proposal governance for the agora engine.
//!
//! A proposal is created `Active` (or `Draft`), collects weighted votes
//! inside its window, and resolves to `Passed`, `Rejected` or `Expired` on
//! `execute`. It can be vetoed, paused, resumed, cancelled or extended along
//! the way. Voting power lives in per-(proposal, identity) [`Voter`] records
//! and moves between them through delegation.

pub mod delegation;
pub mod engine;
pub mod error;
pub mod params;
pub mod proposal;
pub mod voter;

pub use delegation::{cancel_delegation, delegate};
pub use engine::ProposalMachine;
pub use error::GovernanceError;
pub use params::GovernanceParams;
pub use proposal::{NewProposal, Proposal, ProposalStatus, VoteChoice};
pub use voter::Voter;
