//! Role predicates and their AND/OR composition.

use std::fmt;

/// A capability predicate over the caller and the entity's parties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Policy {
    /// No restriction.
    Anyone,
    /// The proposal's creator.
    Creator,
    /// The loan's borrower.
    Borrower,
    /// The loan's investor (fails while no investor is set).
    Investor,
    /// Borrower or investor.
    EitherParty,
    /// A member of the fixed authorized-address set.
    AuthorizedSet,
    /// The call carries at least the configured number of co-signers.
    ///
    /// This is a bare counter supplied with the call, not a verification of
    /// independent signatures.
    MultisigQuorum,
    Not(Box<Policy>),
    AnyOf(Vec<Policy>),
    AllOf(Vec<Policy>),
}

impl Policy {
    /// Creator or an authorized address.
    pub fn creator_or_admin() -> Self {
        Self::AnyOf(vec![Self::Creator, Self::AuthorizedSet])
    }

    /// [`Policy::creator_or_admin`], or a call carrying the co-signer quorum.
    /// Only pause and resume accept the co-signer count.
    pub fn pause_authority() -> Self {
        Self::AnyOf(vec![Self::Creator, Self::AuthorizedSet, Self::MultisigQuorum])
    }

    /// Anyone except the borrower.
    pub fn not_borrower() -> Self {
        Self::Not(Box::new(Self::Borrower))
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anyone => write!(f, "anyone"),
            Self::Creator => write!(f, "creator"),
            Self::Borrower => write!(f, "borrower"),
            Self::Investor => write!(f, "investor"),
            Self::EitherParty => write!(f, "borrower or investor"),
            Self::AuthorizedSet => write!(f, "authorized address"),
            Self::MultisigQuorum => write!(f, "multisig quorum"),
            Self::Not(inner) => write!(f, "not {}", inner),
            Self::AnyOf(all) | Self::AllOf(all) => {
                let sep = if matches!(self, Self::AnyOf(_)) { " or " } else { " and " };
                let parts: Vec<String> = all.iter().map(|p| p.to_string()).collect();
                write!(f, "({})", parts.join(sep))
            }
        }
    }
}
