//! Evaluation of [`Policy`] against a caller.

use crate::error::AuthError;
use crate::policy::Policy;
use agora_types::Identity;
use std::collections::BTreeSet;

/// The authenticated sender of one call plus the co-signer count it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub sender: Identity,
    pub co_signers: u32,
}

impl Caller {
    pub fn new(sender: Identity) -> Self {
        Self {
            sender,
            co_signers: 1,
        }
    }

    pub fn with_co_signers(mut self, co_signers: u32) -> Self {
        self.co_signers = co_signers;
        self
    }

    /// A context with no entity parties attached yet.
    pub fn context(&self) -> CallerContext<'_> {
        CallerContext::new(&self.sender, self.co_signers)
    }
}

/// The caller of one operation together with the parties of the target entity.
///
/// Parties that do not apply to the entity kind (a proposal has no borrower)
/// are `None`, so predicates on them fail closed.
#[derive(Clone, Copy, Debug)]
pub struct CallerContext<'a> {
    pub sender: &'a Identity,
    pub co_signers: u32,
    pub creator: Option<&'a Identity>,
    pub borrower: Option<&'a Identity>,
    pub investor: Option<&'a Identity>,
}

impl<'a> CallerContext<'a> {
    pub fn new(sender: &'a Identity, co_signers: u32) -> Self {
        Self {
            sender,
            co_signers,
            creator: None,
            borrower: None,
            investor: None,
        }
    }

    pub fn with_creator(mut self, creator: &'a Identity) -> Self {
        self.creator = Some(creator);
        self
    }

    pub fn with_parties(mut self, borrower: &'a Identity, investor: Option<&'a Identity>) -> Self {
        self.borrower = Some(borrower);
        self.investor = investor;
        self
    }
}

/// Evaluates capability predicates. Holds the fixed authorized-address set
/// and the co-signer count that satisfies [`Policy::MultisigQuorum`].
#[derive(Clone, Debug)]
pub struct AuthorizationGuard {
    authorized: BTreeSet<Identity>,
    min_signatures: u32,
}

impl AuthorizationGuard {
    pub const DEFAULT_MIN_SIGNATURES: u32 = 2;

    pub fn new(authorized: impl IntoIterator<Item = Identity>, min_signatures: u32) -> Self {
        Self {
            authorized: authorized.into_iter().collect(),
            min_signatures,
        }
    }

    pub fn is_authorized(&self, who: &Identity) -> bool {
        self.authorized.contains(who)
    }

    pub fn min_signatures(&self) -> u32 {
        self.min_signatures
    }

    /// Whether `ctx` satisfies `policy`.
    pub fn allows(&self, policy: &Policy, ctx: &CallerContext<'_>) -> bool {
        let is = |party: Option<&Identity>| party == Some(ctx.sender);
        match policy {
            Policy::Anyone => true,
            Policy::Creator => is(ctx.creator),
            Policy::Borrower => is(ctx.borrower),
            Policy::Investor => is(ctx.investor),
            Policy::EitherParty => is(ctx.borrower) || is(ctx.investor),
            Policy::AuthorizedSet => self.is_authorized(ctx.sender),
            Policy::MultisigQuorum => ctx.co_signers >= self.min_signatures,
            Policy::Not(inner) => !self.allows(inner, ctx),
            Policy::AnyOf(all) => all.iter().any(|p| self.allows(p, ctx)),
            Policy::AllOf(all) => all.iter().all(|p| self.allows(p, ctx)),
        }
    }

    /// Fail with [`AuthError::Unauthorized`] unless `ctx` satisfies `policy`.
    pub fn check(&self, policy: &Policy, ctx: &CallerContext<'_>) -> Result<(), AuthError> {
        if self.allows(policy, ctx) {
            return Ok(());
        }
        tracing::debug!(sender = %ctx.sender, required = %policy, "authorization denied");
        Err(AuthError::Unauthorized {
            sender: ctx.sender.clone(),
            required: policy.to_string(),
        })
    }
}

impl Default for AuthorizationGuard {
    fn default() -> Self {
        Self::new(Vec::new(), Self::DEFAULT_MIN_SIGNATURES)
    }
}
