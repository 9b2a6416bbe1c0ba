use serde::{Deserialize, Serialize};
use tracing::debug;

use super::evaluator::{EvaluationOptions, Verdict};
use super::rule::AccessRule;
use crate::claims::UserClaims;

/// How an ordered list of rules combines individual verdicts.
///
/// Single-rule evaluation is the primitive; a list only produces a decision
/// under a strategy the caller has named. There is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationStrategy {
    /// The first rule that does not abstain decides.
    FirstApplicable,
    /// Any deny wins over any number of permits.
    DenyOverrides,
    /// Any permit wins over any number of denies.
    AllowOverrides,
}

/// Ordered collection of rules sharing one combination strategy.
///
/// Populate it fully before sharing it across threads; evaluation is
/// read-only. When every rule abstains the list abstains too — mapping
/// that to allow or deny stays with the caller.
#[derive(Debug, Clone)]
pub struct AccessList {
    strategy: CombinationStrategy,
    rules: Vec<AccessRule>,
}

impl AccessList {
    pub fn new(strategy: CombinationStrategy) -> Self {
        Self {
            strategy,
            rules: Vec::new(),
        }
    }

    pub fn strategy(&self) -> CombinationStrategy {
        self.strategy
    }

    pub fn push(&mut self, rule: AccessRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule in order and combine the verdicts under the
    /// configured strategy. Short-circuits as soon as the strategy's
    /// outcome can no longer change.
    pub fn evaluate(&self, claims: &UserClaims, options: Option<&EvaluationOptions>) -> Verdict {
        let verdict = match self.strategy {
            CombinationStrategy::FirstApplicable => self
                .rules
                .iter()
                .map(|rule| rule.evaluate(claims, options))
                .find(Verdict::is_decisive)
                .unwrap_or(Verdict::Abstain),
            CombinationStrategy::DenyOverrides => {
                self.combine(claims, options, Verdict::Deny, Verdict::Permit)
            }
            CombinationStrategy::AllowOverrides => {
                self.combine(claims, options, Verdict::Permit, Verdict::Deny)
            }
        };
        debug!(
            subject = %claims.subject,
            strategy = ?self.strategy,
            rules = self.rules.len(),
            verdict = ?verdict,
            "access list evaluated"
        );
        verdict
    }

    /// Overriding verdict wins immediately; the weaker one only if it
    /// occurred and nothing overrode it.
    fn combine(
        &self,
        claims: &UserClaims,
        options: Option<&EvaluationOptions>,
        overriding: Verdict,
        weaker: Verdict,
    ) -> Verdict {
        let mut saw_weaker = false;
        for rule in &self.rules {
            let verdict = rule.evaluate(claims, options);
            if verdict == overriding {
                return overriding;
            }
            if verdict == weaker {
                saw_weaker = true;
            }
        }
        if saw_weaker {
            weaker
        } else {
            Verdict::Abstain
        }
    }
}
