use super::subscription::{BillingInterval, PlanTier, SubscriptionPlan};
use crate::error::{QuoteError, Result};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(UserId)
    }
}

/// Subscription state and remaining quote credits of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub user: UserId,
    pub plan: PlanTier,
    pub interval: BillingInterval,
    /// Quotes left in the current period.
    pub credits: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
}

impl UserAccount {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            plan: PlanTier::None,
            interval: BillingInterval::Monthly,
            credits: 0,
            started_at: None,
            ends_at: None,
            cancel_at_period_end: false,
        }
    }

    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_some_and(|ends_at| ends_at > now)
    }

    pub fn has_credits(&self) -> bool {
        self.credits > 0
    }

    /// Takes one credit, failing without change when none are left.
    pub fn deduct_credit(&mut self) -> Result<()> {
        if self.credits > 0 {
            self.credits -= 1;
            Ok(())
        } else {
            Err(QuoteError::CreditsExhausted(self.user))
        }
    }

    /// Starts a fresh period on `plan`, replacing any remaining credits.
    pub fn activate(&mut self, plan: &SubscriptionPlan, now: DateTime<Utc>) -> Result<()> {
        let ends_at = now
            .checked_add_months(Months::new(plan.interval.months()))
            .ok_or_else(|| QuoteError::invalid_input("plan", "billing period out of range"))?;

        self.plan = plan.tier;
        self.interval = plan.interval;
        self.credits = plan.credits;
        self.started_at = Some(now);
        self.ends_at = Some(ends_at);
        self.cancel_at_period_end = false;
        Ok(())
    }

    /// Keeps the current period running but stops renewal.
    pub fn schedule_cancellation(&mut self) {
        self.cancel_at_period_end = true;
    }

    /// Ends the subscription immediately and forfeits remaining credits.
    pub fn expire(&mut self) {
        self.plan = PlanTier::None;
        self.credits = 0;
        self.ends_at = None;
        self.cancel_at_period_end = false;
    }
}
