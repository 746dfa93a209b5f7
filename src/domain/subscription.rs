use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    None,
    Basic,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    #[default]
    Monthly,
    Yearly,
}

impl BillingInterval {
    /// Length of one billing period.
    pub fn months(self) -> u32 {
        match self {
            BillingInterval::Monthly => 1,
            BillingInterval::Yearly => 12,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTier::None => write!(f, "none"),
            PlanTier::Basic => write!(f, "basic"),
            PlanTier::Premium => write!(f, "premium"),
        }
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingInterval::Monthly => write!(f, "monthly"),
            BillingInterval::Yearly => write!(f, "yearly"),
        }
    }
}

/// A purchasable plan: price per period and the credits it grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub tier: PlanTier,
    pub interval: BillingInterval,
    /// Price in cents.
    pub price: u32,
    pub credits: u32,
    pub features: Vec<String>,
}

fn plan(
    tier: PlanTier,
    interval: BillingInterval,
    price: u32,
    credits: u32,
    features: &[&str],
) -> SubscriptionPlan {
    SubscriptionPlan {
        tier,
        interval,
        price,
        credits,
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

/// The plan catalogue offered at checkout.
pub fn default_plans() -> Vec<SubscriptionPlan> {
    vec![
        plan(
            PlanTier::Basic,
            BillingInterval::Monthly,
            999,
            100,
            &[
                "Up to 100 calculations per month",
                "Basic support",
                "Standard response time",
            ],
        ),
        plan(
            PlanTier::Basic,
            BillingInterval::Yearly,
            9990,
            1200,
            &[
                "Up to 1200 calculations per year",
                "Basic support",
                "Standard response time",
                "17% discount",
            ],
        ),
        plan(
            PlanTier::Premium,
            BillingInterval::Monthly,
            1999,
            300,
            &[
                "Up to 300 calculations per month",
                "Priority support",
                "Fast response time",
                "Advanced features",
            ],
        ),
        plan(
            PlanTier::Premium,
            BillingInterval::Yearly,
            19990,
            3600,
            &[
                "Up to 3600 calculations per year",
                "Priority support",
                "Fast response time",
                "Advanced features",
                "17% discount",
            ],
        ),
    ]
}

pub fn find_plan(tier: PlanTier, interval: BillingInterval) -> Option<SubscriptionPlan> {
    default_plans()
        .into_iter()
        .find(|p| p.tier == tier && p.interval == interval)
}
