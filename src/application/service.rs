use crate::domain::account::{UserAccount, UserId};
use crate::domain::breakdown::CostBreakdown;
use crate::domain::ports::{ConfigStoreBox, CreditLedgerBox};
use crate::domain::pricing;
use crate::domain::rates::RateConfig;
use crate::domain::request::CalculationRequest;
use crate::domain::subscription::{BillingInterval, PlanTier, find_plan};
use crate::error::{QuoteError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A priced request together with the caller's remaining balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(flatten)]
    pub breakdown: CostBreakdown,
    pub credits_remaining: u32,
}

/// Entry point for authenticated callers.
///
/// `QuoteService` owns the configuration source and the credit ledger. A quote
/// is computed against one configuration snapshot, and exactly one credit is
/// taken for each successful result.
pub struct QuoteService {
    config_store: ConfigStoreBox,
    ledger: CreditLedgerBox,
}

impl QuoteService {
    pub fn new(config_store: ConfigStoreBox, ledger: CreditLedgerBox) -> Self {
        Self {
            config_store,
            ledger,
        }
    }

    /// Prices `request` for `user` and charges one credit.
    ///
    /// Fails with `SubscriptionRequired` or `CreditsExhausted` before any
    /// calculation runs. A calculation error leaves the balance untouched.
    pub async fn quote(&self, user: UserId, request: &CalculationRequest) -> Result<Quote> {
        self.quote_at(user, request, Utc::now()).await
    }

    pub async fn quote_at(
        &self,
        user: UserId,
        request: &CalculationRequest,
        now: DateTime<Utc>,
    ) -> Result<Quote> {
        let account = self
            .ledger
            .account(user)
            .await?
            .filter(|account| account.has_active_subscription(now))
            .ok_or(QuoteError::SubscriptionRequired(user))?;

        if !account.has_credits() {
            return Err(QuoteError::CreditsExhausted(user));
        }

        let config = self.config_store.get_config().await?;
        let breakdown = pricing::calculate(request, &config)?;

        // Another quote may have taken the last credit since the check above
        let Some(credits_remaining) = self.ledger.try_deduct_credit(user).await? else {
            warn!(%user, "credit taken by a concurrent quote, result discarded");
            return Err(QuoteError::CreditsExhausted(user));
        };

        debug!(
            %user,
            calc_type = %breakdown.calc_type,
            total = %breakdown.total_cost_with_gst,
            credits_remaining,
            "quote issued"
        );

        Ok(Quote {
            breakdown,
            credits_remaining,
        })
    }

    /// The configuration new quotes are priced with.
    pub async fn rates(&self) -> Result<Arc<RateConfig>> {
        self.config_store.get_config().await
    }

    /// Replaces the rate configuration. An invalid document is rejected and
    /// the previous one stays in effect.
    pub async fn update_rates(&self, config: RateConfig) -> Result<()> {
        config.validate()?;
        self.config_store.put_config(config).await?;
        info!("rate configuration replaced");
        Ok(())
    }

    pub async fn account(&self, user: UserId) -> Result<UserAccount> {
        self.ledger
            .account(user)
            .await?
            .ok_or(QuoteError::AccountNotFound(user))
    }

    /// Starts a fresh period on the given plan, creating the account if needed.
    pub async fn subscribe(
        &self,
        user: UserId,
        tier: PlanTier,
        interval: BillingInterval,
    ) -> Result<UserAccount> {
        let plan = find_plan(tier, interval).ok_or_else(|| {
            QuoteError::invalid_input("plan", format!("no {tier} {interval} plan is offered"))
        })?;

        let account = self
            .ledger
            .update(
                user,
                Box::new(move |current| {
                    let mut account = current.unwrap_or_else(|| UserAccount::new(user));
                    account.activate(&plan, Utc::now())?;
                    Ok(account)
                }),
            )
            .await?;

        info!(%user, %tier, %interval, credits = account.credits, "subscription activated");
        Ok(account)
    }

    /// Stops renewal; credits stay usable until the period ends.
    pub async fn cancel_subscription(&self, user: UserId) -> Result<UserAccount> {
        let account = self
            .ledger
            .update(
                user,
                Box::new(move |current| {
                    let mut account = current.ok_or(QuoteError::AccountNotFound(user))?;
                    account.schedule_cancellation();
                    Ok(account)
                }),
            )
            .await?;

        info!(%user, "subscription set to cancel at period end");
        Ok(account)
    }

    /// Ends the subscription now and forfeits remaining credits.
    pub async fn expire_subscription(&self, user: UserId) -> Result<UserAccount> {
        let account = self
            .ledger
            .update(
                user,
                Box::new(move |current| {
                    let mut account = current.ok_or(QuoteError::AccountNotFound(user))?;
                    account.expire();
                    Ok(account)
                }),
            )
            .await?;

        info!(%user, "subscription expired");
        Ok(account)
    }
}
