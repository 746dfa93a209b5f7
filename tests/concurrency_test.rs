use printquote::application::service::QuoteService;
use printquote::domain::account::UserId;
use printquote::domain::rates::RateConfig;
use printquote::domain::request::CalculationRequest;
use printquote::domain::subscription::{BillingInterval, PlanTier};
use printquote::error::QuoteError;
use printquote::infrastructure::in_memory::{InMemoryConfigStore, InMemoryCreditLedger};
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;

mod common;

const COATED_FLYER: &str = r#"{"calcType":"flyer","selectedSize":"A4","gsm":130,"paperRate":100,"totalSheets":1000,"coatingOption":"Single Side","spotUV":true}"#;

fn fixture_rates() -> RateConfig {
    RateConfig::from_json(&std::fs::read_to_string(common::RATES_FIXTURE).unwrap()).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_quotes_see_whole_configurations() {
    let service = Arc::new(QuoteService::new(
        Box::new(InMemoryConfigStore::new(fixture_rates())),
        Box::new(InMemoryCreditLedger::new()),
    ));
    service
        .subscribe(UserId(1), PlanTier::Premium, BillingInterval::Yearly)
        .await
        .unwrap();

    // The replacement moves two coefficients at once
    let mut updated = fixture_rates();
    updated.coating_minimum = dec!(2000);
    updated.spot_uv_fixed_per_plate = dec!(3000);

    let writer = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            for i in 0..50 {
                let config = if i % 2 == 0 {
                    updated.clone()
                } else {
                    fixture_rates()
                };
                service.update_rates(config).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let request = CalculationRequest::from_json(COATED_FLYER).unwrap();
                let mut pairs = Vec::new();
                for _ in 0..25 {
                    let quote = service.quote(UserId(1), &request).await.unwrap();
                    pairs.push((quote.breakdown.coating_cost, quote.breakdown.spot_uv_cost));
                    tokio::task::yield_now().await;
                }
                pairs
            })
        })
        .collect();

    writer.await.unwrap();

    let mut seen = HashSet::new();
    for reader in readers {
        seen.extend(reader.await.unwrap());
    }

    // 1000 sheets: coating 350 lifted to its minimum, spot UV 750 + one plate
    let original = (dec!(400), dec!(1950));
    let replaced = (dec!(2000), dec!(3750));
    assert!(seen.iter().all(|pair| *pair == original || *pair == replaced));

    let account = service.account(UserId(1)).await.unwrap();
    assert_eq!(account.credits, 3600 - 8 * 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_users_do_not_share_credits() {
    let service = Arc::new(QuoteService::new(
        Box::new(InMemoryConfigStore::new(fixture_rates())),
        Box::new(InMemoryCreditLedger::new()),
    ));
    for user in 1..=4 {
        service
            .subscribe(UserId(user), PlanTier::Basic, BillingInterval::Monthly)
            .await
            .unwrap();
    }

    let handles: Vec<_> = (1..=4u64)
        .flat_map(|user| (0..110).map(move |_| user))
        .map(|user| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let request = CalculationRequest::from_json(common::FLYER).unwrap();
                (user, service.quote(UserId(user), &request).await)
            })
        })
        .collect();

    let mut granted = [0u32; 5];
    for handle in handles {
        let (user, result) = handle.await.unwrap();
        match result {
            Ok(_) => granted[user as usize] += 1,
            Err(e) => assert!(matches!(e, QuoteError::CreditsExhausted(UserId(u)) if u == user)),
        }
    }

    assert_eq!(&granted[1..], &[100, 100, 100, 100]);
}
