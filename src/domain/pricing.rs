//! Cost formulas for every product type.
//!
//! All calculators follow the same shape: paper cost from the sheet count,
//! printing derived from paper, one line per selected finish, then GST on the
//! sum. Everything here is pure; the rate configuration is only read.

use super::breakdown::{CostBreakdown, LineItems, round_money};
use super::rates::RateConfig;
use super::request::{
    BindingType, BookSpec, BrochureSpec, CalculationRequest, Coverage, FlyerSpec, ProductType,
    Side,
};
use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Divisor of the paper-cost formula `rate * gsm * sheets / 3.22`.
pub const PAPER_COST_DIVISOR: Decimal = dec!(3.22);

/// Prices one request against a rate snapshot.
pub fn calculate(request: &CalculationRequest, config: &RateConfig) -> Result<CostBreakdown> {
    match request {
        CalculationRequest::Flyer(job) => price_flyer(job, config),
        CalculationRequest::Book(job) => price_book(job, config),
        CalculationRequest::Brochure(job) => price_brochure(job, config),
    }
}

/// Unrounded paper cost for `sheets` parent sheets.
pub fn paper_cost(paper_rate: Decimal, gsm: Decimal, sheets: u64) -> Decimal {
    paper_rate * gsm * Decimal::from(sheets) / PAPER_COST_DIVISOR
}

pub fn price_flyer(job: &FlyerSpec, config: &RateConfig) -> Result<CostBreakdown> {
    let sheets = job.total_sheets;
    let sides = Side::from_double_sided(job.is_double_sided);

    let paper = round_money(paper_cost(job.paper_rate, job.gsm, sheets));
    let printing = paper * Decimal::from(sides.multiplier());

    let lamination = match &job.lamination {
        Some(lamination) => lamination_cost(
            config,
            &lamination.lamination_type,
            sheets,
            lamination.side.multiplier(),
        )?,
        None => Decimal::ZERO,
    };
    let spot_uv = job.spot_uv.map_or(Decimal::ZERO, |side| {
        plate_finish_cost(
            sheets,
            config.spot_uv_rate,
            config.spot_uv_fixed_per_plate,
            side.multiplier(),
        )
    });
    let coating = job
        .coating
        .map_or(Decimal::ZERO, |side| coating_cost(config, sheets, side.multiplier()));

    Ok(CostBreakdown::from_line_items(
        ProductType::Flyer,
        LineItems {
            printing_sheets: sheets,
            effective_sheets: sheets * sides.multiplier(),
            paper,
            printing,
            lamination,
            spot_uv,
            coating,
            ..Default::default()
        },
    ))
}

pub fn price_book(job: &BookSpec, config: &RateConfig) -> Result<CostBreakdown> {
    let ups = job.selected_size.ups();
    // A cover spread is two finished panels; each inside leaf carries two pages.
    let cover_sheets = (job.quantity * 2).div_ceil(ups);
    let inside_sheets = (job.quantity * job.total_pages).div_ceil(2 * ups);

    let cover_paper = round_money(paper_cost(job.paper_rate, job.cover_gsm, cover_sheets));
    let inside_paper = round_money(paper_cost(job.paper_rate, job.inside_gsm, inside_sheets));

    let cover_printing = cover_paper;
    let inside_printing = round_money(
        inside_paper * dec!(2) * Decimal::from(job.ink.inside_plates()) / dec!(4),
    );

    let driver = |coverage: Coverage| -> (u64, u64) {
        match coverage {
            Coverage::CoverOnly => (cover_sheets, coverage.multiplier()),
            Coverage::AllPages => (cover_sheets + inside_sheets, coverage.multiplier()),
        }
    };

    let lamination = match &job.cover_lamination {
        Some(lamination_type) => {
            let (sheets, multiplier) = driver(job.lamination_scope);
            lamination_cost(config, lamination_type, sheets, multiplier)?
        }
        None => Decimal::ZERO,
    };
    let spot_uv = job.spot_uv.map_or(Decimal::ZERO, |coverage| {
        let (sheets, multiplier) = driver(coverage);
        plate_finish_cost(
            sheets,
            config.spot_uv_rate,
            config.spot_uv_fixed_per_plate,
            multiplier,
        )
    });
    let drip_off = job.drip_off.map_or(Decimal::ZERO, |coverage| {
        let (sheets, multiplier) = driver(coverage);
        plate_finish_cost(
            sheets,
            config.drip_off_rate,
            config.drip_off_fixed_per_plate,
            multiplier,
        )
    });
    let coating = job.coating.map_or(Decimal::ZERO, |coverage| {
        let (sheets, multiplier) = driver(coverage);
        coating_cost(config, sheets, multiplier)
    });

    let binding = match job.binding {
        BindingType::None => Decimal::ZERO,
        binding => {
            round_money(config.binding_rate(binding.as_str())? * Decimal::from(job.quantity))
        }
    };

    Ok(CostBreakdown::from_line_items(
        ProductType::Book,
        LineItems {
            printing_sheets: cover_sheets + inside_sheets,
            effective_sheets: cover_sheets + inside_sheets * 2,
            paper: cover_paper + inside_paper,
            printing: cover_printing + inside_printing,
            cover_printing: Some(cover_printing),
            inside_printing: Some(inside_printing),
            lamination,
            spot_uv,
            coating,
            drip_off,
            binding: Some(binding),
            folding: None,
        },
    ))
}

pub fn price_brochure(job: &BrochureSpec, config: &RateConfig) -> Result<CostBreakdown> {
    let sheets = job.quantity.div_ceil(job.selected_size.ups());
    let sides = Side::from_double_sided(job.is_double_sided);

    let paper = round_money(paper_cost(job.paper_rate, job.gsm, sheets));
    let printing = paper * Decimal::from(sides.multiplier());

    let lamination = match &job.lamination {
        Some(lamination) => lamination_cost(
            config,
            &lamination.lamination_type,
            sheets,
            lamination.side.multiplier(),
        )?,
        None => Decimal::ZERO,
    };
    let spot_uv = job.spot_uv.map_or(Decimal::ZERO, |side| {
        plate_finish_cost(
            sheets,
            config.spot_uv_rate,
            config.spot_uv_fixed_per_plate,
            side.multiplier(),
        )
    });
    let coating = job
        .coating
        .map_or(Decimal::ZERO, |side| coating_cost(config, sheets, side.multiplier()));

    let folding = match job.fold.folds() {
        0 => Decimal::ZERO,
        folds => round_money(
            config.base_fixed_cost
                + config.base_cost_per_extra * Decimal::from(job.quantity * folds),
        ),
    };

    Ok(CostBreakdown::from_line_items(
        ProductType::Brochure,
        LineItems {
            printing_sheets: sheets,
            effective_sheets: sheets * sides.multiplier(),
            paper,
            printing,
            lamination,
            spot_uv,
            coating,
            folding: Some(folding),
            ..Default::default()
        },
    ))
}

/// Per-sheet lamination, raised to the family minimum when one is configured.
fn lamination_cost(
    config: &RateConfig,
    lamination_type: &str,
    sheets: u64,
    multiplier: u64,
) -> Result<Decimal> {
    let rate = config.lamination_rate(lamination_type)?;
    let cost = Decimal::from(sheets) * rate * Decimal::from(multiplier);
    let cost = match config.lamination_floor(lamination_type) {
        Some(floor) => cost.max(floor),
        None => cost,
    };
    Ok(round_money(cost))
}

/// Finishes with a per-sheet rate plus a fixed charge per plate (spot UV, drip-off).
fn plate_finish_cost(sheets: u64, rate: Decimal, fixed_per_plate: Decimal, plates: u64) -> Decimal {
    round_money(Decimal::from(sheets) * rate + fixed_per_plate * Decimal::from(plates))
}

fn coating_cost(config: &RateConfig, sheets: u64, multiplier: u64) -> Decimal {
    let cost = Decimal::from(sheets) * config.coating_rate * Decimal::from(multiplier);
    round_money(cost.max(config.coating_minimum))
}
