use super::request::ProductType;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Goods and services tax applied to every quote. Not configurable.
pub const GST_RATE: Decimal = dec!(0.18);

/// Rounds a money amount to paise.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `(gst, total_with_gst)` for a pre-tax total.
pub fn apply_gst(total_before_gst: Decimal) -> (Decimal, Decimal) {
    let gst = round_money(total_before_gst * GST_RATE);
    (gst, total_before_gst + gst)
}

/// Itemized result of one calculation.
///
/// Built once by the pricing engine and never mutated afterwards. Optional
/// components only appear for the product types that have them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub calc_type: ProductType,
    /// Parent sheets run through the press.
    pub printing_sheets: u64,
    /// Printed impressions (sheets times printed sides).
    pub effective_sheets: u64,
    pub paper_cost: Decimal,
    pub printing_cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_printing_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside_printing_cost: Option<Decimal>,
    pub lamination_cost: Decimal,
    #[serde(rename = "spotUVCost")]
    pub spot_uv_cost: Decimal,
    pub coating_cost: Decimal,
    pub drip_off_cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folding_cost: Option<Decimal>,
    #[serde(rename = "totalCostBeforeGST")]
    pub total_cost_before_gst: Decimal,
    pub gst: Decimal,
    #[serde(rename = "totalCostWithGST")]
    pub total_cost_with_gst: Decimal,
}

/// Rounded components collected by a product calculator.
#[derive(Debug, Default)]
pub(crate) struct LineItems {
    pub printing_sheets: u64,
    pub effective_sheets: u64,
    pub paper: Decimal,
    pub printing: Decimal,
    pub cover_printing: Option<Decimal>,
    pub inside_printing: Option<Decimal>,
    pub lamination: Decimal,
    pub spot_uv: Decimal,
    pub coating: Decimal,
    pub drip_off: Decimal,
    pub binding: Option<Decimal>,
    pub folding: Option<Decimal>,
}

impl LineItems {
    /// Paper is carried inside the printing cost, so it is not added again.
    fn chargeable_total(&self) -> Decimal {
        self.printing
            + self.lamination
            + self.spot_uv
            + self.coating
            + self.drip_off
            + self.binding.unwrap_or_default()
            + self.folding.unwrap_or_default()
    }
}

impl CostBreakdown {
    pub(crate) fn from_line_items(calc_type: ProductType, items: LineItems) -> Self {
        let total_cost_before_gst = items.chargeable_total();
        let (gst, total_cost_with_gst) = apply_gst(total_cost_before_gst);

        Self {
            calc_type,
            printing_sheets: items.printing_sheets,
            effective_sheets: items.effective_sheets,
            paper_cost: items.paper,
            printing_cost: items.printing,
            cover_printing_cost: items.cover_printing,
            inside_printing_cost: items.inside_printing,
            lamination_cost: items.lamination,
            spot_uv_cost: items.spot_uv,
            coating_cost: items.coating,
            drip_off_cost: items.drip_off,
            binding_cost: items.binding,
            folding_cost: items.folding,
            total_cost_before_gst,
            gst,
            total_cost_with_gst,
        }
    }
}
