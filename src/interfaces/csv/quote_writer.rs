use crate::application::service::Quote;
use crate::domain::account::UserId;
use crate::domain::request::ProductType;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

const HEADER: [&str; 19] = [
    "request",
    "user",
    "calc_type",
    "printing_sheets",
    "effective_sheets",
    "paper_cost",
    "printing_cost",
    "cover_printing_cost",
    "inside_printing_cost",
    "lamination_cost",
    "spot_uv_cost",
    "coating_cost",
    "drip_off_cost",
    "binding_cost",
    "folding_cost",
    "total_cost_before_gst",
    "gst",
    "total_cost_with_gst",
    "credits_remaining",
];

/// One quote flattened into a CSV row. Money is written with two decimals;
/// components a product does not have are left empty.
#[derive(Serialize)]
struct QuoteRow {
    request: usize,
    user: UserId,
    calc_type: ProductType,
    printing_sheets: u64,
    effective_sheets: u64,
    paper_cost: String,
    printing_cost: String,
    cover_printing_cost: String,
    inside_printing_cost: String,
    lamination_cost: String,
    spot_uv_cost: String,
    coating_cost: String,
    drip_off_cost: String,
    binding_cost: String,
    folding_cost: String,
    total_cost_before_gst: String,
    gst: String,
    total_cost_with_gst: String,
    credits_remaining: u32,
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn optional_money(amount: Option<Decimal>) -> String {
    amount.map(money).unwrap_or_default()
}

impl QuoteRow {
    fn new(request: usize, user: UserId, quote: &Quote) -> Self {
        let b = &quote.breakdown;
        Self {
            request,
            user,
            calc_type: b.calc_type,
            printing_sheets: b.printing_sheets,
            effective_sheets: b.effective_sheets,
            paper_cost: money(b.paper_cost),
            printing_cost: money(b.printing_cost),
            cover_printing_cost: optional_money(b.cover_printing_cost),
            inside_printing_cost: optional_money(b.inside_printing_cost),
            lamination_cost: money(b.lamination_cost),
            spot_uv_cost: money(b.spot_uv_cost),
            coating_cost: money(b.coating_cost),
            drip_off_cost: money(b.drip_off_cost),
            binding_cost: optional_money(b.binding_cost),
            folding_cost: optional_money(b.folding_cost),
            total_cost_before_gst: money(b.total_cost_before_gst),
            gst: money(b.gst),
            total_cost_with_gst: money(b.total_cost_with_gst),
            credits_remaining: quote.credits_remaining,
        }
    }
}

/// Writes quotes as CSV rows, header first.
pub struct QuoteWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> QuoteWriter<W> {
    /// Creates the writer and emits the header, so an empty run still
    /// produces a well-formed document.
    pub fn new(sink: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        writer.write_record(HEADER)?;
        Ok(Self { writer })
    }

    pub fn write_quote(&mut self, request: usize, user: UserId, quote: &Quote) -> Result<()> {
        self.writer.serialize(QuoteRow::new(request, user, quote))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
