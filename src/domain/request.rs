use crate::error::{QuoteError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Upper bound for monetary and weight inputs (paper rate, GSM).
pub const MAX_AMOUNT: Decimal = dec!(1000000);
/// Upper bound for sheet, page and copy counts.
pub const MAX_COUNT: u64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Flyer,
    Book,
    Brochure,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Flyer => write!(f, "flyer"),
            ProductType::Book => write!(f, "book"),
            ProductType::Brochure => write!(f, "brochure"),
        }
    }
}

/// Finished sheet sizes offered by the calculators.
///
/// Sizes come in three families, each halving from a parent press sheet:
/// A2 → A6, 17x22 → 5.5x4.23 and 19.5x28 → 7x4.80.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SheetSize {
    A2,
    A3,
    A4,
    A5,
    A6,
    #[serde(rename = "17x22")]
    In17x22,
    #[serde(rename = "11x17")]
    In11x17,
    #[serde(rename = "11x8.5")]
    In11x8_5,
    #[serde(rename = "5.5x8.5")]
    In5_5x8_5,
    #[serde(rename = "5.5x4.23")]
    In5_5x4_23,
    #[serde(rename = "19.5x28")]
    In19_5x28,
    #[serde(rename = "14x19.5")]
    In14x19_5,
    #[serde(rename = "14x9.75")]
    In14x9_75,
    #[serde(rename = "9.75x7")]
    In9_75x7,
    #[serde(rename = "7x4.80")]
    In7x4_80,
}

impl SheetSize {
    /// Number of finished pieces cut from one parent sheet.
    pub fn ups(self) -> u64 {
        match self {
            SheetSize::A2 | SheetSize::In17x22 | SheetSize::In19_5x28 => 1,
            SheetSize::A3 | SheetSize::In11x17 | SheetSize::In14x19_5 => 2,
            SheetSize::A4 | SheetSize::In11x8_5 | SheetSize::In14x9_75 => 4,
            SheetSize::A5 | SheetSize::In5_5x8_5 | SheetSize::In9_75x7 => 8,
            SheetSize::A6 | SheetSize::In5_5x4_23 | SheetSize::In7x4_80 => 16,
        }
    }

    /// The parent press sheet this size is cut from.
    pub fn parent(self) -> SheetSize {
        match self {
            SheetSize::A2 | SheetSize::A3 | SheetSize::A4 | SheetSize::A5 | SheetSize::A6 => {
                SheetSize::A2
            }
            SheetSize::In17x22
            | SheetSize::In11x17
            | SheetSize::In11x8_5
            | SheetSize::In5_5x8_5
            | SheetSize::In5_5x4_23 => SheetSize::In17x22,
            _ => SheetSize::In19_5x28,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Single,
    Double,
}

impl Side {
    pub fn multiplier(self) -> u64 {
        match self {
            Side::Single => 1,
            Side::Double => 2,
        }
    }

    pub fn from_double_sided(double_sided: bool) -> Self {
        if double_sided { Side::Double } else { Side::Single }
    }
}

/// Which part of a book a finish is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Coverage {
    #[default]
    #[serde(rename = "Cover Only", alias = "Only Cover")]
    CoverOnly,
    #[serde(rename = "All Pages")]
    AllPages,
}

impl Coverage {
    pub fn multiplier(self) -> u64 {
        match self {
            Coverage::CoverOnly => 1,
            Coverage::AllPages => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingType {
    #[default]
    None,
    Staple,
    Spiral,
    Wiro,
    Perfect,
    Hardcover,
}

impl BindingType {
    /// Key into `RateConfig::binding_rates`.
    pub fn as_str(self) -> &'static str {
        match self {
            BindingType::None => "none",
            BindingType::Staple => "staple",
            BindingType::Spiral => "spiral",
            BindingType::Wiro => "wiro",
            BindingType::Perfect => "perfect",
            BindingType::Hardcover => "hardcover",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InkOption {
    #[default]
    #[serde(rename = "Cover 4C / Inside 4C")]
    FourColourInside,
    #[serde(rename = "Cover 4C / Inside 1C")]
    SingleColourInside,
}

impl InkOption {
    /// Printing plates used for the inside pages.
    pub fn inside_plates(self) -> u64 {
        match self {
            InkOption::FourColourInside => 4,
            InkOption::SingleColourInside => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FoldType {
    #[default]
    None,
    #[serde(rename = "Half Fold")]
    Half,
    #[serde(rename = "Tri Fold")]
    Tri,
    #[serde(rename = "Z Fold")]
    Z,
    #[serde(rename = "Gate Fold")]
    Gate,
    #[serde(rename = "Accordion Fold")]
    Accordion,
}

impl FoldType {
    pub fn folds(self) -> u64 {
        match self {
            FoldType::None => 0,
            FoldType::Half => 1,
            FoldType::Tri | FoldType::Z | FoldType::Gate => 2,
            FoldType::Accordion => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lamination {
    pub lamination_type: String,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlyerSpec {
    pub selected_size: SheetSize,
    pub gsm: Decimal,
    pub paper_rate: Decimal,
    pub total_sheets: u64,
    pub is_double_sided: bool,
    pub lamination: Option<Lamination>,
    pub spot_uv: Option<Side>,
    pub coating: Option<Side>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookSpec {
    pub selected_size: SheetSize,
    pub paper_rate: Decimal,
    pub quantity: u64,
    pub total_pages: u64,
    pub cover_gsm: Decimal,
    pub inside_gsm: Decimal,
    pub cover_lamination: Option<String>,
    pub lamination_scope: Coverage,
    pub spot_uv: Option<Coverage>,
    pub coating: Option<Coverage>,
    pub drip_off: Option<Coverage>,
    pub binding: BindingType,
    pub ink: InkOption,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrochureSpec {
    pub selected_size: SheetSize,
    pub gsm: Decimal,
    pub paper_rate: Decimal,
    pub quantity: u64,
    pub fold: FoldType,
    pub is_double_sided: bool,
    pub lamination: Option<Lamination>,
    pub spot_uv: Option<Side>,
    pub coating: Option<Side>,
}

/// One quote request, tagged on the wire by `calcType`.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationRequest {
    Flyer(FlyerSpec),
    Book(BookSpec),
    Brochure(BrochureSpec),
}

impl CalculationRequest {
    pub fn product_type(&self) -> ProductType {
        match self {
            CalculationRequest::Flyer(_) => ProductType::Flyer,
            CalculationRequest::Book(_) => ProductType::Book,
            CalculationRequest::Brochure(_) => ProductType::Brochure,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| QuoteError::invalid_input("request", e.to_string()))?;
        Self::try_from(&value)
    }
}

impl TryFrom<&Value> for CalculationRequest {
    type Error = QuoteError;

    fn try_from(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| QuoteError::invalid_input("request", "must be a JSON object"))?;
        let fields = Fields { map };

        let calc_type: String = fields.required("calcType")?;
        match calc_type.as_str() {
            "flyer" => fields.flyer().map(CalculationRequest::Flyer),
            "book" => fields.book().map(CalculationRequest::Book),
            "brochure" => fields.brochure().map(CalculationRequest::Brochure),
            _ => Err(QuoteError::UnsupportedCalculationType(calc_type)),
        }
    }
}

impl TryFrom<Value> for CalculationRequest {
    type Error = QuoteError;

    fn try_from(value: Value) -> Result<Self> {
        Self::try_from(&value)
    }
}

/// `"None" | "Single Side" | "Both Sides"` on the wire.
#[derive(Deserialize)]
enum CoatingOption {
    None,
    #[serde(rename = "Single Side")]
    SingleSide,
    #[serde(rename = "Both Sides")]
    BothSides,
}

impl From<CoatingOption> for Option<Side> {
    fn from(option: CoatingOption) -> Self {
        match option {
            CoatingOption::None => None,
            CoatingOption::SingleSide => Some(Side::Single),
            CoatingOption::BothSides => Some(Side::Double),
        }
    }
}

/// `"None" | "Cover Only" | "All Pages"` on the wire.
#[derive(Deserialize)]
enum ScopeOption {
    None,
    #[serde(rename = "Cover Only", alias = "Only Cover")]
    CoverOnly,
    #[serde(rename = "All Pages")]
    AllPages,
}

impl From<ScopeOption> for Option<Coverage> {
    fn from(option: ScopeOption) -> Self {
        match option {
            ScopeOption::None => None,
            ScopeOption::CoverOnly => Some(Coverage::CoverOnly),
            ScopeOption::AllPages => Some(Coverage::AllPages),
        }
    }
}

/// Field-by-field extraction so every rejection names its field.
struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn value(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .value(name)
            .ok_or_else(|| QuoteError::invalid_input(name, "is required"))?;
        T::deserialize(value).map_err(|e| QuoteError::invalid_input(name, e.to_string()))
    }

    fn optional<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T> {
        match self.value(name) {
            Some(value) => {
                T::deserialize(value).map_err(|e| QuoteError::invalid_input(name, e.to_string()))
            }
            None => Ok(default),
        }
    }

    /// Non-negative decimal given as a JSON number or numeric string.
    fn amount(&self, name: &str) -> Result<Decimal> {
        let value = self
            .value(name)
            .ok_or_else(|| QuoteError::invalid_input(name, "is required"))?;
        let amount = match value {
            Value::Number(_) | Value::String(_) => {
                <Decimal as Deserialize>::deserialize(value).ok()
            }
            _ => None,
        }
        .ok_or_else(|| QuoteError::invalid_input(name, "must be a number"))?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(QuoteError::invalid_input(name, "must not be negative"));
        }
        if amount > MAX_AMOUNT {
            return Err(QuoteError::invalid_input(
                name,
                format!("must not exceed {MAX_AMOUNT}"),
            ));
        }
        Ok(amount)
    }

    /// Non-negative whole number given as a JSON number or numeric string.
    fn count(&self, name: &str) -> Result<u64> {
        let value = self
            .value(name)
            .ok_or_else(|| QuoteError::invalid_input(name, "is required"))?;
        let count = match value {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= MAX_COUNT as f64)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };

        match count {
            Some(count) if count <= MAX_COUNT => Ok(count),
            Some(_) => Err(QuoteError::invalid_input(
                name,
                format!("must not exceed {MAX_COUNT}"),
            )),
            None if is_negative(value) => {
                Err(QuoteError::invalid_input(name, "must not be negative"))
            }
            None => Err(QuoteError::invalid_input(name, "must be a whole number")),
        }
    }

    /// A lamination type name where `"None"` or absence means no lamination.
    fn lamination_type(&self, name: &str) -> Result<Option<String>> {
        let lamination_type: String = self.optional(name, String::new())?;
        let lamination_type = lamination_type.trim();
        if lamination_type.is_empty() || lamination_type == "None" {
            Ok(None)
        } else {
            Ok(Some(lamination_type.to_string()))
        }
    }

    fn coating(&self, name: &str) -> Result<Option<Side>> {
        Ok(self.optional(name, CoatingOption::None)?.into())
    }

    fn scope(&self, name: &str) -> Result<Option<Coverage>> {
        Ok(self.optional(name, ScopeOption::None)?.into())
    }

    fn flyer(&self) -> Result<FlyerSpec> {
        let lamination = if self.optional("isLamination", false)? {
            let lamination_type = self
                .lamination_type("laminationType")?
                .ok_or_else(|| QuoteError::invalid_input("laminationType", "is required"))?;
            Some(Lamination {
                lamination_type,
                side: self.optional("laminationSide", Side::Single)?,
            })
        } else {
            None
        };

        let spot_uv = if self.optional("spotUV", false)? {
            Some(self.optional("spotUVSide", Side::Single)?)
        } else {
            None
        };

        Ok(FlyerSpec {
            selected_size: self.required("selectedSize")?,
            gsm: self.amount("gsm")?,
            paper_rate: self.amount("paperRate")?,
            total_sheets: self.count("totalSheets")?,
            is_double_sided: self.optional("isDoubleSided", false)?,
            lamination,
            spot_uv,
            coating: self.coating("coatingOption")?,
        })
    }

    fn book(&self) -> Result<BookSpec> {
        Ok(BookSpec {
            selected_size: self.required("selectedSize")?,
            paper_rate: self.amount("paperRate")?,
            quantity: self.count("quantity")?,
            total_pages: self.count("totalPages")?,
            cover_gsm: self.amount("coverGSM")?,
            inside_gsm: self.amount("insideGSM")?,
            cover_lamination: self.lamination_type("coverLaminationType")?,
            lamination_scope: self.optional("laminationScope", Coverage::CoverOnly)?,
            spot_uv: self.scope("spotUVOption")?,
            coating: self.scope("coatingOption")?,
            drip_off: self.scope("dripOffOption")?,
            binding: self.optional("bindingType", BindingType::None)?,
            ink: self.optional("inkOption", InkOption::FourColourInside)?,
        })
    }

    fn brochure(&self) -> Result<BrochureSpec> {
        let lamination = self
            .lamination_type("laminationType")?
            .map(|lamination_type| -> Result<Lamination> {
                Ok(Lamination {
                    lamination_type,
                    side: self.optional("laminationSide", Side::Single)?,
                })
            })
            .transpose()?;

        let spot_uv = if self.optional("spotUV", false)? {
            Some(self.optional("spotUVSide", Side::Single)?)
        } else {
            None
        };

        Ok(BrochureSpec {
            selected_size: self.required("selectedSize")?,
            gsm: self.amount("gsm")?,
            paper_rate: self.amount("paperRate")?,
            quantity: self.count("quantity")?,
            fold: self.optional("foldType", FoldType::None)?,
            is_double_sided: self.optional("isDoubleSided", true)?,
            lamination,
            spot_uv,
            coating: self.coating("coatingOption")?,
        })
    }
}

fn is_negative(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(|f| f < 0.0),
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(|f| f < 0.0),
        _ => false,
    }
}
