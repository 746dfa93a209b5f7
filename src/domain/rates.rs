use crate::error::{QuoteError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Upper bound for any single configured rate.
pub const MAX_RATE: Decimal = dec!(1000000000);

/// Admin-owned pricing coefficients.
///
/// Persisted as one JSON document and always replaced as a whole. Field names
/// on the wire match the admin panel (`spotUVRateVal`, `dripOffFixedPerPlate`, ...).
/// Coefficients are read from numbers or numeric strings and written back as
/// strings, so a stored document keeps every digit it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateConfig {
    #[serde(serialize_with = "exact::decimal")]
    pub base_fixed_cost: Decimal,
    #[serde(serialize_with = "exact::decimal")]
    pub base_cost_per_extra: Decimal,
    /// Per-sheet rate keyed by lamination type, e.g. `"Gloss BOPP"`.
    #[serde(serialize_with = "exact::table")]
    pub lamination_rates: BTreeMap<String, Decimal>,
    /// Floor cost keyed by lamination family, e.g. `"Gloss"`.
    #[serde(serialize_with = "exact::table")]
    pub minimum_lamination_costs: BTreeMap<String, Decimal>,
    #[serde(rename = "spotUVRateVal", serialize_with = "exact::decimal")]
    pub spot_uv_rate: Decimal,
    #[serde(rename = "spotUVFixedPerPlate", serialize_with = "exact::decimal")]
    pub spot_uv_fixed_per_plate: Decimal,
    #[serde(rename = "dripOffRateVal", serialize_with = "exact::decimal")]
    pub drip_off_rate: Decimal,
    #[serde(serialize_with = "exact::decimal")]
    pub drip_off_fixed_per_plate: Decimal,
    #[serde(serialize_with = "exact::decimal")]
    pub coating_rate: Decimal,
    #[serde(serialize_with = "exact::decimal")]
    pub coating_minimum: Decimal,
    /// Per-book binding cost keyed by binding type (`staple`, `perfect`, ...).
    #[serde(default, serialize_with = "exact::table")]
    pub binding_rates: BTreeMap<String, Decimal>,
}

/// Writers for coefficients that bypass the float representation.
mod exact {
    use rust_decimal::Decimal;
    use serde::Serializer;
    use std::collections::BTreeMap;

    pub fn decimal<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn table<S: Serializer>(
        table: &BTreeMap<String, Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(table.iter().map(|(key, value)| (key, value.to_string())))
    }
}

impl RateConfig {
    /// Parses and validates a rate document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| QuoteError::invalid_rate("rateConfig", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)
            .map_err(|e| QuoteError::invalid_rate("rateConfig", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects negative or out-of-range coefficients, naming the first offender.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("baseFixedCost", self.base_fixed_cost),
            ("baseCostPerExtra", self.base_cost_per_extra),
            ("spotUVRateVal", self.spot_uv_rate),
            ("spotUVFixedPerPlate", self.spot_uv_fixed_per_plate),
            ("dripOffRateVal", self.drip_off_rate),
            ("dripOffFixedPerPlate", self.drip_off_fixed_per_plate),
            ("coatingRate", self.coating_rate),
            ("coatingMinimum", self.coating_minimum),
        ];
        for (field, value) in scalars {
            check_rate(field, value)?;
        }

        let tables = [
            ("laminationRates", &self.lamination_rates),
            ("minimumLaminationCosts", &self.minimum_lamination_costs),
            ("bindingRates", &self.binding_rates),
        ];
        for (table, entries) in tables {
            for (key, value) in entries {
                if key.trim().is_empty() {
                    return Err(QuoteError::invalid_rate(table, "contains an empty key"));
                }
                check_rate(&format!("{table}.{key}"), *value)?;
            }
        }
        Ok(())
    }

    /// Per-sheet rate for a lamination type.
    pub fn lamination_rate(&self, lamination_type: &str) -> Result<Decimal> {
        self.lamination_rates
            .get(lamination_type)
            .copied()
            .ok_or_else(|| QuoteError::missing_rate(format!("laminationRates.{lamination_type}")))
    }

    /// Minimum charge for the family of a lamination type, if one is configured.
    pub fn lamination_floor(&self, lamination_type: &str) -> Option<Decimal> {
        self.minimum_lamination_costs
            .get(lamination_family(lamination_type))
            .copied()
    }

    pub fn binding_rate(&self, binding_type: &str) -> Result<Decimal> {
        self.binding_rates
            .get(binding_type)
            .copied()
            .ok_or_else(|| QuoteError::missing_rate(format!("bindingRates.{binding_type}")))
    }
}

/// `"Gloss BOPP"` belongs to the `"Gloss"` family.
pub fn lamination_family(lamination_type: &str) -> &str {
    lamination_type
        .split_whitespace()
        .next()
        .unwrap_or(lamination_type)
}

fn check_rate(field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(QuoteError::invalid_rate(field, "must not be negative"));
    }
    if value > MAX_RATE {
        return Err(QuoteError::invalid_rate(
            field,
            format!("must not exceed {MAX_RATE}"),
        ));
    }
    Ok(())
}
