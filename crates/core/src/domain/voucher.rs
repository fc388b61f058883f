use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoucherId(pub Uuid);

impl VoucherId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for VoucherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// How a voucher's `discount_value` is interpreted against a price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherType {
    Fixed,
    Percent,
}

impl VoucherType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percent => "percent",
        }
    }
}

impl std::str::FromStr for VoucherType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "percent" => Ok(Self::Percent),
            other => Err(DomainError::InvalidVoucherType(other.to_string())),
        }
    }
}

/// A discount voucher. Vouchers with equal type and value are distinct
/// records as long as their ids differ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub voucher_type: VoucherType,
    pub discount_value: u64,
}

impl Voucher {
    /// Factory for the concrete voucher variant. Percent vouchers must
    /// carry a value in `[0, 100]`.
    pub fn new(
        voucher_type: VoucherType,
        id: VoucherId,
        discount_value: u64,
    ) -> Result<Self, DomainError> {
        if voucher_type == VoucherType::Percent && discount_value > 100 {
            return Err(DomainError::InvalidDiscountValue { voucher_type, value: discount_value });
        }
        tracing::debug!(
            voucher_id = %id,
            voucher_type = voucher_type.as_str(),
            discount_value,
            "voucher constructed"
        );
        Ok(Self { id, voucher_type, discount_value })
    }

    /// Same factory with a freshly generated id.
    pub fn random(voucher_type: VoucherType, discount_value: u64) -> Result<Self, DomainError> {
        Self::new(voucher_type, VoucherId::random(), discount_value)
    }

    /// Applies the discount to `price` under integer semantics: fixed
    /// vouchers subtract (floored at zero), percent vouchers remove the
    /// floored proportional share.
    pub fn apply_discount(&self, price: u64) -> u64 {
        match self.voucher_type {
            VoucherType::Fixed => price.saturating_sub(self.discount_value),
            VoucherType::Percent => {
                // Widened so the intermediate product cannot overflow; the
                // share never exceeds the price while the value is <= 100.
                let share = u128::from(price) * u128::from(self.discount_value) / 100;
                price - share as u64
            }
        }
    }
}
