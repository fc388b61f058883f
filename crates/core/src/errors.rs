use thiserror::Error;

use crate::domain::voucher::VoucherType;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown voucher type `{0}` (expected fixed|percent)")]
    InvalidVoucherType(String),
    #[error("discount value {value} is out of range for {voucher_type:?} vouchers")]
    InvalidDiscountValue { voucher_type: VoucherType, value: u64 },
}
