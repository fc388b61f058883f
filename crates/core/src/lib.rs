pub mod config;
pub mod domain;
pub mod errors;

pub use config::{AppConfig, BackendKind, ConfigError, LoadOptions};
pub use domain::customer::{Customer, CustomerId};
pub use domain::voucher::{Voucher, VoucherId, VoucherType};
pub use errors::DomainError;
