pub mod customer;
pub mod voucher;
