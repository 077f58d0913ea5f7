pub mod domain;
pub mod permit;
