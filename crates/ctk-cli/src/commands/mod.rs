pub mod claim;
pub mod common;
pub mod quote;
pub mod referral;
pub mod swap;
pub mod tier;
