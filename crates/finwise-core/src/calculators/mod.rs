pub mod emi;
pub mod sip;
pub mod swp;
