pub mod autofill;
pub mod sla;
