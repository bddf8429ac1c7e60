// Company catalog, eligibility checks and applications.

pub mod applications;
pub mod companies;
pub mod eligibility;
pub mod handlers;
