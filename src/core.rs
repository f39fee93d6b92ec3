mod comparator;
mod comparison;
mod plan;
mod usage;

pub use self::{
    comparator::Comparator,
    comparison::{ChargeCheck, Comparison},
    plan::PlanCost,
    usage::UsageRecord,
};
