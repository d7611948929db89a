//! Application services for payment settlement.

mod distribution;

pub use distribution::{
    DistributionError, DistributionOutcome, DistributionResult, PaymentDistributionService,
};
