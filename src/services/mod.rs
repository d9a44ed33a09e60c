pub mod payments;
pub mod profiles;

pub use payments::{ChargeCardInput, ChargeProfileInput, PaymentService};
pub use profiles::ProfileService;
