use rust_decimal::Decimal;
use validator::ValidationError;

pub mod asset;
pub mod auth;
pub mod company;
pub mod fault;
pub mod maintenance;
pub mod outage;
pub mod payment;
pub mod plan;
pub mod shift;
pub mod site;
pub mod stock;
pub mod storage;
pub mod upgrade;

// Validador compartilhado pelos payloads com valores monetários/quantidades
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_value"));
    }
    Ok(())
}
