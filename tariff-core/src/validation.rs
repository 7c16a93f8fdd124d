use crate::{CoreError, CoreResult};

/// Discount percents live in the open interval (0, 100).
pub fn validate_percent(percent: f64) -> CoreResult<()> {
    if percent.is_finite() && percent > 0.0 && percent < 100.0 {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "percent must be greater than 0 and less than 100, got {}",
            percent
        )))
    }
}

pub fn validate_discount_id(discount_id: &str) -> CoreResult<()> {
    if discount_id.trim().is_empty() {
        return Err(CoreError::ValidationError(
            "discountId must not be blank".to_string(),
        ));
    }
    Ok(())
}
