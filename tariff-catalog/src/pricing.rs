use crate::product::Discount;

/// Upper bound on the combined discount of a product, in percent.
pub const MAX_TOTAL_DISCOUNT: f64 = 100.0;

/// Sum of all discount percents, capped at [`MAX_TOTAL_DISCOUNT`].
pub fn total_discount_percent(discounts: &[Discount]) -> f64 {
    discounts
        .iter()
        .map(|d| d.percent)
        .sum::<f64>()
        .min(MAX_TOTAL_DISCOUNT)
}

/// VAT-inclusive price after discounts.
///
/// `base * (1 - discount/100) * (1 + vat/100)`. No rounding is applied so the result is
/// stable for identical inputs.
pub fn final_price(base_price: f64, discounts: &[Discount], vat_percent: f64) -> f64 {
    let discount = total_discount_percent(discounts);
    base_price * (1.0 - discount / 100.0) * (1.0 + vat_percent / 100.0)
}
