//! Attribution factor: the lender's share of the financed vehicle.

/// Outstanding balance divided by the vehicle value at origination.
///
/// This is a plain quotient. The caller rejects non-positive vehicle values
/// before calling, and results above 1 (balance exceeding the asset value)
/// are passed through uncapped.
#[must_use]
pub fn attribution_factor(outstanding_balance: f64, vehicle_value: f64) -> f64 {
    outstanding_balance / vehicle_value
}
