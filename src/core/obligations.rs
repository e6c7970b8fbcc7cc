use super::types::Obligation;

/// Charges one month of every active obligation and returns the total paid.
/// An obligation whose term runs out this month is still charged, then
/// deactivated for good.
pub fn advance_month(obligations: &mut [Obligation]) -> f64 {
    let mut total = 0.0;
    for obligation in obligations.iter_mut() {
        if !obligation.active || obligation.remaining_months == 0 {
            obligation.active = false;
            continue;
        }
        total += obligation.monthly_amount;
        obligation.remaining_months -= 1;
        if obligation.remaining_months == 0 {
            obligation.active = false;
        }
    }
    total
}
