//! Order totals recomputed after reconciliation.

use std::ops::Add;

use super::AdjustedLine;

/// Caller-supplied pricing used to refresh order totals.
///
/// The crate knows nothing about prices or tax rates; it only sums what the
/// calculator reports for each adjusted line.
pub trait TotalsCalculator {
    /// Monetary amount type.
    type Amount: Copy + Default + Add<Output = Self::Amount>;

    /// Untaxed amount of `line` at its adjusted quantity.
    fn line_amount(&self, line: &AdjustedLine) -> Self::Amount;

    /// Tax due on `line` at its adjusted quantity.
    fn tax_amount(&self, line: &AdjustedLine) -> Self::Amount;
}

/// Untaxed, tax and total amounts of an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals<A> {
    /// Sum of line amounts.
    pub untaxed: A,
    /// Sum of line taxes.
    pub tax: A,
    /// `untaxed + tax`.
    pub total: A,
}

impl<A: Copy + Default + Add<Output = A>> Totals<A> {
    pub(super) fn compute<C>(calculator: &C, lines: &[AdjustedLine]) -> Self
    where
        C: TotalsCalculator<Amount = A>,
    {
        let (untaxed, tax) = lines.iter().fold((A::default(), A::default()), |(u, t), line| {
            (u + calculator.line_amount(line), t + calculator.tax_amount(line))
        });
        Self {
            untaxed,
            tax,
            total: untaxed + tax,
        }
    }
}
