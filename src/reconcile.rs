//! Turning a supplier's incidence report into served quantities and a
//! backorder.
//!
//! The engine is pure: it reads the order lines and the report, and returns
//! a [`Reconciliation`] describing what the caller should apply to its own
//! records. Lines are matched to incidences by their normalised
//! [`ArticleCode`], so `"8470001234"` in the order matches `"0008470001234"`
//! on the wire.

use std::collections::{HashMap, hash_map};

use crate::{
    codec::ArticleCode,
    frame::{IncidenceOrderLine, OrderLine, ReasonCode},
    order::OrderRequest,
};

mod totals;

pub use totals::{Totals, TotalsCalculator};

/// What the supplier reported about one article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncidenceRecord {
    article: ArticleCode,
    quantity_not_served: u32,
    bonus_not_served: u32,
    reason: ReasonCode,
}

impl IncidenceRecord {
    /// Build a record directly.
    #[must_use]
    pub fn new(article: ArticleCode, quantity_not_served: u32, reason: ReasonCode) -> Self {
        Self {
            article,
            quantity_not_served,
            bonus_not_served: 0,
            reason,
        }
    }

    /// Article the record refers to.
    #[must_use]
    pub fn article(&self) -> &ArticleCode { &self.article }

    /// Units the supplier will not ship.
    #[must_use]
    pub fn quantity_not_served(&self) -> u32 { self.quantity_not_served }

    /// Bonus units the supplier will not ship.
    #[must_use]
    pub fn bonus_not_served(&self) -> u32 { self.bonus_not_served }

    /// Reason given by the supplier.
    #[must_use]
    pub fn reason(&self) -> ReasonCode { self.reason }
}

impl From<&IncidenceOrderLine> for IncidenceRecord {
    fn from(line: &IncidenceOrderLine) -> Self {
        Self {
            article: line.article().clone(),
            quantity_not_served: line.amount_not_served(),
            bonus_not_served: line.bonus_not_served(),
            reason: line.reason(),
        }
    }
}

/// Incidences accumulated over one session, keyed by article code.
///
/// A later record for the same article replaces the earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncidenceReport {
    records: HashMap<ArticleCode, IncidenceRecord>,
}

impl IncidenceReport {
    /// Store `record`, returning the one it replaced.
    pub fn record(&mut self, record: IncidenceRecord) -> Option<IncidenceRecord> {
        self.records.insert(record.article.clone(), record)
    }

    /// Look up the record for `article`.
    #[must_use]
    pub fn get(&self, article: &ArticleCode) -> Option<&IncidenceRecord> { self.records.get(article) }

    /// Number of distinct articles with an incidence.
    #[must_use]
    pub fn len(&self) -> usize { self.records.len() }

    /// `true` when the supplier reported nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Iterate over the records in arbitrary order.
    pub fn iter(&self) -> hash_map::Values<'_, ArticleCode, IncidenceRecord> { self.records.values() }

    /// Reconcile `order` against this report.
    ///
    /// Returns `None` when the report is empty: the order was served in
    /// full and nothing needs adjusting.
    #[must_use]
    pub fn reconcile(&self, order: &OrderRequest) -> Option<Reconciliation> {
        if self.is_empty() {
            return None;
        }
        Some(reconcile(order.lines(), self))
    }
}

impl FromIterator<IncidenceRecord> for IncidenceReport {
    fn from_iter<I: IntoIterator<Item = IncidenceRecord>>(iter: I) -> Self {
        let mut report = Self::default();
        for record in iter {
            report.record(record);
        }
        report
    }
}

/// How one order line fared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// Shipped in full. A reason is kept when the supplier reported the
    /// article with nothing missing.
    Served {
        /// Reason attached to a zero-quantity incidence.
        reason: Option<ReasonCode>,
    },
    /// Shipped in part.
    PartiallyServed {
        /// Units missing.
        not_served: u32,
        /// Supplier's reason.
        reason: ReasonCode,
    },
    /// Nothing shipped.
    Unserved {
        /// Supplier's reason.
        reason: ReasonCode,
    },
}

impl LineOutcome {
    /// Reason attached to the line, if any.
    #[must_use]
    pub fn reason(self) -> Option<ReasonCode> {
        match self {
            Self::Served { reason } => reason,
            Self::PartiallyServed { reason, .. } | Self::Unserved { reason } => Some(reason),
        }
    }
}

/// An order line after reconciliation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjustedLine {
    index: usize,
    article: ArticleCode,
    requested: u32,
    quantity: u32,
    outcome: LineOutcome,
}

impl AdjustedLine {
    /// Position of the line in the original order.
    #[must_use]
    pub fn index(&self) -> usize { self.index }

    /// Article ordered.
    #[must_use]
    pub fn article(&self) -> &ArticleCode { &self.article }

    /// Quantity originally requested.
    #[must_use]
    pub fn requested(&self) -> u32 { self.requested }

    /// Quantity the supplier will ship.
    #[must_use]
    pub fn quantity(&self) -> u32 { self.quantity }

    /// Units missing from the shipment.
    #[must_use]
    pub fn not_served(&self) -> u32 { self.requested - self.quantity }

    /// Classification of the line.
    #[must_use]
    pub fn outcome(&self) -> LineOutcome { self.outcome }
}

/// A line carried over to the backorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackorderLine {
    index: usize,
    article: ArticleCode,
    quantity: u32,
    reason: ReasonCode,
}

impl BackorderLine {
    /// Position of the line in the original order.
    #[must_use]
    pub fn index(&self) -> usize { self.index }

    /// Article to re-order.
    #[must_use]
    pub fn article(&self) -> &ArticleCode { &self.article }

    /// Quantity the supplier reported as not served.
    #[must_use]
    pub fn quantity(&self) -> u32 { self.quantity }

    /// Supplier's reason.
    #[must_use]
    pub fn reason(&self) -> ReasonCode { self.reason }
}

/// Copy of the order holding only what the supplier did not serve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Backorder {
    lines: Vec<BackorderLine>,
    removed: Vec<usize>,
}

impl Backorder {
    /// Lines to re-order.
    #[must_use]
    pub fn lines(&self) -> &[BackorderLine] { &self.lines }

    /// Indices of order lines dropped from the backorder.
    #[must_use]
    pub fn removed(&self) -> &[usize] { &self.removed }

    /// `true` when every line was served in full.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
}

/// Result of reconciling an order against an incidence report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    lines: Vec<AdjustedLine>,
    backorder: Backorder,
}

impl Reconciliation {
    /// One adjusted line per order line, in order.
    #[must_use]
    pub fn lines(&self) -> &[AdjustedLine] { &self.lines }

    /// The derived backorder.
    #[must_use]
    pub fn backorder(&self) -> &Backorder { &self.backorder }

    /// Recompute order totals over the adjusted quantities.
    #[must_use]
    pub fn totals<C: TotalsCalculator>(&self, calculator: &C) -> Totals<C::Amount> {
        Totals::compute(calculator, &self.lines)
    }
}

/// Apply `report` to `lines`.
///
/// Per line, keyed by article code:
///
/// - no record: served in full;
/// - nothing missing: served, keeping the reported reason;
/// - some missing: quantity reduced by the missing units;
/// - everything missing: quantity set to zero, line kept.
///
/// Lines with missing units are copied to the backorder with the missing
/// quantity; the rest are listed as removed from it.
#[must_use]
pub fn reconcile(lines: &[OrderLine], report: &IncidenceReport) -> Reconciliation {
    let mut adjusted = Vec::with_capacity(lines.len());
    let mut backorder = Backorder::default();
    for (index, line) in lines.iter().enumerate() {
        let requested = line.quantity();
        let record = report.get(line.article());
        let (quantity, outcome) = match record {
            None => (requested, LineOutcome::Served { reason: None }),
            Some(r) if r.quantity_not_served == 0 => (
                requested,
                LineOutcome::Served {
                    reason: Some(r.reason),
                },
            ),
            Some(r) if r.quantity_not_served < requested => (
                requested - r.quantity_not_served,
                LineOutcome::PartiallyServed {
                    not_served: r.quantity_not_served,
                    reason: r.reason,
                },
            ),
            Some(r) => (0, LineOutcome::Unserved { reason: r.reason }),
        };
        match record {
            Some(r) if r.quantity_not_served > 0 => backorder.lines.push(BackorderLine {
                index,
                article: line.article().clone(),
                quantity: r.quantity_not_served,
                reason: r.reason,
            }),
            _ => backorder.removed.push(index),
        }
        adjusted.push(AdjustedLine {
            index,
            article: line.article().clone(),
            requested,
            quantity,
            outcome,
        });
    }
    Reconciliation {
        lines: adjusted,
        backorder,
    }
}
