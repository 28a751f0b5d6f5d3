//! Outbound purchase orders.
//!
//! An [`OrderRequest`] bundles the header, lines and trailer of one order.
//! The trailer is computed from the lines when the request is built so the
//! two can never disagree.

use crate::{
    codec::{ArticleCode, FieldError},
    frame::{FinishOrder, Frame, Order, OrderLine},
};

/// A validated order ready for transmission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderRequest {
    reference: String,
    header: Order,
    lines: Vec<OrderLine>,
    finish: FinishOrder,
}

impl OrderRequest {
    /// Start building an order identified locally by `reference`.
    ///
    /// ```
    /// use fedicom::{frame::Order, order::OrderRequest};
    ///
    /// let header = Order::new("CUST0001", 1).expect("valid header");
    /// let order = OrderRequest::builder("PO-17", header)
    ///     .article("8470001234", 7)
    ///     .and_then(|b| b.article("8470005678", 3))
    ///     .and_then(|b| b.build())
    ///     .expect("valid order");
    /// assert_eq!(order.line_count(), 2);
    /// assert_eq!(order.total_quantity(), 10);
    /// ```
    #[must_use]
    pub fn builder(reference: impl Into<String>, header: Order) -> OrderRequestBuilder {
        OrderRequestBuilder {
            reference: reference.into(),
            header,
            lines: Vec::new(),
        }
    }

    /// Local purchase reference used in logs.
    #[must_use]
    pub fn reference(&self) -> &str { &self.reference }

    /// Order header frame.
    #[must_use]
    pub fn header(&self) -> &Order { &self.header }

    /// Order lines in transmission order.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] { &self.lines }

    /// Trailer summarising [`OrderRequest::lines`].
    #[must_use]
    pub fn finish(&self) -> &FinishOrder { &self.finish }

    /// Number of order lines.
    #[must_use]
    pub fn line_count(&self) -> u32 { self.finish.line_count() }

    /// Sum of requested quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 { self.finish.total_quantity() }

    /// Header, lines and trailer as frames, in transmission order.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        std::iter::once(Frame::from(self.header.clone()))
            .chain(self.lines.iter().cloned().map(Frame::from))
            .chain(std::iter::once(Frame::from(self.finish.clone())))
    }
}

/// Builder for [`OrderRequest`].
#[derive(Clone, Debug)]
pub struct OrderRequestBuilder {
    reference: String,
    header: Order,
    lines: Vec<OrderLine>,
}

impl OrderRequestBuilder {
    /// Append a prepared order line.
    #[must_use]
    pub fn line(mut self, line: OrderLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Append `quantity` units of the article identified by `code`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the code is invalid or the quantity
    /// exceeds four digits.
    pub fn article(self, code: &str, quantity: u32) -> Result<Self, FieldError> {
        let line = OrderLine::new(ArticleCode::new(code)?, quantity)?;
        Ok(self.line(line))
    }

    /// Finish the order, computing its trailer.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Empty`] when no lines were added and
    /// [`FieldError::Overflow`] when the trailer totals do not fit.
    pub fn build(self) -> Result<OrderRequest, FieldError> {
        if self.lines.is_empty() {
            return Err(FieldError::Empty { field: "order_lines" });
        }
        let finish = FinishOrder::summarising(&self.lines)?;
        Ok(OrderRequest {
            reference: self.reference,
            header: self.header,
            lines: self.lines,
            finish,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::frame::FrameType;

    #[fixture]
    fn header() -> Order { Order::new("CUST0001", 1).expect("valid header") }

    #[rstest]
    fn empty_orders_are_rejected(header: Order) {
        let err = OrderRequest::builder("PO-1", header)
            .build()
            .expect_err("no lines");
        assert_eq!(err, FieldError::Empty { field: "order_lines" });
    }

    #[rstest]
    fn frames_follow_transmission_order(header: Order) {
        let order = OrderRequest::builder("PO-1", header)
            .article("1", 2)
            .and_then(|b| b.article("2", 3))
            .and_then(OrderRequestBuilder::build)
            .expect("valid order");
        let types: Vec<_> = order.frames().map(|f| f.frame_type()).collect();
        assert_eq!(
            types,
            [
                FrameType::Order,
                FrameType::OrderLine,
                FrameType::OrderLine,
                FrameType::FinishOrder,
            ]
        );
        assert_eq!(order.finish().line_count(), 2);
        assert_eq!(order.total_quantity(), 5);
    }

    #[rstest]
    fn invalid_article_is_reported(header: Order) {
        let err = OrderRequest::builder("PO-1", header)
            .article("", 1)
            .expect_err("empty code");
        assert_eq!(err, FieldError::Empty { field: "article_code" });
    }
}
