//! Concrete Fedicom frame types and their field layouts.

use bytes::BytesMut;
use chrono::NaiveDateTime;

use super::{FrameType, ReasonCode};
use crate::{
    codec::{
        ArticleCode,
        CodecError,
        FieldError,
        FieldSpec,
        field::{FieldReader, FieldWriter, check_timestamp},
    },
    session::Credentials,
};

pub(crate) mod layout {
    use crate::codec::FieldSpec;

    pub(crate) const TIMESTAMP: FieldSpec = FieldSpec::timestamp("timestamp");
    pub(crate) const USER: FieldSpec = FieldSpec::text("user", 16);
    pub(crate) const PASSWORD: FieldSpec = FieldSpec::text("password", 8);
    pub(crate) const ADDITIONAL: FieldSpec = FieldSpec::text("additional", 1);
    pub(crate) const INIT_SESSION: &[FieldSpec] = &[TIMESTAMP, USER, PASSWORD, ADDITIONAL];

    pub(crate) const CUSTOMER_CODE: FieldSpec = FieldSpec::text("customer_code", 16);
    pub(crate) const ORDER_NUMBER: FieldSpec = FieldSpec::numeric("order_number", 10);
    pub(crate) const ORDER_TYPE: FieldSpec = FieldSpec::text("order_type", 6);
    pub(crate) const CONDITIONS: FieldSpec = FieldSpec::text("conditions", 6);
    pub(crate) const ORDER: &[FieldSpec] = &[CUSTOMER_CODE, ORDER_NUMBER, ORDER_TYPE, CONDITIONS];

    pub(crate) const ARTICLE_CODE: FieldSpec = FieldSpec::code("article_code");
    pub(crate) const QUANTITY: FieldSpec = FieldSpec::numeric("quantity", 4);
    pub(crate) const BONUS: FieldSpec = FieldSpec::numeric("bonus", 4);
    pub(crate) const DISCOUNT: FieldSpec = FieldSpec::decimal("discount", 4, 2);
    pub(crate) const ORDER_LINE: &[FieldSpec] = &[ARTICLE_CODE, QUANTITY, BONUS, DISCOUNT];

    pub(crate) const LINE_COUNT: FieldSpec = FieldSpec::numeric("line_count", 4);
    pub(crate) const TOTAL_QUANTITY: FieldSpec = FieldSpec::numeric("total_quantity", 6);
    pub(crate) const TOTAL_BONUS: FieldSpec = FieldSpec::numeric("total_bonus", 6);
    pub(crate) const FINISH_ORDER: &[FieldSpec] = &[LINE_COUNT, TOTAL_QUANTITY, TOTAL_BONUS];

    pub(crate) const CLOSE_SESSION: &[FieldSpec] = &[];

    pub(crate) const INCIDENCE_HEADER: &[FieldSpec] = &[CUSTOMER_CODE, ORDER_NUMBER];

    pub(crate) const AMOUNT_NOT_SERVED: FieldSpec = FieldSpec::numeric("amount_not_served", 4);
    pub(crate) const BONUS_NOT_SERVED: FieldSpec = FieldSpec::numeric("bonus_not_served", 4);
    pub(crate) const REASON: FieldSpec = FieldSpec::reason("reason");
    pub(crate) const INCIDENCE_ORDER_LINE: &[FieldSpec] =
        &[ARTICLE_CODE, AMOUNT_NOT_SERVED, BONUS_NOT_SERVED, REASON];

    pub(crate) const QUANTITY_REJECTION: &[FieldSpec] = &[];
}

fn check_u32(spec: &FieldSpec, value: u32) -> Result<u32, FieldError> {
    spec.check_numeric(u64::from(value))?;
    Ok(value)
}

/// Session opening frame (`0101`), sent by the client and echoed back by
/// the supplier as the first frame of its reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitSession {
    timestamp: NaiveDateTime,
    user: String,
    password: String,
    additional: String,
}

/// The supplier's acknowledgement shares the layout of [`InitSession`].
pub type InitSessionAck = InitSession;

impl InitSession {
    /// Build a session opening frame for `credentials` stamped at `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the timestamp year does not fit four digits.
    pub fn new(credentials: &Credentials, timestamp: NaiveDateTime) -> Result<Self, FieldError> {
        Ok(Self {
            timestamp: check_timestamp(&layout::TIMESTAMP, timestamp)?,
            user: layout::USER.check_text(credentials.user())?,
            password: layout::PASSWORD.check_text(credentials.password())?,
            additional: String::new(),
        })
    }

    /// Moment the session was opened.
    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime { self.timestamp }

    /// Protocol user.
    #[must_use]
    pub fn user(&self) -> &str { &self.user }

    /// Protocol password.
    #[must_use]
    pub fn password(&self) -> &str { &self.password }

    pub(crate) fn write(&self, dst: &mut BytesMut) {
        let mut w = FieldWriter::new(dst, FrameType::InitSession);
        w.timestamp(&layout::TIMESTAMP, &self.timestamp);
        w.text(&layout::USER, &self.user);
        w.text(&layout::PASSWORD, &self.password);
        w.text(&layout::ADDITIONAL, &self.additional);
    }

    pub(crate) fn read(line: &str) -> Result<Self, CodecError> {
        let mut r = FieldReader::new(FrameType::InitSession, line);
        Ok(Self {
            timestamp: r.timestamp(&layout::TIMESTAMP)?,
            user: r.text(&layout::USER)?,
            password: r.text(&layout::PASSWORD)?,
            additional: r.text(&layout::ADDITIONAL)?,
        })
    }
}

/// Order header (`1010`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    customer_code: String,
    order_number: u64,
    order_type: String,
    conditions: String,
}

impl Order {
    /// Build an order header for `customer_code`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the customer code is empty or too long, or
    /// the order number exceeds ten digits.
    pub fn new(customer_code: &str, order_number: u64) -> Result<Self, FieldError> {
        if customer_code.trim().is_empty() {
            return Err(FieldError::Empty {
                field: layout::CUSTOMER_CODE.name(),
            });
        }
        Ok(Self {
            customer_code: layout::CUSTOMER_CODE.check_text(customer_code)?,
            order_number: layout::ORDER_NUMBER.check_numeric(order_number)?,
            order_type: String::new(),
            conditions: String::new(),
        })
    }

    /// Set the supplier-defined order type.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the value exceeds six characters.
    pub fn with_order_type(mut self, order_type: &str) -> Result<Self, FieldError> {
        self.order_type = layout::ORDER_TYPE.check_text(order_type)?;
        Ok(self)
    }

    /// Set the supplier-defined commercial conditions.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the value exceeds six characters.
    pub fn with_conditions(mut self, conditions: &str) -> Result<Self, FieldError> {
        self.conditions = layout::CONDITIONS.check_text(conditions)?;
        Ok(self)
    }

    /// Customer code the order is placed under.
    #[must_use]
    pub fn customer_code(&self) -> &str { &self.customer_code }

    /// Customer-side order number.
    #[must_use]
    pub fn order_number(&self) -> u64 { self.order_number }

    /// Supplier-defined order type.
    #[must_use]
    pub fn order_type(&self) -> &str { &self.order_type }

    /// Supplier-defined commercial conditions.
    #[must_use]
    pub fn conditions(&self) -> &str { &self.conditions }

    pub(crate) fn write(&self, dst: &mut BytesMut) {
        let mut w = FieldWriter::new(dst, FrameType::Order);
        w.text(&layout::CUSTOMER_CODE, &self.customer_code);
        w.numeric(&layout::ORDER_NUMBER, self.order_number);
        w.text(&layout::ORDER_TYPE, &self.order_type);
        w.text(&layout::CONDITIONS, &self.conditions);
    }

    pub(crate) fn read(line: &str) -> Result<Self, CodecError> {
        let mut r = FieldReader::new(FrameType::Order, line);
        Ok(Self {
            customer_code: r.text(&layout::CUSTOMER_CODE)?,
            order_number: r.numeric(&layout::ORDER_NUMBER)?,
            order_type: r.text(&layout::ORDER_TYPE)?,
            conditions: r.text(&layout::CONDITIONS)?,
        })
    }
}

/// One requested article (`1020`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderLine {
    article: ArticleCode,
    quantity: u32,
    bonus: u32,
    discount: u32,
}

impl OrderLine {
    /// Request `quantity` units of `article`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when `quantity` exceeds four digits.
    pub fn new(article: ArticleCode, quantity: u32) -> Result<Self, FieldError> {
        Ok(Self {
            article,
            quantity: check_u32(&layout::QUANTITY, quantity)?,
            bonus: 0,
            discount: 0,
        })
    }

    /// Request free bonus units alongside the paid quantity.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when `bonus` exceeds four digits.
    pub fn with_bonus(mut self, bonus: u32) -> Result<Self, FieldError> {
        self.bonus = check_u32(&layout::BONUS, bonus)?;
        Ok(self)
    }

    /// Request a discount expressed in hundredths of a percent
    /// (`550` is 5.50 %).
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when the value exceeds four digits.
    pub fn with_discount(mut self, hundredths: u32) -> Result<Self, FieldError> {
        self.discount = check_u32(&layout::DISCOUNT, hundredths)?;
        Ok(self)
    }

    /// Supplier article code.
    #[must_use]
    pub fn article(&self) -> &ArticleCode { &self.article }

    /// Requested units.
    #[must_use]
    pub fn quantity(&self) -> u32 { self.quantity }

    /// Requested bonus units.
    #[must_use]
    pub fn bonus(&self) -> u32 { self.bonus }

    /// Discount in hundredths of a percent.
    #[must_use]
    pub fn discount(&self) -> u32 { self.discount }

    pub(crate) fn write(&self, dst: &mut BytesMut) {
        let mut w = FieldWriter::new(dst, FrameType::OrderLine);
        w.code(&layout::ARTICLE_CODE, &self.article);
        w.numeric(&layout::QUANTITY, u64::from(self.quantity));
        w.numeric(&layout::BONUS, u64::from(self.bonus));
        w.numeric(&layout::DISCOUNT, u64::from(self.discount));
    }

    pub(crate) fn read(line: &str) -> Result<Self, CodecError> {
        let mut r = FieldReader::new(FrameType::OrderLine, line);
        Ok(Self {
            article: r.code(&layout::ARTICLE_CODE)?,
            quantity: r.numeric_u32(&layout::QUANTITY)?,
            bonus: r.numeric_u32(&layout::BONUS)?,
            discount: r.numeric_u32(&layout::DISCOUNT)?,
        })
    }
}

/// Order trailer (`1050`) carrying the line count and quantity totals.
///
/// The totals are always derived from the [`OrderLine`] frames being sent;
/// no constructor accepts them directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishOrder {
    line_count: u32,
    total_quantity: u32,
    total_bonus: u32,
}

impl FinishOrder {
    /// Summarise `lines` into a trailer.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when the count or either sum exceeds
    /// its field width.
    pub fn summarising(lines: &[OrderLine]) -> Result<Self, FieldError> {
        let count = u64::try_from(lines.len()).unwrap_or(u64::MAX);
        let quantity: u64 = lines.iter().map(|l| u64::from(l.quantity)).sum();
        let bonus: u64 = lines.iter().map(|l| u64::from(l.bonus)).sum();
        Ok(Self {
            line_count: narrow(&layout::LINE_COUNT, count)?,
            total_quantity: narrow(&layout::TOTAL_QUANTITY, quantity)?,
            total_bonus: narrow(&layout::TOTAL_BONUS, bonus)?,
        })
    }

    /// Number of order lines.
    #[must_use]
    pub fn line_count(&self) -> u32 { self.line_count }

    /// Sum of requested quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 { self.total_quantity }

    /// Sum of requested bonus units.
    #[must_use]
    pub fn total_bonus(&self) -> u32 { self.total_bonus }

    pub(crate) fn write(&self, dst: &mut BytesMut) {
        let mut w = FieldWriter::new(dst, FrameType::FinishOrder);
        w.numeric(&layout::LINE_COUNT, u64::from(self.line_count));
        w.numeric(&layout::TOTAL_QUANTITY, u64::from(self.total_quantity));
        w.numeric(&layout::TOTAL_BONUS, u64::from(self.total_bonus));
    }

    pub(crate) fn read(line: &str) -> Result<Self, CodecError> {
        let mut r = FieldReader::new(FrameType::FinishOrder, line);
        Ok(Self {
            line_count: r.numeric_u32(&layout::LINE_COUNT)?,
            total_quantity: r.numeric_u32(&layout::TOTAL_QUANTITY)?,
            total_bonus: r.numeric_u32(&layout::TOTAL_BONUS)?,
        })
    }
}

fn narrow(spec: &FieldSpec, value: u64) -> Result<u32, FieldError> {
    let value = spec.check_numeric(value)?;
    u32::try_from(value).map_err(|_| FieldError::Overflow {
        field: spec.name(),
        value,
        width: spec.width(),
    })
}

/// Session close (`0199`), sent by the client and by the supplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloseSession;

/// The supplier's close shares the layout of [`CloseSession`].
pub type CloseSessionAck = CloseSession;

/// Incidence header (`2010`) opening the supplier's report for an order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncidenceHeader {
    customer_code: String,
    order_number: u64,
}

impl IncidenceHeader {
    /// Build an incidence header.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when a value does not fit its field.
    pub fn new(customer_code: &str, order_number: u64) -> Result<Self, FieldError> {
        Ok(Self {
            customer_code: layout::CUSTOMER_CODE.check_text(customer_code)?,
            order_number: layout::ORDER_NUMBER.check_numeric(order_number)?,
        })
    }

    /// Customer code the report refers to.
    #[must_use]
    pub fn customer_code(&self) -> &str { &self.customer_code }

    /// Order number the report refers to.
    #[must_use]
    pub fn order_number(&self) -> u64 { self.order_number }

    pub(crate) fn write(&self, dst: &mut BytesMut) {
        let mut w = FieldWriter::new(dst, FrameType::IncidenceHeader);
        w.text(&layout::CUSTOMER_CODE, &self.customer_code);
        w.numeric(&layout::ORDER_NUMBER, self.order_number);
    }

    pub(crate) fn read(line: &str) -> Result<Self, CodecError> {
        let mut r = FieldReader::new(FrameType::IncidenceHeader, line);
        Ok(Self {
            customer_code: r.text(&layout::CUSTOMER_CODE)?,
            order_number: r.numeric(&layout::ORDER_NUMBER)?,
        })
    }
}

/// Per-article incidence (`2015`).
///
/// `amount_not_served` counts the units the supplier will **not** ship.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncidenceOrderLine {
    article: ArticleCode,
    amount_not_served: u32,
    bonus_not_served: u32,
    reason: ReasonCode,
}

impl IncidenceOrderLine {
    /// Report `amount_not_served` missing units of `article`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when the amount exceeds four digits.
    pub fn new(
        article: ArticleCode,
        amount_not_served: u32,
        reason: ReasonCode,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            article,
            amount_not_served: check_u32(&layout::AMOUNT_NOT_SERVED, amount_not_served)?,
            bonus_not_served: 0,
            reason,
        })
    }

    /// Report missing bonus units as well.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when the amount exceeds four digits.
    pub fn with_bonus_not_served(mut self, bonus: u32) -> Result<Self, FieldError> {
        self.bonus_not_served = check_u32(&layout::BONUS_NOT_SERVED, bonus)?;
        Ok(self)
    }

    /// Article the incidence refers to.
    #[must_use]
    pub fn article(&self) -> &ArticleCode { &self.article }

    /// Units that will not be shipped.
    #[must_use]
    pub fn amount_not_served(&self) -> u32 { self.amount_not_served }

    /// Bonus units that will not be shipped.
    #[must_use]
    pub fn bonus_not_served(&self) -> u32 { self.bonus_not_served }

    /// Why the units are not served.
    #[must_use]
    pub fn reason(&self) -> ReasonCode { self.reason }

    pub(crate) fn write(&self, dst: &mut BytesMut) {
        let mut w = FieldWriter::new(dst, FrameType::IncidenceOrderLine);
        w.code(&layout::ARTICLE_CODE, &self.article);
        w.numeric(&layout::AMOUNT_NOT_SERVED, u64::from(self.amount_not_served));
        w.numeric(&layout::BONUS_NOT_SERVED, u64::from(self.bonus_not_served));
        w.reason(&layout::REASON, self.reason);
    }

    pub(crate) fn read(line: &str) -> Result<Self, CodecError> {
        let mut r = FieldReader::new(FrameType::IncidenceOrderLine, line);
        Ok(Self {
            article: r.code(&layout::ARTICLE_CODE)?,
            amount_not_served: r.numeric_u32(&layout::AMOUNT_NOT_SERVED)?,
            bonus_not_served: r.numeric_u32(&layout::BONUS_NOT_SERVED)?,
            reason: r.reason(&layout::REASON)?,
        })
    }
}

/// Early rejection (`9999`): the supplier refuses the requested quantities
/// before sending any incidence detail. The remainder of the line is free
/// text and is not validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuantityRejection {
    message: String,
}

impl QuantityRejection {
    /// Build a rejection carrying `message`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidCharacters`] for non-printable text.
    pub fn new(message: &str) -> Result<Self, FieldError> {
        if !message.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
            return Err(FieldError::InvalidCharacters { field: "message" });
        }
        Ok(Self {
            message: message.to_owned(),
        })
    }

    /// Supplier-provided explanation, possibly empty.
    #[must_use]
    pub fn message(&self) -> &str { &self.message }

    pub(crate) fn write(&self, dst: &mut BytesMut) {
        let mut w = FieldWriter::new(dst, FrameType::QuantityRejection);
        w.raw(&self.message);
    }

    pub(crate) fn read(line: &str) -> Self {
        let r = FieldReader::new(FrameType::QuantityRejection, line);
        Self {
            message: r.rest().trim().to_owned(),
        }
    }
}
