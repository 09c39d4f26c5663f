//! # Bill Session
//!
//! One open bill plus a handle on the ledger.
//!
//! ## Finalize Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  finalize(rate)                                                         │
//! │                                                                         │
//! │  1. open_bill.close(rate)    → EmptyBill? stop, nothing changes         │
//! │  2. ledger.store(&new_bill)  → DbError? StorageUnavailable, bill kept   │
//! │  3. open_bill.reset()        → only after the store committed           │
//! │  4. return the stored FinalizedBill (id assigned by the ledger)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations take `&mut self`, so a session only ever runs one at a time.

use tracing::{debug, info, warn};

use tally_core::{BillItem, FinalizedBill, LineItem, OpenBill, TaxRate};
use tally_db::BillRepository;

use crate::error::BillingResult;

/// The billing session owned by the front end.
#[derive(Debug)]
pub struct BillSession {
    bill: OpenBill,
    ledger: BillRepository,
}

impl BillSession {
    /// Starts a session with an empty open bill.
    pub fn new(ledger: BillRepository) -> Self {
        BillSession {
            bill: OpenBill::new(),
            ledger,
        }
    }

    /// Adds a line item from raw user input.
    ///
    /// On error the open bill is unchanged.
    pub fn add(&mut self, name: &str, quantity: &str, unit_price: &str) -> BillingResult<LineItem> {
        match self.bill.add(name, quantity, unit_price) {
            Ok(item) => {
                debug!(
                    name = item.name(),
                    quantity = item.quantity(),
                    line_total = %item.line_total(),
                    subtotal = %self.bill.subtotal(),
                    "Item added"
                );
                Ok(item)
            }
            Err(e) => {
                warn!(error = %e, "Item rejected");
                Err(e.into())
            }
        }
    }

    /// Closes the open bill at `tax_rate`, stores it, and starts a new one.
    pub async fn finalize(&mut self, tax_rate: TaxRate) -> BillingResult<FinalizedBill> {
        let new_bill = self.bill.close(tax_rate)?;
        let stored = self.ledger.store(&new_bill).await?;

        self.bill.reset();
        info!(
            id = stored.id,
            total = %stored.total,
            tax_rate = %tax_rate,
            "Bill finalized"
        );

        Ok(stored)
    }

    /// Discards the open bill. Never touches the ledger.
    pub fn reset(&mut self) {
        if !self.bill.is_empty() {
            debug!(items = self.bill.item_count(), "Open bill discarded");
        }
        self.bill.reset();
    }

    /// Every stored bill, newest first.
    pub async fn list_all(&self) -> BillingResult<Vec<FinalizedBill>> {
        Ok(self.ledger.list_all().await?)
    }

    /// A stored bill by id, or `None`.
    pub async fn get_bill(&self, id: i64) -> BillingResult<Option<FinalizedBill>> {
        Ok(self.ledger.get_by_id(id).await?)
    }

    /// The structured line items of a stored bill.
    pub async fn items_for(&self, id: i64) -> BillingResult<Vec<BillItem>> {
        Ok(self.ledger.items_for(id).await?)
    }

    /// The open bill (read-only).
    pub fn bill(&self) -> &OpenBill {
        &self.bill
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BillingError;
    use rust_decimal_macros::dec;
    use tally_core::{CoreError, InputField, Money, ValidationError};
    use tally_db::{Database, DbConfig};

    async fn session() -> (Database, BillSession) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = BillSession::new(db.bills());
        (db, session)
    }

    const GST: TaxRate = TaxRate::from_percent(dec!(18));

    #[tokio::test]
    async fn test_gst_bill_scenario() {
        let (_db, mut session) = session().await;

        session.add("Soap", "2", "50.0").unwrap();
        session.add("Oil", "1", "120.0").unwrap();
        assert_eq!(session.bill().subtotal(), Money::new(dec!(220)));

        let bill = session.finalize(GST).await.unwrap();
        assert_eq!(bill.subtotal, Money::new(dec!(220)));
        assert_eq!(bill.tax, Money::new(dec!(39.60)));
        assert_eq!(bill.total, Money::new(dec!(259.60)));
        assert_eq!(bill.items_summary, "Soap(2x50.00); Oil(1x120.00)");

        assert!(session.bill().is_empty());
        assert_eq!(session.list_all().await.unwrap(), vec![bill]);
    }

    #[tokio::test]
    async fn test_finalize_empty_bill() {
        let (db, mut session) = session().await;

        let result = session.finalize(GST).await;
        assert!(matches!(result, Err(BillingError::Core(CoreError::EmptyBill))));
        assert_eq!(db.bills().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_finalize_twice_stores_once() {
        let (db, mut session) = session().await;
        session.add("Soap", "2", "50").unwrap();

        let first = session.finalize(GST).await.unwrap();
        let again = session.finalize(GST).await;

        assert!(matches!(again, Err(BillingError::Core(CoreError::EmptyBill))));
        assert_eq!(db.bills().count().await.unwrap(), 1);
        assert_eq!(session.list_all().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_reset_after_finalize_is_noop() {
        let (db, mut session) = session().await;
        session.add("Oil", "1", "120").unwrap();
        let stored = session.finalize(GST).await.unwrap();

        session.reset();
        assert!(session.bill().is_empty());
        assert_eq!(session.bill().subtotal(), Money::zero());
        assert_eq!(db.bills().count().await.unwrap(), 1);
        assert_eq!(session.get_bill(stored.id).await.unwrap(), Some(stored));

        // the next bill starts from nothing
        session.add("Soap", "1", "50").unwrap();
        let next = session.finalize(GST).await.unwrap();
        assert_eq!(next.subtotal, Money::new(dec!(50)));
        assert_eq!(next.items_summary, "Soap(1x50.00)");
    }

    #[tokio::test]
    async fn test_rejected_add_leaves_bill_unchanged() {
        let (_db, mut session) = session().await;
        session.add("Soap", "2", "50").unwrap();
        let before = session.bill().clone();

        let err = session.add("Tea", "0", "10").unwrap_err();
        assert!(matches!(
            err,
            BillingError::Core(CoreError::Validation(ValidationError::InvalidQuantityOrPrice {
                field: InputField::Quantity,
                ..
            }))
        ));
        assert!(matches!(
            session.add("  ", "1", "10"),
            Err(BillingError::Core(CoreError::Validation(ValidationError::MissingName)))
        ));
        assert_eq!(session.bill(), &before);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_open_bill() {
        let (db, mut session) = session().await;
        session.add("Soap", "2", "50").unwrap();
        let before = session.bill().clone();

        db.close().await;

        let result = session.finalize(GST).await;
        assert!(matches!(result, Err(BillingError::StorageUnavailable(_))));
        assert_eq!(session.bill(), &before);
        assert!(matches!(
            session.list_all().await,
            Err(BillingError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_reset_discards_without_storing() {
        let (db, mut session) = session().await;
        session.add("Soap", "2", "50").unwrap();

        session.reset();
        assert!(session.bill().is_empty());
        assert_eq!(session.bill().subtotal(), Money::zero());

        // idempotent
        session.reset();
        assert!(session.bill().is_empty());
        assert_eq!(db.bills().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_history_newest_first_with_items() {
        let (_db, mut session) = session().await;

        session.add("Soap", "2", "50").unwrap();
        let first = session.finalize(GST).await.unwrap();

        session.add("Rice", "3", "40").unwrap();
        session.add("Salt", "1", "20").unwrap();
        let second = session.finalize(TaxRate::from_percent(dec!(5))).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(second.tax, Money::new(dec!(7.00)));
        assert_eq!(session.list_all().await.unwrap(), vec![second.clone(), first]);

        let items = session.items_for(second.id).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Rice", "Salt"]);
        assert_eq!(session.get_bill(second.id).await.unwrap(), Some(second));
        assert_eq!(session.get_bill(999).await.unwrap(), None);
    }
}
