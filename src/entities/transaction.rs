// Transaction Entity - a single credit or debit movement
//
// Not linked to any CheckingAccount; the record only describes the movement.

use super::Entity;
use crate::schema::FieldSpec;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money in
    Credit,

    /// Money out
    Debit,
}

// ============================================================================
// TRANSACTION ENTITY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub amount: Option<f64>,

    #[serde(default)]
    pub kind: Option<TransactionKind>,

    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Entity for Transaction {
    const NAME: &'static str = "transaction";
    const COLLECTION: &'static str = "transaction";
    const RESOURCE: &'static str = "transactions";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("amount"),
        FieldSpec::optional("kind"),
        FieldSpec::optional("date"),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
