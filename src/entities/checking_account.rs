// CheckingAccount Entity
//
// The balance is stored as given. Nothing here (or anywhere else) applies
// transactions to it, so any value is accepted, negative included.

use super::Entity;
use crate::schema::FieldSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckingAccount {
    #[serde(default)]
    pub id: Option<String>,

    /// Account code as printed on statements (e.g. "0001-2")
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub balance: Option<f64>,
}

impl Entity for CheckingAccount {
    const NAME: &'static str = "checkingAccount";
    const COLLECTION: &'static str = "checking_account";
    const RESOURCE: &'static str = "checking-accounts";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("code"),
        FieldSpec::required("balance"),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
