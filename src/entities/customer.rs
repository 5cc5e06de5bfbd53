// Customer Entity - the account holder

use super::Entity;
use crate::schema::FieldSpec;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Store-assigned identity
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Taxpayer registration number
    #[serde(default)]
    pub tax_id: Option<String>,

    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Entity for Customer {
    const NAME: &'static str = "customer";
    const COLLECTION: &'static str = "customer";
    const RESOURCE: &'static str = "customers";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name"),
        FieldSpec::required("taxId"),
        FieldSpec::optional("birthDate"),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
