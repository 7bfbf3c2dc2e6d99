use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    #[default]
    Walmart,
    Soriana,
    Chedraui,
    Costco,
    Heb,
    Amazon,
    Other,
}

impl Store {
    pub const ALL: [Store; 7] = [
        Store::Walmart,
        Store::Soriana,
        Store::Chedraui,
        Store::Costco,
        Store::Heb,
        Store::Amazon,
        Store::Other,
    ];

    pub fn value(self) -> &'static str {
        match self {
            Store::Walmart => "walmart",
            Store::Soriana => "soriana",
            Store::Chedraui => "chedraui",
            Store::Costco => "costco",
            Store::Heb => "heb",
            Store::Amazon => "amazon",
            Store::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Store::Walmart => "Walmart",
            Store::Soriana => "Soriana",
            Store::Chedraui => "Chedraui",
            Store::Costco => "Costco",
            Store::Heb => "HEB",
            Store::Amazon => "Amazon",
            Store::Other => "Other",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
