//! Serde model of the BNR rate document (`http://www.bnr.ro/xsd`).
//!
//! Only the parts the importer reads are modelled; `Header` and the other
//! body elements are skipped by the deserializer.

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Rate {
    #[serde(rename = "@currency")]
    pub currency: String,
    #[serde(rename = "@multiplier", default)]
    pub multiplier: Option<String>,
    #[serde(rename = "$text", default)]
    pub value: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Cube {
    #[serde(rename = "@date")]
    pub date: String,
    #[serde(rename = "Rate", default)]
    pub rates: Vec<Rate>,
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Body {
    #[serde(rename = "Cube", default)]
    pub cubes: Vec<Cube>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct DataSet {
    #[serde(rename = "Body", default)]
    pub body: Body,
}
