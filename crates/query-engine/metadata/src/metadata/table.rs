//! Where the disease records live and which columns the filters apply to.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The table holding the disease records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseTable {
    /// Schema the table belongs to. Unqualified when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    pub table_name: String,
    #[serde(default)]
    pub columns: DiseaseColumns,
}

/// Names of the columns the dashboard filters on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseColumns {
    pub region: String,
    pub sex: String,
    pub age: String,
    pub diagnosis: String,
}

impl Default for DiseaseTable {
    fn default() -> Self {
        DiseaseTable {
            schema_name: None,
            table_name: "ENFERMEDADES".to_string(),
            columns: DiseaseColumns::default(),
        }
    }
}

impl Default for DiseaseColumns {
    fn default() -> Self {
        DiseaseColumns {
            region: "Comunidad Autónoma".to_string(),
            sex: "Sexo".to_string(),
            age: "Edad".to_string(),
            diagnosis: "Diagnóstico".to_string(),
        }
    }
}
