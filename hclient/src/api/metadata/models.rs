//! Business object metadata models

use serde::{Deserialize, Serialize};

/// Summary of a business object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// API name used in every data call (e.g. "lead", "customer")
    pub meta_name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Custom objects are created by the tenant, the rest are built in
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Full description of a business object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetaDetail {
    pub meta_name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    /// Fields in upstream order
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
}

impl ObjectMetaDetail {
    /// Look up a field by API name
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields the platform requires on create
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|f| f.required)
    }
}

/// Field metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    /// Field API name
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default = "FieldType::unknown")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Target object for lookup/reference fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_object: Option<String>,
    /// Option values for option/multi-option fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionValue>,
}

/// Field data types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Option,
    MultiOption,
    Reference,
    Money,
    Other(String),
}

impl FieldType {
    fn unknown() -> Self {
        FieldType::Other(String::new())
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Option => "option",
            FieldType::MultiOption => "multiOption",
            FieldType::Reference => "reference",
            FieldType::Money => "money",
            FieldType::Other(raw) => raw,
        }
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "text" | "string" | "textarea" => FieldType::Text,
            "integer" | "int" | "number" => FieldType::Integer,
            "decimal" | "float" | "double" => FieldType::Decimal,
            "boolean" | "bool" => FieldType::Boolean,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "option" | "select" => FieldType::Option,
            "multioption" | "multiselect" => FieldType::MultiOption,
            "reference" | "lookup" => FieldType::Reference,
            "money" | "currency" => FieldType::Money,
            _ => FieldType::Other(raw),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

/// Option value for option/multi-option fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}
