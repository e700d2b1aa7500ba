//! Raw Thing Description data structures
//!
//! The types here mirror a Thing Description as devices actually publish it,
//! covering both the WoT 1.0 shape (a single `href`/`mediaType` per
//! affordance) and the WoT 1.1 shape (a `forms` array tagged with operations).
//!
//! Deserialize with [serde_json], then hand the document to
//! [`resolver::resolve`](crate::resolver::resolve) to obtain the normalized
//! catalogs; nothing in this module resolves URLs or picks forms.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_with::{serde_as, skip_serializing_none, DeserializeAs, OneOrMany, Same};

/// An abstraction of a physical or a virtual entity, as published.
///
/// Most fields are optional: real devices ship partially compliant documents
/// and the resolver decides what is usable. Top-level fields this consumer
/// has no schema for (geo coordinates among them) are kept in [`Thing::extra`]
/// for explicit metadata lookups.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thing {
    /// A [JSON-LD @context](https://www.w3.org/TR/json-ld11/#the-context)
    #[serde(rename = "@context", default)]
    pub context: Option<Value>,

    /// A unique identifier, possibly an absolute URI
    pub id: Option<String>,

    /// JSON-LD semantic keywords
    #[serde(rename = "@type", default)]
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub attype: Option<Vec<String>>,

    /// Human-readable title to be displayed
    pub title: Option<String>,

    /// Human-readable additional information
    pub description: Option<String>,

    /// Base URI to be used to resolve all the other relative URIs
    pub base: Option<String>,

    /// Property-based Interaction Affordances
    pub properties: Option<HashMap<String, PropertyAffordance>>,

    /// Action-based Interaction Affordances
    pub actions: Option<HashMap<String, ActionAffordance>>,

    /// Unmodeled top-level fields, preserved verbatim
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A readable (and possibly writable) device value.
///
/// The data-schema fields (`title`, `type`, `unit`, `@type`, ...) sit at the
/// affordance level, hence the flattened [`DataSchema`]. `href`/`mediaType`
/// are the legacy WoT 1.0 binding, superseded by `forms` when both appear.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAffordance {
    #[serde(flatten)]
    pub data_schema: DataSchema,

    pub observable: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forms: Vec<Form>,

    /// Legacy WoT 1.0 single binding
    pub href: Option<String>,

    /// Legacy WoT 1.0 content type
    pub media_type: Option<String>,
}

/// An invocable device operation.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAffordance {
    #[serde(rename = "@type", default)]
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub attype: Option<Vec<String>>,

    pub title: Option<String>,

    pub description: Option<String>,

    pub input: Option<DataSchema>,

    pub output: Option<DataSchema>,

    #[serde(default)]
    pub safe: bool,

    #[serde(default)]
    pub idempotent: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forms: Vec<Form>,

    /// Legacy WoT 1.0 single binding
    pub href: Option<String>,
}

/// A binding of an operation to a URL.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default)]
    pub op: DefaultedFormOperations,

    pub href: String,

    pub content_type: Option<String>,

    pub subprotocol: Option<String>,

    /// HTTP Binding Template method override
    #[serde(rename = "htv:methodName")]
    pub method_name: Option<Method>,
}

/// HTTP request method
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Method {
    #[default]
    Get,
    Put,
    Post,
    Delete,
    Patch,
}

impl Method {
    /// Whether a request with this method conventionally carries a body.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Put | Self::Post | Self::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        };

        f.write_str(s)
    }
}

/// The operation a [`Form`] binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormOperation {
    ReadProperty,
    WriteProperty,
    ObserveProperty,
    UnobserveProperty,
    InvokeAction,
    QueryAction,
    CancelAction,
    SubscribeEvent,
    UnsubscribeEvent,
    ReadAllProperties,
    WriteAllProperties,
    ReadMultipleProperties,
    WriteMultipleProperties,
    ObserveAllProperties,
    UnobserveAllProperties,
    SubscribeAllEvents,
    UnsubscribeAllEvents,
    QueryAllActions,
}

impl fmt::Display for FormOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ReadProperty => "readproperty",
            Self::WriteProperty => "writeproperty",
            Self::ObserveProperty => "observeproperty",
            Self::UnobserveProperty => "unobserveproperty",
            Self::InvokeAction => "invokeaction",
            Self::QueryAction => "queryaction",
            Self::CancelAction => "cancelaction",
            Self::SubscribeEvent => "subscribeevent",
            Self::UnsubscribeEvent => "unsubscribeevent",
            Self::ReadAllProperties => "readallproperties",
            Self::WriteAllProperties => "writeallproperties",
            Self::ReadMultipleProperties => "readmultipleproperties",
            Self::WriteMultipleProperties => "writemultipleproperties",
            Self::ObserveAllProperties => "observeallproperties",
            Self::UnobserveAllProperties => "unobserveallproperties",
            Self::SubscribeAllEvents => "subscribeallevents",
            Self::UnsubscribeAllEvents => "unsubscribeallevents",
            Self::QueryAllActions => "queryallactions",
        };

        f.write_str(s)
    }
}

/// The `op` field of a form, which may be omitted entirely.
///
/// An absent `op` means the form covers the default operations of its
/// context: read and write for a property, invoke for an action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DefaultedFormOperations {
    #[default]
    Default,
    Custom(Vec<FormOperation>),
}

impl DefaultedFormOperations {
    /// Whether the form covers `operation`, treating an absent `op` as
    /// covering the defaults of its context.
    pub fn covers(&self, operation: FormOperation) -> bool {
        match self {
            Self::Default => true,
            Self::Custom(ops) => ops.contains(&operation),
        }
    }
}

impl Serialize for DefaultedFormOperations {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Default => serializer.serialize_none(),
            Self::Custom(ops) if ops.is_empty() => serializer.serialize_none(),
            Self::Custom(ops) => ops.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DefaultedFormOperations
where
    OneOrMany<Same>: DeserializeAs<'de, Vec<FormOperation>>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ops = Option::<OneOrMany<_>>::deserialize_as(deserializer)?;
        Ok(ops.map(Self::Custom).unwrap_or(Self::Default))
    }
}

/// The data schema attached to a property, action input or action output.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSchema {
    #[serde(rename = "@type", default)]
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub attype: Option<Vec<String>>,

    pub title: Option<String>,

    pub description: Option<String>,

    #[serde(rename = "const")]
    pub constant: Option<Value>,

    pub default: Option<Value>,

    pub unit: Option<String>,

    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<Value>>,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default)]
    pub write_only: bool,

    pub format: Option<String>,

    #[serde(flatten)]
    pub subtype: Option<DataSchemaSubtype>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataSchemaSubtype {
    Array(ArraySchema),
    Boolean,
    Number(NumberSchema),
    Integer(IntegerSchema),
    Object(ObjectSchema),
    String(StringSchema),
    Null,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArraySchema {
    #[serde(default)]
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub items: Option<Vec<DataSchema>>,

    pub min_items: Option<u32>,

    pub max_items: Option<u32>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberSchema {
    #[serde(flatten)]
    pub maximum: Option<Maximum<f64>>,

    #[serde(flatten)]
    pub minimum: Option<Minimum<f64>>,

    pub multiple_of: Option<f64>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct IntegerSchema {
    #[serde(flatten)]
    pub maximum: Option<Maximum<i64>>,

    #[serde(flatten)]
    pub minimum: Option<Minimum<i64>>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ObjectSchema {
    pub properties: Option<HashMap<String, DataSchema>>,

    pub required: Option<Vec<String>>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSchema {
    pub min_length: Option<u32>,

    pub max_length: Option<u32>,
}

/// A helper enum to represent an inclusive or exclusive maximum value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum Maximum<T> {
    /// An inclusive maximum value.
    #[serde(rename = "maximum")]
    Inclusive(T),

    /// An exclusive maximum value.
    #[serde(rename = "exclusiveMaximum")]
    Exclusive(T),
}

/// A helper enum to represent an inclusive or exclusive minimum value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum Minimum<T> {
    /// An inclusive minimum value.
    #[serde(rename = "minimum")]
    Inclusive(T),

    /// An exclusive minimum value.
    #[serde(rename = "exclusiveMinimum")]
    Exclusive(T),
}

impl<T: PartialOrd> Maximum<T> {
    /// Whether `value` satisfies the bound.
    pub fn allows(&self, value: &T) -> bool {
        match self {
            Self::Inclusive(max) => value <= max,
            Self::Exclusive(max) => value < max,
        }
    }
}

impl<T: PartialOrd> Minimum<T> {
    /// Whether `value` satisfies the bound.
    pub fn allows(&self, value: &T) -> bool {
        match self {
            Self::Inclusive(min) => value >= min,
            Self::Exclusive(min) => value > min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_wot11_thing() {
        let thing: Thing = serde_json::from_value(json!({
            "@context": "https://www.w3.org/2019/wot/td/v1.1",
            "id": "urn:dev:ops:32473-WoTLamp-1234",
            "title": "MyLamp",
            "base": "https://lamp.local/api/",
            "properties": {
                "brightness": {
                    "title": "Brightness",
                    "type": "integer",
                    "unit": "percent",
                    "minimum": 0,
                    "maximum": 100,
                    "forms": [
                        {
                            "href": "properties/brightness",
                            "op": ["readproperty", "writeproperty"],
                            "contentType": "application/json",
                        }
                    ],
                }
            },
            "actions": {
                "toggle": {
                    "title": "Toggle",
                    "forms": [{"href": "/actions/toggle", "op": "invokeaction"}],
                }
            },
        }))
        .unwrap();

        assert_eq!(thing.title.as_deref(), Some("MyLamp"));
        assert_eq!(thing.base.as_deref(), Some("https://lamp.local/api/"));

        let brightness = &thing.properties.as_ref().unwrap()["brightness"];
        assert_eq!(brightness.data_schema.unit.as_deref(), Some("percent"));
        assert_eq!(
            brightness.data_schema.subtype,
            Some(DataSchemaSubtype::Integer(IntegerSchema {
                minimum: Some(Minimum::Inclusive(0)),
                maximum: Some(Maximum::Inclusive(100)),
            })),
        );
        assert_eq!(
            brightness.forms[0].op,
            DefaultedFormOperations::Custom(vec![
                FormOperation::ReadProperty,
                FormOperation::WriteProperty,
            ]),
        );

        let toggle = &thing.actions.as_ref().unwrap()["toggle"];
        assert_eq!(
            toggle.forms[0].op,
            DefaultedFormOperations::Custom(vec![FormOperation::InvokeAction]),
        );
    }

    #[test]
    fn deserialize_legacy_property() {
        let property: PropertyAffordance = serde_json::from_value(json!({
            "type": "number",
            "unit": "celsius",
            "href": "/properties/temperature",
            "mediaType": "application/json",
        }))
        .unwrap();

        assert!(property.forms.is_empty());
        assert_eq!(property.href.as_deref(), Some("/properties/temperature"));
        assert_eq!(property.media_type.as_deref(), Some("application/json"));
        assert_eq!(
            property.data_schema.subtype,
            Some(DataSchemaSubtype::Number(NumberSchema::default())),
        );
    }

    #[test]
    fn form_without_op_covers_defaults() {
        let form: Form = serde_json::from_value(json!({"href": "/x"})).unwrap();

        assert_eq!(form.op, DefaultedFormOperations::Default);
        assert!(form.op.covers(FormOperation::ReadProperty));
        assert!(form.op.covers(FormOperation::InvokeAction));

        let form: Form =
            serde_json::from_value(json!({"href": "/x", "op": "readproperty"})).unwrap();
        assert!(form.op.covers(FormOperation::ReadProperty));
        assert!(!form.op.covers(FormOperation::WriteProperty));
    }

    #[test]
    fn form_method_name_override() {
        let form: Form = serde_json::from_value(json!({
            "href": "/actions/reset",
            "htv:methodName": "PUT",
        }))
        .unwrap();

        assert_eq!(form.method_name, Some(Method::Put));
    }

    #[test]
    fn exclusive_bounds() {
        let schema: DataSchema = serde_json::from_value(json!({
            "type": "number",
            "exclusiveMinimum": 0.0,
            "maximum": 1.0,
        }))
        .unwrap();

        let Some(DataSchemaSubtype::Number(number)) = schema.subtype else {
            panic!("expected a number schema");
        };
        assert_eq!(number.minimum, Some(Minimum::Exclusive(0.0)));
        assert_eq!(number.maximum, Some(Maximum::Inclusive(1.0)));
        assert!(number.minimum.unwrap().allows(&0.5));
        assert!(!number.minimum.unwrap().allows(&0.0));
        assert!(number.maximum.unwrap().allows(&1.0));
        assert!(!number.maximum.unwrap().allows(&1.5));
    }

    #[test]
    fn unknown_top_level_fields_preserved() {
        let thing: Thing = serde_json::from_value(json!({
            "title": "Weather station",
            "properties": {},
            "geo:lat": 24.9,
            "geo:long": 121.5,
        }))
        .unwrap();

        assert_eq!(thing.extra["geo:lat"], json!(24.9));
        assert_eq!(thing.extra["geo:long"], json!(121.5));
    }
}
