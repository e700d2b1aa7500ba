//! Thing Description resolution
//!
//! [`resolve`] turns a raw TD document into a normalized
//! [`ThingDescription`]: every form href resolved to an absolute URL, the
//! WoT 1.0 and 1.1 shapes reconciled into one [`PropertyCatalog`] /
//! [`ActionCatalog`] pair, and per-form failures recorded without aborting
//! the rest of the document.
//!
//! Nothing here infers meaning from names: units, semantic types and value
//! types come from explicit metadata fields only.

use std::collections::HashMap;

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::Error,
    thing::{ActionAffordance, Form, FormOperation, Method, PropertyAffordance, Thing},
    value::DeclaredType,
};

/// A normalized Thing Description, ready for polling and invocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThingDescription {
    /// Resolution base, absolute http/https, no trailing slash. Empty when
    /// the document declared no base and none could be derived.
    pub base_url: String,

    /// Display title, from the document or derived from the base URL.
    pub title: String,

    pub properties: PropertyCatalog,

    pub actions: ActionCatalog,

    /// Per-affordance resolution failures; the named entries are absent from
    /// the catalogs, everything else resolved normally.
    pub form_errors: Vec<FormError>,

    /// Explicit geo coordinates from the document, if any.
    pub geo: Option<GeoLocation>,
}

/// A recorded, non-fatal resolution failure for a single property or action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormError {
    /// Property or action name as it appears in the document.
    pub entry: String,
    #[serde(serialize_with = "error_message")]
    pub error: Error,
}

fn error_message<S: serde::Serializer>(error: &Error, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Geographic position taken from explicit top-level TD fields.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Everything needed to read (and possibly write) one property.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyDef {
    pub name: String,

    /// Display title, falling back to the property name.
    pub title: String,

    /// Absolute read URL.
    pub url: String,

    pub method: Method,

    /// Expected response content type.
    pub content_type: String,

    pub declared_type: DeclaredType,

    /// Unit of measurement, from explicit WoT metadata only.
    pub unit: Option<String>,

    /// First `@type` annotation, if any.
    pub semantic_type: Option<String>,

    /// Whether a writeproperty-capable form exists.
    pub writable: bool,

    /// Absolute write URL, present iff `writable`.
    pub write_url: Option<String>,
}

/// Everything needed to invoke one action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionDef {
    pub name: String,

    /// Display title, falling back to the action name.
    pub title: String,

    /// Absolute invocation URL.
    pub url: String,

    pub method: Method,

    pub input: Option<crate::thing::DataSchema>,

    pub output: Option<crate::thing::DataSchema>,
}

/// Readable properties of a resolved Thing, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PropertyCatalog(HashMap<String, PropertyDef>);

impl PropertyCatalog {
    pub fn get(&self, name: &str) -> Option<&PropertyDef> {
        self.0.get(name)
    }

    pub fn values(&self) -> impl Iterator<Item = &PropertyDef> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyDef)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Invocable actions of a resolved Thing, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ActionCatalog(HashMap<String, ActionDef>);

impl ActionCatalog {
    pub fn get(&self, name: &str) -> Option<&ActionDef> {
        self.0.get(name)
    }

    pub fn values(&self) -> impl Iterator<Item = &ActionDef> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ActionDef)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves a raw TD document against the URL it was fetched from.
///
/// Fails with [`Error::MalformedDocument`] when the payload is not a JSON
/// object with at least a title or one affordance map. Individual forms that
/// cannot be resolved degrade only their own entry, recorded in
/// [`ThingDescription::form_errors`].
pub fn resolve(raw: &[u8], candidate_base: &str) -> Result<ThingDescription, Error> {
    let document: Value =
        serde_json::from_slice(raw).map_err(|err| Error::MalformedDocument(err.to_string()))?;
    if !document.is_object() {
        return Err(Error::MalformedDocument(
            "top-level JSON value is not an object".to_string(),
        ));
    }

    let thing: Thing = serde_json::from_value(document)
        .map_err(|err| Error::MalformedDocument(err.to_string()))?;
    if thing.title.is_none() && thing.properties.is_none() && thing.actions.is_none() {
        return Err(Error::MalformedDocument(
            "document has no title, properties or actions".to_string(),
        ));
    }

    let base_url = determine_base(&thing, candidate_base);
    let base = base_url.as_deref();

    let title = thing
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| match base {
            Some(base) => format!("WoT Device ({base})"),
            None => "WoT Device".to_string(),
        });

    let mut form_errors = Vec::new();
    let mut properties = HashMap::new();
    for (name, affordance) in thing.properties.iter().flatten() {
        match resolve_property(name, affordance, base) {
            Ok(def) => {
                properties.insert(name.clone(), def);
            }
            Err(error) => {
                warn!(property = %name, %error, "property omitted from catalog");
                form_errors.push(FormError { entry: name.clone(), error });
            }
        }
    }

    let mut actions = HashMap::new();
    for (name, affordance) in thing.actions.iter().flatten() {
        match resolve_action(name, affordance, base) {
            Ok(def) => {
                actions.insert(name.clone(), def);
            }
            Err(error) => {
                warn!(action = %name, %error, "action omitted from catalog");
                form_errors.push(FormError { entry: name.clone(), error });
            }
        }
    }

    Ok(ThingDescription {
        base_url: base_url.unwrap_or_default(),
        title,
        properties: PropertyCatalog(properties),
        actions: ActionCatalog(actions),
        form_errors,
        geo: extract_geo(&thing),
    })
}

/// Quick structural check for "is this JSON a Thing Description at all",
/// used by TD discovery to tell WoT devices from arbitrary JSON endpoints.
pub fn looks_like_thing_description(document: &Value) -> bool {
    let Some(map) = document.as_object() else {
        return false;
    };

    let has_context = map.contains_key("@context");
    let has_properties = map.get("properties").is_some_and(Value::is_object);
    let has_title = map.contains_key("title");
    let has_thing_type = match map.get("@type") {
        Some(Value::String(s)) => s.contains("Thing"),
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| item.as_str().is_some_and(|s| s.contains("Thing"))),
        _ => false,
    };

    (has_context || has_properties) && (has_title || has_thing_type || has_properties)
}

fn resolve_property(
    name: &str,
    affordance: &PropertyAffordance,
    base: Option<&str>,
) -> Result<PropertyDef, Error> {
    let schema = &affordance.data_schema;
    let (href, content_type, method) = select_property_binding(affordance)?;
    let url = resolve_href(base, href)?;

    let write_url = affordance
        .forms
        .iter()
        .find(|form| {
            usable_over_http(form)
                && match &form.op {
                    crate::thing::DefaultedFormOperations::Default => !schema.read_only,
                    ops => ops.covers(FormOperation::WriteProperty),
                }
        })
        .and_then(|form| match resolve_href(base, &form.href) {
            Ok(url) => Some(url),
            Err(error) => {
                debug!(property = %name, %error, "write form unresolvable, property read-only");
                None
            }
        });

    Ok(PropertyDef {
        name: name.to_string(),
        title: schema.title.clone().unwrap_or_else(|| name.to_string()),
        url,
        method,
        content_type: content_type.unwrap_or_else(|| "application/json".to_string()),
        declared_type: DeclaredType::from_subtype(schema.subtype.as_ref()),
        unit: schema.unit.clone(),
        semantic_type: schema.attype.as_ref().and_then(|t| t.first().cloned()),
        writable: write_url.is_some(),
        write_url,
    })
}

/// Picks the binding for reading a property: the first HTTP form covering
/// `readproperty` when a forms array exists, the legacy single href
/// otherwise. A forms array always takes precedence over a legacy href.
fn select_property_binding(
    affordance: &PropertyAffordance,
) -> Result<(&str, Option<String>, Method), Error> {
    if !affordance.forms.is_empty() {
        let form = affordance
            .forms
            .iter()
            .find(|form| usable_over_http(form) && form.op.covers(FormOperation::ReadProperty))
            .ok_or_else(|| no_usable_form(FormOperation::ReadProperty))?;
        return Ok((
            &form.href,
            form.content_type.clone(),
            form.method_name.unwrap_or(Method::Get),
        ));
    }

    let href = affordance.href.as_deref().ok_or_else(|| Error::UnresolvableForm {
        href: String::new(),
        reason: "property declares neither forms nor a legacy href".to_string(),
    })?;
    Ok((href, affordance.media_type.clone(), Method::Get))
}

fn resolve_action(
    name: &str,
    affordance: &ActionAffordance,
    base: Option<&str>,
) -> Result<ActionDef, Error> {
    let (href, method_override) = if !affordance.forms.is_empty() {
        let form = affordance
            .forms
            .iter()
            .find(|form| usable_over_http(form) && form.op.covers(FormOperation::InvokeAction))
            .ok_or_else(|| no_usable_form(FormOperation::InvokeAction))?;
        (form.href.as_str(), form.method_name)
    } else {
        let href = affordance.href.as_deref().ok_or_else(|| Error::UnresolvableForm {
            href: String::new(),
            reason: "action declares neither forms nor a legacy href".to_string(),
        })?;
        (href, None)
    };

    Ok(ActionDef {
        name: name.to_string(),
        title: affordance.title.clone().unwrap_or_else(|| name.to_string()),
        url: resolve_href(base, href)?,
        method: method_override.unwrap_or(Method::Post),
        input: affordance.input.clone(),
        output: affordance.output.clone(),
    })
}

fn no_usable_form(operation: FormOperation) -> Error {
    Error::UnresolvableForm {
        href: String::new(),
        reason: format!("no HTTP form covers {operation}"),
    }
}

/// WebSocket forms are a different transport entirely; everything else is
/// assumed reachable over HTTP once resolved.
fn usable_over_http(form: &Form) -> bool {
    let href = form.href.to_ascii_lowercase();
    !href.starts_with("ws://") && !href.starts_with("wss://")
}

/// Resolves a form href against the base URL.
///
/// Absolute hrefs pass through unchanged. A leading `/` replaces the base
/// path (joins against the origin); any other relative href appends after
/// stripping a trailing `/` from the base.
pub(crate) fn resolve_href(base: Option<&str>, href: &str) -> Result<String, Error> {
    if href.is_empty() {
        return Err(Error::UnresolvableForm {
            href: href.to_string(),
            reason: "empty href".to_string(),
        });
    }

    if Url::parse(href).is_ok() {
        return Ok(href.to_string());
    }

    let base = base.ok_or_else(|| Error::UnresolvableForm {
        href: href.to_string(),
        reason: "relative href with no usable base URL".to_string(),
    })?;

    if href.starts_with('/') {
        let origin = origin_of(base).ok_or_else(|| Error::UnresolvableForm {
            href: href.to_string(),
            reason: format!("base URL \"{base}\" has no http(s) origin"),
        })?;
        Ok(format!("{origin}{href}"))
    } else {
        Ok(format!("{}/{}", base.trim_end_matches('/'), href))
    }
}

/// Base URL determination order: an absolute `base` field, an absolute
/// http(s) `id`, then the fetch URL stripped to its origin. Never any other
/// field.
fn determine_base(thing: &Thing, candidate: &str) -> Option<String> {
    for declared in [thing.base.as_deref(), thing.id.as_deref()].into_iter().flatten() {
        if let Ok(url) = Url::parse(declared) {
            if matches!(url.scheme(), "http" | "https") {
                return Some(declared.trim_end_matches('/').to_string());
            }
        }
    }

    origin_of(candidate)
}

/// `scheme://host[:port]` of an absolute http(s) URL, without any path.
fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;

    Some(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}

/// Explicit geo coordinates only: `geo:lat`/`geo:long`, then
/// `latitude`/`longitude`, then `lat`/`lng`. Never derived from anything
/// else.
fn extract_geo(thing: &Thing) -> Option<GeoLocation> {
    const FIELD_PAIRS: [(&str, &str); 3] =
        [("geo:lat", "geo:long"), ("latitude", "longitude"), ("lat", "lng")];

    FIELD_PAIRS.into_iter().find_map(|(lat_key, lon_key)| {
        let latitude = coordinate(thing.extra.get(lat_key)?)?;
        let longitude = coordinate(thing.extra.get(lon_key)?)?;
        Some(GeoLocation { latitude, longitude })
    })
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve_value(document: Value, candidate_base: &str) -> Result<ThingDescription, Error> {
        resolve(document.to_string().as_bytes(), candidate_base)
    }

    #[test]
    fn absolute_href_unchanged() {
        assert_eq!(
            resolve_href(Some("https://host"), "https://other:9000/properties/temp").unwrap(),
            "https://other:9000/properties/temp",
        );
    }

    #[test]
    fn rooted_href_joins_origin() {
        assert_eq!(
            resolve_href(Some("https://host:8080/x"), "/properties/temp").unwrap(),
            "https://host:8080/properties/temp",
        );
    }

    #[test]
    fn relative_href_appends_to_base() {
        assert_eq!(
            resolve_href(Some("https://host/a/"), "sub").unwrap(),
            "https://host/a/sub",
        );
    }

    #[test]
    fn relative_href_without_base_fails() {
        let err = resolve_href(None, "properties/temp").unwrap_err();
        assert_eq!(
            err,
            Error::UnresolvableForm {
                href: "properties/temp".to_string(),
                reason: "relative href with no usable base URL".to_string(),
            },
        );
    }

    #[test]
    fn wot10_and_wot11_produce_identical_properties() {
        let legacy = resolve_value(
            json!({
                "title": "Sensor",
                "properties": {
                    "temperature": {
                        "type": "number",
                        "unit": "celsius",
                        "href": "/properties/temperature",
                        "mediaType": "application/json",
                    }
                }
            }),
            "http://device.local:8080/td",
        )
        .unwrap();

        let modern = resolve_value(
            json!({
                "title": "Sensor",
                "properties": {
                    "temperature": {
                        "type": "number",
                        "unit": "celsius",
                        "forms": [{
                            "href": "/properties/temperature",
                            "op": "readproperty",
                            "contentType": "application/json",
                        }],
                    }
                }
            }),
            "http://device.local:8080/td",
        )
        .unwrap();

        assert_eq!(
            legacy.properties.get("temperature"),
            modern.properties.get("temperature"),
        );
        let def = modern.properties.get("temperature").unwrap();
        assert_eq!(def.url, "http://device.local:8080/properties/temperature");
        assert_eq!(def.declared_type, DeclaredType::Number);
        assert_eq!(def.unit.as_deref(), Some("celsius"));
        assert_eq!(def.method, Method::Get);
    }

    #[test]
    fn resolution_is_idempotent() {
        let document = json!({
            "title": "Lamp",
            "base": "https://lamp.local/api/",
            "properties": {
                "on": {"type": "boolean", "forms": [{"href": "on"}]},
                "brightness": {"type": "integer", "forms": [{"href": "/brightness"}]},
            },
            "actions": {
                "fade": {"forms": [{"href": "fade", "op": "invokeaction"}]},
            },
        });
        let raw = document.to_string();

        let first = resolve(raw.as_bytes(), "https://lamp.local").unwrap();
        let second = resolve(raw.as_bytes(), "https://lamp.local").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.properties.get("on").unwrap().url, "https://lamp.local/api/on");
        assert_eq!(
            first.properties.get("brightness").unwrap().url,
            "https://lamp.local/brightness",
        );
        assert_eq!(first.actions.get("fade").unwrap().url, "https://lamp.local/api/fade");
    }

    #[test]
    fn unresolvable_form_degrades_single_property() {
        let description = resolve_value(
            json!({
                "title": "Partially broken",
                "properties": {
                    "good": {"type": "number", "forms": [{"href": "https://device/good"}]},
                    "bad": {"type": "number", "forms": [{"href": "relative/bad"}]},
                }
            }),
            "not a url",
        )
        .unwrap();

        assert!(description.properties.get("good").is_some());
        assert!(description.properties.get("bad").is_none());
        assert_eq!(description.form_errors.len(), 1);
        assert_eq!(description.form_errors[0].entry, "bad");
        assert!(matches!(
            description.form_errors[0].error,
            Error::UnresolvableForm { .. },
        ));
    }

    #[test]
    fn base_field_beats_candidate_url() {
        let description = resolve_value(
            json!({
                "title": "T",
                "base": "https://declared.example/root/",
                "properties": {
                    "p": {"forms": [{"href": "p"}]},
                }
            }),
            "http://fetched.example:9999/some/path",
        )
        .unwrap();

        assert_eq!(description.base_url, "https://declared.example/root");
        assert_eq!(description.properties.get("p").unwrap().url, "https://declared.example/root/p");
    }

    #[test]
    fn candidate_base_stripped_to_origin() {
        let description = resolve_value(
            json!({
                "title": "T",
                "properties": {
                    "p": {"forms": [{"href": "p"}]},
                }
            }),
            "http://device.local:8080/deep/path/td.json",
        )
        .unwrap();

        assert_eq!(description.base_url, "http://device.local:8080");
        assert_eq!(description.properties.get("p").unwrap().url, "http://device.local:8080/p");
    }

    #[test]
    fn non_http_id_is_not_a_base() {
        let description = resolve_value(
            json!({
                "title": "T",
                "id": "urn:dev:ops:1234",
                "properties": {
                    "p": {"forms": [{"href": "/p"}]},
                }
            }),
            "http://device.local/td",
        )
        .unwrap();

        assert_eq!(description.properties.get("p").unwrap().url, "http://device.local/p");
    }

    #[test]
    fn websocket_forms_skipped() {
        let description = resolve_value(
            json!({
                "title": "T",
                "properties": {
                    "p": {"forms": [
                        {"href": "ws://device/stream", "op": "readproperty"},
                        {"href": "/p", "op": "readproperty"},
                    ]},
                }
            }),
            "http://device.local/td",
        )
        .unwrap();

        assert_eq!(description.properties.get("p").unwrap().url, "http://device.local/p");

        let only_ws = resolve_value(
            json!({
                "title": "T",
                "properties": {
                    "stream": {"forms": [{"href": "ws://device/stream", "op": "readproperty"}]},
                }
            }),
            "http://device.local/td",
        )
        .unwrap();
        assert!(only_ws.properties.is_empty());
        assert_eq!(
            only_ws.form_errors[0].error,
            Error::UnresolvableForm {
                href: String::new(),
                reason: "no HTTP form covers readproperty".to_string(),
            },
        );
    }

    #[test]
    fn writability_from_forms_only() {
        let description = resolve_value(
            json!({
                "title": "T",
                "properties": {
                    "writable": {"forms": [
                        {"href": "/w", "op": ["readproperty", "writeproperty"]},
                    ]},
                    "read_only": {"forms": [{"href": "/r", "op": "readproperty"}]},
                    "legacy": {"href": "/l"},
                }
            }),
            "http://device.local/td",
        )
        .unwrap();

        let writable = description.properties.get("writable").unwrap();
        assert!(writable.writable);
        assert_eq!(writable.write_url.as_deref(), Some("http://device.local/w"));
        assert!(!description.properties.get("read_only").unwrap().writable);
        assert!(!description.properties.get("legacy").unwrap().writable);
    }

    #[test]
    fn no_type_means_unknown_and_no_unit_guessing() {
        let description = resolve_value(
            json!({
                "title": "T",
                "properties": {
                    // The name screams temperature; nothing may be inferred
                    // from it.
                    "temperature_celsius": {"forms": [{"href": "/t"}]},
                }
            }),
            "http://device.local/td",
        )
        .unwrap();

        let def = description.properties.get("temperature_celsius").unwrap();
        assert_eq!(def.declared_type, DeclaredType::Unknown);
        assert_eq!(def.unit, None);
        assert_eq!(def.semantic_type, None);
    }

    #[test]
    fn semantic_type_from_attype_only() {
        let description = resolve_value(
            json!({
                "title": "T",
                "properties": {
                    "t": {
                        "@type": "om:Temperature",
                        "type": "number",
                        "forms": [{"href": "/t"}],
                    },
                }
            }),
            "http://device.local/td",
        )
        .unwrap();

        assert_eq!(
            description.properties.get("t").unwrap().semantic_type.as_deref(),
            Some("om:Temperature"),
        );
    }

    #[test]
    fn action_method_defaults_to_post() {
        let description = resolve_value(
            json!({
                "title": "T",
                "actions": {
                    "toggle": {"forms": [{"href": "/actions/toggle"}]},
                    "status": {"forms": [{"href": "/actions/status", "htv:methodName": "GET"}]},
                }
            }),
            "http://device.local/td",
        )
        .unwrap();

        assert_eq!(description.actions.get("toggle").unwrap().method, Method::Post);
        assert_eq!(description.actions.get("status").unwrap().method, Method::Get);
    }

    #[test]
    fn malformed_documents_rejected() {
        assert!(matches!(
            resolve(b"not json", "http://device.local"),
            Err(Error::MalformedDocument(_)),
        ));
        assert!(matches!(
            resolve(b"[1, 2, 3]", "http://device.local"),
            Err(Error::MalformedDocument(_)),
        ));
        assert!(matches!(
            resolve(b"{}", "http://device.local"),
            Err(Error::MalformedDocument(_)),
        ));
    }

    #[test]
    fn title_falls_back_to_base_url() {
        let description = resolve_value(
            json!({"properties": {"p": {"forms": [{"href": "/p"}]}}}),
            "http://device.local/td",
        )
        .unwrap();

        assert_eq!(description.title, "WoT Device (http://device.local)");
    }

    #[test]
    fn geo_from_explicit_fields() {
        let with_namespace = resolve_value(
            json!({"title": "T", "properties": {}, "geo:lat": "24.95", "geo:long": 121.54}),
            "http://device.local",
        )
        .unwrap();
        assert_eq!(
            with_namespace.geo,
            Some(GeoLocation { latitude: 24.95, longitude: 121.54 }),
        );

        let plain = resolve_value(
            json!({"title": "T", "properties": {}, "latitude": 1.0, "longitude": 2.0}),
            "http://device.local",
        )
        .unwrap();
        assert_eq!(plain.geo, Some(GeoLocation { latitude: 1.0, longitude: 2.0 }));

        let short = resolve_value(
            json!({"title": "T", "properties": {}, "lat": -33.9, "lng": 151.2}),
            "http://device.local",
        )
        .unwrap();
        assert_eq!(short.geo, Some(GeoLocation { latitude: -33.9, longitude: 151.2 }));

        let none = resolve_value(
            json!({"title": "T", "properties": {}}),
            "http://device.local",
        )
        .unwrap();
        assert_eq!(none.geo, None);
    }

    #[test]
    fn thing_description_heuristic() {
        assert!(looks_like_thing_description(&json!({
            "@context": "https://www.w3.org/2019/wot/td/v1",
            "title": "X",
        })));
        assert!(looks_like_thing_description(&json!({
            "title": "X",
            "properties": {"a": {}},
        })));
        assert!(looks_like_thing_description(&json!({
            "@context": "c",
            "@type": ["sensor", "Thing"],
        })));
        assert!(!looks_like_thing_description(&json!({"temperature": 21.5})));
        assert!(!looks_like_thing_description(&json!(42)));
    }
}
