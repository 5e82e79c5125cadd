use serde::Serialize;
use std::collections::BTreeMap;

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Widget descriptors
//
// Serialized in the camelCase wire form the dashboard consumes:
//
//      {
//          "stock_stats": {
//              "name": "Stock Statistics",
//              "category": "Stock Data",
//              "type": "metric",
//              "endpoint": "stock_stats",
//              "gridData": { "w": 12, "h": 8 },
//              "params": [ { "paramName": "symbol", ... } ],
//              "widgetId": "stock_stats"
//          },
//          ...
//      }
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Widget kind, serialized as the dashboard's `type` field.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Metric,
    Chart,
    Table,
    Markdown,
}

/// Layout size in grid units.
#[derive(Serialize, Clone, Copy, Debug, utoipa::ToSchema)]
pub struct GridData {
    pub w: u32,
    pub h: u32,
}

/// One selectable value of a choice parameter.
#[derive(Serialize, Clone, Debug, utoipa::ToSchema)]
pub struct ParamOption {
    pub label: String,
    pub value: String,
}

/// One widget parameter, rendered as a UI control by the dashboard.
#[derive(Serialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetParam {
    pub param_name: String,
    /// Default value.
    pub value: String,
    pub label: String,
    /// UI control type, e.g. `text`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ParamOption>>,
}

impl WidgetParam {
    /// Free-text parameter.
    pub fn text(name: &str, value: &str, label: &str, description: &str) -> Self {
        Self {
            param_name: name.to_string(),
            value: value.to_string(),
            label: label.to_string(),
            kind: "text".to_string(),
            description: Some(description.to_string()),
            options: None,
        }
    }

    /// Parameter with an enumerated set of choices.
    pub fn select(name: &str, value: &str, label: &str, choices: &[(&str, &str)]) -> Self {
        Self {
            param_name: name.to_string(),
            value: value.to_string(),
            label: label.to_string(),
            kind: "text".to_string(),
            description: None,
            options: Some(
                choices
                    .iter()
                    .map(|(label, value)| ParamOption {
                        label: label.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
            ),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !b
}

/// Everything the dashboard needs to render one widget panel.
#[derive(Serialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub name: String,
    pub description: String,
    pub category: String,
    pub endpoint: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub grid_data: GridData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<WidgetParam>,
    /// Expose the raw backing data to the dashboard's AI tooling.
    #[serde(skip_serializing_if = "is_false")]
    pub raw: bool,
    /// Registry key; filled from `endpoint` at registration when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Registry
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Process-wide widget index, populated once at startup and read by the
/// discovery endpoint thereafter. Handlers are ordinary route functions;
/// registration only records metadata.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: BTreeMap<String, WidgetConfig>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a widget descriptor, keyed by `widgetId` (defaulting to the
    /// endpoint name). Re-registering an id overwrites: last write wins.
    pub fn register(&mut self, mut config: WidgetConfig) {
        let id = config
            .widget_id
            .get_or_insert_with(|| config.endpoint.clone())
            .clone();
        self.widgets.insert(id, config);
    }

    /// All registered widgets, keyed by id, for `/widgets.json`.
    pub fn list_all(&self) -> &BTreeMap<String, WidgetConfig> {
        &self.widgets
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str, endpoint: &str, widget_id: Option<&str>) -> WidgetConfig {
        WidgetConfig {
            name: name.to_string(),
            description: "A sample widget".to_string(),
            category: "Examples".to_string(),
            endpoint: endpoint.to_string(),
            kind: WidgetKind::Metric,
            grid_data: GridData { w: 12, h: 8 },
            params: vec![],
            raw: false,
            widget_id: widget_id.map(str::to_string),
        }
    }

    #[test]
    fn id_defaults_to_the_endpoint_name() {
        let mut registry = WidgetRegistry::new();
        registry.register(config("Stats", "stock_stats", None));

        let stored = registry.list_all().get("stock_stats").unwrap();
        assert_eq!(stored.widget_id.as_deref(), Some("stock_stats"));
    }

    #[test]
    fn explicit_id_takes_precedence() {
        let mut registry = WidgetRegistry::new();
        registry.register(config("Stats", "stock_stats", Some("stats_v2")));

        assert!(registry.list_all().contains_key("stats_v2"));
        assert!(!registry.list_all().contains_key("stock_stats"));
    }

    #[test]
    fn same_id_keeps_only_the_last_descriptor() {
        let mut registry = WidgetRegistry::new();
        registry.register(config("First", "stock_stats", Some("stats")));
        registry.register(config("Second", "other_endpoint", Some("stats")));

        assert_eq!(registry.list_all().len(), 1);
        assert_eq!(registry.list_all().get("stats").unwrap().name, "Second");
    }

    #[test]
    fn descriptor_serializes_in_wire_form() {
        let mut cfg = config("Stats", "stock_stats", None);
        cfg.params
            .push(WidgetParam::text("symbol", "AAPL", "Stock Symbol", "Ticker"));
        cfg.raw = true;

        let mut registry = WidgetRegistry::new();
        registry.register(cfg);
        let value = serde_json::to_value(registry.list_all()).unwrap();

        let widget = &value["stock_stats"];
        assert_eq!(widget["type"], "metric");
        assert_eq!(widget["gridData"]["w"], 12);
        assert_eq!(widget["params"][0]["paramName"], "symbol");
        assert_eq!(widget["raw"], true);
        assert_eq!(widget["widgetId"], "stock_stats");
    }

    #[test]
    fn raw_flag_is_omitted_when_unset() {
        let mut registry = WidgetRegistry::new();
        registry.register(config("Stats", "stock_stats", None));

        let value = serde_json::to_value(registry.list_all()).unwrap();
        assert!(value["stock_stats"].get("raw").is_none());
        // no parameters declared, so the key is absent too
        assert!(value["stock_stats"].get("params").is_none());
    }
}
