//! Plugin definition shown by the host
//!
//! The two record fields are drop-downs filled from the discovered
//! profile → zone map stored under the `route53` namespace.

use ddns_core::{Configurator, FieldKind, PluginDefinition, Position, RecordField, SelectOption};
use serde_json::Value;

static CONFIGURATOR: [Configurator; 1] = [Configurator {
    name: "more",
    page: "/root/dns-provider/route53/more.html",
    script: "/root/dns-provider/route53/more.mjs",
    position: Position::Front,
}];

static RECORD_FIELDS: [RecordField; 2] = [
    RecordField {
        print: "AWS CLI profile",
        name: "profile",
        kind: FieldKind::Select {
            options: profile_options,
        },
        tooltip: None,
        required: true,
    },
    RecordField {
        print: "Hosted zone ID",
        name: "zoneId",
        kind: FieldKind::Select {
            options: zone_id_options,
        },
        tooltip: Some("Be sure the profile has the rights to the hosted zone."),
        required: true,
    },
];

/// Definition of the Route 53 plugin
pub static DEFINITION: PluginDefinition = PluginDefinition {
    name: "AWS Route 53 (CLI)",
    version: "1.0.0",
    description: "This plugin uses the <a href=\"https://aws.amazon.com/cli/\" target=\"_blank\">AWS CLI</a> to update Route53 DNS records.\n\
It is required to have the CLI application installed and setup in order to run this plugin.",
    configurator: &CONFIGURATOR,
    record: &RECORD_FIELDS,
};

/// One option per discovered profile
pub fn profile_options(dataset: &Value) -> Vec<SelectOption> {
    let Some(profiles) = dataset.as_object() else {
        return Vec::new();
    };

    profiles
        .keys()
        .map(|profile| SelectOption::new(profile, profile))
        .collect()
}

/// One option per hosted zone across all profiles, labelled `name (id)`
pub fn zone_id_options(dataset: &Value) -> Vec<SelectOption> {
    let Some(profiles) = dataset.as_object() else {
        return Vec::new();
    };

    profiles
        .values()
        .filter_map(Value::as_object)
        .flat_map(|zones| zones.iter())
        .filter_map(|(name, id)| {
            id.as_str()
                .map(|id| SelectOption::new(format!("{} ({})", name, id), id))
        })
        .collect()
}
