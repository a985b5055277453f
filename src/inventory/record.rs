//! Flattened asset records

use super::scope::Scope;
use crate::gcp::assets::{Asset, Resource};
use serde::{Deserialize, Serialize};

/// One inventory row. Field order here is the JSON key order and CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset_type: String,
    pub name: String,
    pub scope: String,
    pub location: Option<String>,
}

impl AssetRecord {
    pub fn from_asset(asset: Asset, scope: &Scope) -> Self {
        let location = resolve_location(asset.resource.as_ref());
        Self {
            asset_type: asset.asset_type,
            name: asset.name,
            scope: scope.to_string(),
            location,
        }
    }
}

/// Location of an asset: the resource's own `location`, else `data.location`,
/// else none. Asset types disagree on where (and whether) they put it.
pub fn resolve_location(resource: Option<&Resource>) -> Option<String> {
    let resource = resource?;

    resource
        .location
        .as_deref()
        .filter(|l| !l.is_empty())
        .or_else(|| {
            resource
                .data
                .as_ref()
                .and_then(|data| data.get("location"))
                .and_then(|v| v.as_str())
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::scope::ScopeKind;
    use serde_json::json;

    fn asset(resource: Option<Resource>) -> Asset {
        Asset {
            name: "name".to_string(),
            asset_type: "type".to_string(),
            resource,
        }
    }

    #[test]
    fn test_no_location_with_empty_data() {
        let resource = Resource {
            location: None,
            data: Some(json!({})),
        };
        let record = AssetRecord::from_asset(
            asset(Some(resource)),
            &Scope::new(ScopeKind::Project, "proj"),
        );

        assert_eq!(
            record,
            AssetRecord {
                asset_type: "type".to_string(),
                name: "name".to_string(),
                scope: "projects/proj".to_string(),
                location: None,
            }
        );
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"asset_type": "type", "name": "name", "scope": "projects/proj", "location": null})
        );
    }

    #[test]
    fn test_direct_location_wins() {
        let resource = Resource {
            location: Some("us-central1".to_string()),
            data: Some(json!({"location": "US"})),
        };
        assert_eq!(
            resolve_location(Some(&resource)).as_deref(),
            Some("us-central1")
        );
    }

    #[test]
    fn test_falls_back_to_data_location() {
        let resource = Resource {
            location: None,
            data: Some(json!({"location": "EU", "storageClass": "STANDARD"})),
        };
        assert_eq!(resolve_location(Some(&resource)).as_deref(), Some("EU"));
    }

    #[test]
    fn test_empty_direct_location_falls_through() {
        let resource = Resource {
            location: Some(String::new()),
            data: Some(json!({"location": "asia-east1"})),
        };
        assert_eq!(
            resolve_location(Some(&resource)).as_deref(),
            Some("asia-east1")
        );
    }

    #[test]
    fn test_odd_payload_shapes_degrade_to_none() {
        for data in [
            json!({"location": {"region": "us"}}),
            json!({"location": 42}),
            json!(["location"]),
            json!("location"),
            json!(null),
        ] {
            let resource = Resource {
                location: None,
                data: Some(data),
            };
            assert_eq!(resolve_location(Some(&resource)), None);
        }
        assert_eq!(resolve_location(None), None);
    }
}
