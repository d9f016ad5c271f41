use serde::{Deserialize, Serialize};

/// Geographic location attached to hosts and banners
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Two-letter country code (ISO 3166-1 alpha-2)
    #[serde(default)]
    pub country_code: Option<String>,

    /// Full country name
    #[serde(default)]
    pub country_name: Option<String>,

    /// City name
    #[serde(default)]
    pub city: Option<String>,

    /// Region/state code
    #[serde(default)]
    pub region_code: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,
}

impl GeoLocation {
    /// Returns the coordinates as a tuple if both are present
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Transport protocol a service was observed on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Tcp,
    Udp,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        })
    }
}

/// Facet aggregation value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetValue {
    /// The value being aggregated (string or number depending on the facet)
    pub value: serde_json::Value,

    /// Count of matches with this value
    pub count: u64,
}

impl FacetValue {
    /// Try to get the value as a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Try to get the value as an integer
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }
}

/// Facet name to aggregated values, as returned alongside search and count results
pub type Facets = std::collections::HashMap<String, Vec<FacetValue>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_need_both_halves() {
        let mut loc = GeoLocation {
            latitude: Some(37.4),
            ..Default::default()
        };
        assert_eq!(loc.coordinates(), None);
        loc.longitude = Some(-122.1);
        assert_eq!(loc.coordinates(), Some((37.4, -122.1)));
    }

    #[test]
    fn test_transport_wire_format() {
        let t: Transport = serde_json::from_str("\"udp\"").unwrap();
        assert_eq!(t, Transport::Udp);
        assert_eq!(t.to_string(), "udp");
    }
}
