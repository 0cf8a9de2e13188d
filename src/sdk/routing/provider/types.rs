use serde::Deserialize;

// --- GeoJSON shapes shared by openrouteservice and Pelias search responses ---

#[derive(Deserialize, Debug)]
pub struct GeoResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}
#[derive(Deserialize, Debug)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
}
#[derive(Deserialize, Debug)]
pub struct Geometry {
    pub coordinates: [f64; 2],
}
#[derive(Deserialize, Debug)]
pub struct FeatureProperties {
    pub label: Option<String>,
}
