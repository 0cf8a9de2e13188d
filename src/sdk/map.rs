use crate::sdk::geo::{Coordinate, Polyline};
use serde_json::{json, Value};
use std::{fs, io::Result as IoResult, path::Path};

/// Commands the navigation core issues to the map surface.
pub trait MapView: Send {
    fn add_marker(&mut self, at: Coordinate, label: &str);

    fn move_camera(&mut self, at: Coordinate, zoom: f32);

    /// Draws a straight path, replacing any path already on the map.
    fn draw_path(&mut self, path: Polyline);

    fn remove_path(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub title: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub target: Coordinate,
    pub zoom: f32,
}

/// In-memory map surface. Keeps what a map widget would show and exports it
/// as a GeoJSON `FeatureCollection` for any GeoJSON viewer.
#[derive(Default, Debug, Clone)]
pub struct MapCanvas {
    markers: Vec<Marker>,
    camera: Option<Camera>,
    path: Option<Polyline>,
}

impl MapCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn camera(&self) -> Option<Camera> {
        self.camera
    }

    pub fn path(&self) -> Option<Polyline> {
        self.path
    }

    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = self
            .markers
            .iter()
            .map(|m| {
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": m.position.to_lon_lat() },
                    "properties": { "title": m.title },
                })
            })
            .collect();

        if let Some(path) = self.path {
            features.push(json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [path.from.to_lon_lat(), path.to.to_lon_lat()],
                },
                "properties": { "stroke": "#0000ff", "stroke-width": 5 },
            }));
        }

        let mut collection = json!({ "type": "FeatureCollection", "features": features });
        if let Some(camera) = self.camera {
            collection["properties"] = json!({
                "center": camera.target.to_lon_lat(),
                "zoom": camera.zoom,
            });
        }
        collection
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> IoResult<()> {
        let data = serde_json::to_string_pretty(&self.to_geojson())?;
        fs::write(path, data)
    }
}

impl MapView for MapCanvas {
    fn add_marker(&mut self, at: Coordinate, label: &str) {
        log::debug!("[Map] Marker added at: {} ({})", at, label);
        self.markers.push(Marker {
            position: at,
            title: label.to_string(),
        });
    }

    fn move_camera(&mut self, at: Coordinate, zoom: f32) {
        log::debug!("[Map] Camera moved to {} at zoom {}", at, zoom);
        self.camera = Some(Camera { target: at, zoom });
    }

    fn draw_path(&mut self, path: Polyline) {
        log::debug!("[Map] Polyline drawn between {} and {}", path.from, path.to);
        self.path = Some(path);
    }

    fn remove_path(&mut self) {
        if self.path.take().is_some() {
            log::debug!("[Map] Polyline removed");
        }
    }
}
