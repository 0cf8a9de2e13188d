use crate::sdk::geo::{Coordinate, Polyline};

/// The session's origin, destination and the path currently on the map.
///
/// `rendered_path` is only ever `Some` when both endpoints are known; the
/// fields are private so that every mutation goes through the methods below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteState {
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
    rendered_path: Option<Polyline>,
}

impl RouteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn rendered_path(&self) -> Option<Polyline> {
        self.rendered_path
    }

    /// Sets the origin unless one is already known. Returns whether it was set.
    pub fn establish_origin(&mut self, coordinate: Coordinate) -> bool {
        if self.origin.is_some() {
            return false;
        }
        self.origin = Some(coordinate);
        true
    }

    /// Records a new destination. Only valid once the origin is known; returns
    /// `false` and leaves the state untouched otherwise.
    pub fn set_destination(&mut self, coordinate: Coordinate) -> bool {
        if self.origin.is_none() {
            return false;
        }
        self.destination = Some(coordinate);
        true
    }

    /// The path that should be on the map for the current endpoints, if any.
    pub fn desired_path(&self) -> Option<Polyline> {
        match (self.origin, self.destination) {
            (Some(from), Some(to)) => Some(Polyline::new(from, to)),
            _ => None,
        }
    }

    /// Records the path for the current endpoints as rendered. Returns the
    /// path it supersedes together with the new one, or `None` while either
    /// endpoint is unknown.
    pub fn render(&mut self) -> Option<(Option<Polyline>, Polyline)> {
        let path = self.desired_path()?;
        Some((self.rendered_path.replace(path), path))
    }
}
