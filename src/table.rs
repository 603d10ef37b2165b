use crate::geometry::vertex_label;
use crate::session::Polygon;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Key under which a commit record carries the polygon's tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TagField {
    #[default]
    Tag,
    Name,
}

impl TagField {
    pub fn key(self) -> &'static str {
        match self {
            TagField::Tag => "tag",
            TagField::Name => "name",
        }
    }

    /// Footer heading in the coordinates table.
    pub fn heading(self) -> &'static str {
        match self {
            TagField::Tag => "Tags",
            TagField::Name => "Name",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinateRow {
    pub label: char,
    pub x: i64,
    pub y: i64,
}

/// One row per vertex, coordinates rounded to whole surface pixels.
pub fn coordinate_rows(polygon: &Polygon) -> Vec<CoordinateRow> {
    polygon
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| CoordinateRow {
            label: vertex_label(i),
            x: p.x.round() as i64,
            y: p.y.round() as i64,
        })
        .collect()
}

/// In-memory commit record, e.g. `{"points": [...], "color": "blue", "tag": "roi1"}`.
pub fn commit_record(polygon: &Polygon, field: TagField) -> Value {
    let mut record = json!({
        "points": polygon.points(),
        "color": polygon.color(),
    });
    record[field.key()] = Value::String(polygon.tag().to_string());
    record
}
