//! Free-text annotations pinned to a normalized canvas position

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Video time (seconds) when committed
    pub timestamp: f64,
    pub color: String,
    pub size: f64,
}

impl Annotation {
    /// Blank text aborts the commit
    pub fn new(at: Point, text: &str, color: &str, size: f64, timestamp: f64) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let at = at.clamp_unit();
        Some(Self {
            id: Uuid::new_v4().to_string(),
            x: at.x,
            y: at.y,
            text: text.to_string(),
            timestamp,
            color: color.to_string(),
            size,
        })
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_rejected() {
        assert!(Annotation::new(Point::new(0.2, 0.2), "   ", "#fff", 16.0, 0.0).is_none());
        assert!(Annotation::new(Point::new(0.2, 0.2), "", "#fff", 16.0, 0.0).is_none());
    }

    #[test]
    fn test_annotation_fields() {
        let a = Annotation::new(Point::new(0.3, 0.7), " heel strike ", "#ffff00", 20.0, 3.5).unwrap();
        assert_eq!(a.text, "heel strike");
        assert_eq!(a.position(), Point::new(0.3, 0.7));
        assert_eq!(a.timestamp, 3.5);
        assert_eq!(a.size, 20.0);
    }
}
