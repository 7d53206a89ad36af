//! Generic key/value property tree used to construct objects from data.
//!
//! A [`Properties`] node has a namespace (its kind, e.g. `"sprite"`), an
//! optional id, a flat map of values and nested child namespaces. Trees are
//! stored as JSON and addressed with URLs of the form
//! `path/file.json#ns/ns/.../ns`.
//!
//! # File Format
//!
//! ```json
//! [
//!   {
//!     "namespace": "sprite",
//!     "id": "hero",
//!     "values": {
//!       "tileSheet": "characters",
//!       "size": [64, 64],
//!       "offset": "-400, -300",
//!       "tint": "#ff8080ff",
//!       "flip": "HORIZONTAL"
//!     }
//!   }
//! ]
//! ```
//!
//! A file may hold a single object instead of an array. Without a fragment
//! the first top-level object is used; each fragment segment selects a
//! child by id one level deeper.

use glam::{Vec2, Vec4};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

use crate::components::tint::Tint;
use crate::error::{Result, SpriteError};
use crate::geometry::Rect;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub namespace: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub values: FxHashMap<String, Value>,
    #[serde(default)]
    pub children: Vec<Properties>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PropertiesFile {
    Many(Vec<Properties>),
    One(Properties),
}

impl Properties {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Properties {
            namespace: namespace.into(),
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder method to set a value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder method to append a child namespace.
    pub fn with_child(mut self, child: Properties) -> Self {
        self.children.push(child);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn child(&self, id: &str) -> Option<&Properties> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Parse a JSON document holding one object or an array of objects.
    pub fn parse_all(json: &str) -> Result<Vec<Properties>> {
        Ok(match serde_json::from_str::<PropertiesFile>(json)? {
            PropertiesFile::Many(all) => all,
            PropertiesFile::One(one) => vec![one],
        })
    }

    /// Load the namespace addressed by `url` (`path#ns/ns/...`).
    pub fn load(url: &str) -> Result<Properties> {
        let (path, fragment) = match url.split_once('#') {
            Some((path, fragment)) => (path, fragment),
            None => (url, ""),
        };
        if path.is_empty() {
            return Err(SpriteError::InvalidUrl(url.to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let roots = Self::parse_all(&text)?;
        Self::select(roots, fragment).ok_or_else(|| SpriteError::NamespaceNotFound {
            url: url.to_string(),
            path: fragment.to_string(),
        })
    }

    fn select(roots: Vec<Properties>, fragment: &str) -> Option<Properties> {
        let mut segments = fragment.split('/').filter(|s| !s.is_empty());
        let Some(first) = segments.next() else {
            return roots.into_iter().next();
        };
        let mut current = roots.into_iter().find(|p| p.id == first)?;
        for segment in segments {
            let index = current.children.iter().position(|c| c.id == segment)?;
            current = current.children.swap_remove(index);
        }
        Some(current)
    }

    // ---- typed getters ----

    fn invalid(key: &str, value: &Value) -> SpriteError {
        SpriteError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Read every float in a value: a number, an array of numbers, or a
    /// string of comma/space separated numbers.
    fn floats(&self, key: &str) -> Result<Option<SmallVec<[f32; 4]>>> {
        let Some(value) = self.values.get(key) else {
            return Ok(None);
        };
        let parse_str = |s: &str| -> Option<SmallVec<[f32; 4]>> {
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .map(|t| t.parse::<f32>().ok())
                .collect()
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64().map(|f| SmallVec::from_slice(&[f as f32])),
            Value::String(s) => parse_str(s),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => n.as_f64().map(|f| f as f32),
                    Value::String(s) => s.trim().parse::<f32>().ok(),
                    _ => None,
                })
                .collect(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| Self::invalid(key, value))
    }

    fn floats_exact<const N: usize>(&self, key: &str) -> Result<Option<[f32; N]>> {
        match self.floats(key)? {
            None => Ok(None),
            Some(v) => <[f32; N]>::try_from(v.as_slice())
                .map(Some)
                .map_err(|_| Self::invalid(key, &self.values[key])),
        }
    }

    pub fn get_f32(&self, key: &str) -> Result<Option<f32>> {
        Ok(self.floats_exact::<1>(key)?.map(|[v]| v))
    }

    /// Integer value. Accepts numbers and numeric strings.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        let Some(value) = self.values.get(key) else {
            return Ok(None);
        };
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .map(Some)
        .ok_or_else(|| Self::invalid(key, value))
    }

    pub fn get_vec2(&self, key: &str) -> Result<Option<Vec2>> {
        Ok(self.floats_exact::<2>(key)?.map(Vec2::from))
    }

    pub fn get_vec4(&self, key: &str) -> Result<Option<Vec4>> {
        Ok(self.floats_exact::<4>(key)?.map(Vec4::from))
    }

    pub fn get_rect(&self, key: &str) -> Result<Option<Rect>> {
        Ok(self.floats_exact::<4>(key)?.map(Rect::from))
    }

    /// RGBA color as four floats or a `#RRGGBB` / `#RRGGBBAA` hex string.
    pub fn get_color(&self, key: &str) -> Result<Option<Vec4>> {
        if let Some(hex) = self.get_str(key).and_then(|s| s.trim().strip_prefix('#')) {
            return parse_hex_color(hex)
                .map(Some)
                .ok_or_else(|| Self::invalid(key, &self.values[key]));
        }
        self.get_vec4(key)
    }
}

fn parse_hex_color(hex: &str) -> Option<Vec4> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| -> Option<u8> {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { u8::MAX };
    Some(Tint::from_rgba8(channel(0)?, channel(2)?, channel(4)?, alpha).color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path =
            std::env::temp_dir().join(format!("aberredsprite_{}_{}.json", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_vec2_from_array_and_string() {
        let p = Properties::new("sprite", "a")
            .with("size", json!([64, 32]))
            .with("offset", "-400, -300");
        assert_eq!(p.get_vec2("size").unwrap(), Some(Vec2::new(64.0, 32.0)));
        assert_eq!(p.get_vec2("offset").unwrap(), Some(Vec2::new(-400.0, -300.0)));
        assert_eq!(p.get_vec2("missing").unwrap(), None);
    }

    #[test]
    fn test_wrong_arity_is_invalid() {
        let p = Properties::new("sprite", "a").with("size", json!([1, 2, 3]));
        assert!(matches!(
            p.get_vec2("size"),
            Err(SpriteError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_non_numeric_is_invalid() {
        let p = Properties::new("sprite", "a").with("width", "wide");
        assert!(p.get_f32("width").is_err());
        let p = Properties::new("sprite", "a").with("frame", json!(true));
        assert!(p.get_i64("frame").is_err());
    }

    #[test]
    fn test_get_i64_accepts_strings() {
        let p = Properties::new("sprite", "a")
            .with("frame", "3")
            .with("strip", json!(1));
        assert_eq!(p.get_i64("frame").unwrap(), Some(3));
        assert_eq!(p.get_i64("strip").unwrap(), Some(1));
    }

    #[test]
    fn test_rect_and_f32() {
        let p = Properties::new("sprite", "a")
            .with("defaultTile", "0 16 32 32")
            .with("width", json!(12.5));
        assert_eq!(
            p.get_rect("defaultTile").unwrap(),
            Some(Rect::new(0.0, 16.0, 32.0, 32.0))
        );
        assert_eq!(p.get_f32("width").unwrap(), Some(12.5));
    }

    #[test]
    fn test_hex_color() {
        let p = Properties::new("sprite", "a")
            .with("tint", "#ff000080")
            .with("rgb", "#00ff00");
        let tint = p.get_color("tint").unwrap().unwrap();
        assert!(approx_eq(tint.x, 1.0));
        assert!(approx_eq(tint.y, 0.0));
        assert!(approx_eq(tint.w, 128.0 / 255.0));
        let rgb = p.get_color("rgb").unwrap().unwrap();
        assert!(approx_eq(rgb.y, 1.0));
        assert!(approx_eq(rgb.w, 1.0));
    }

    #[test]
    fn test_bad_hex_color() {
        let p = Properties::new("sprite", "a").with("tint", "#12345");
        assert!(p.get_color("tint").is_err());
    }

    #[test]
    fn test_color_from_floats() {
        let p = Properties::new("sprite", "a").with("tint", json!([1.0, 0.5, 0.25, 1.0]));
        assert_eq!(
            p.get_color("tint").unwrap(),
            Some(Vec4::new(1.0, 0.5, 0.25, 1.0))
        );
    }

    #[test]
    fn test_load_first_namespace_without_fragment() {
        let path = temp_file(
            "first",
            r#"[{"namespace": "sprite", "id": "a"}, {"namespace": "sprite", "id": "b"}]"#,
        );
        let p = Properties::load(path.to_str().unwrap()).unwrap();
        assert_eq!(p.id(), "a");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_nested_fragment() {
        let path = temp_file(
            "nested",
            r#"{"namespace": "scene", "id": "level",
                "children": [{"namespace": "sprite", "id": "hero", "values": {"size": [8, 8]}}]}"#,
        );
        let url = format!("{}#level/hero", path.display());
        let p = Properties::load(&url).unwrap();
        assert_eq!(p.namespace(), "sprite");
        assert_eq!(p.get_vec2("size").unwrap(), Some(Vec2::new(8.0, 8.0)));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_saved_tree_loads_child_by_fragment() {
        let tree = Properties::new("scene", "level").with_child(
            Properties::new("group", "actors")
                .with_child(Properties::new("sprite", "hero").with("offset", "4, 8")),
        );
        assert_eq!(tree.child("actors").map(Properties::namespace), Some("group"));
        let path = temp_file("tree", &serde_json::to_string(&tree).unwrap());
        let url = format!("{}#level/actors/hero", path.display());
        let p = Properties::load(&url).unwrap();
        assert_eq!(p.id(), "hero");
        assert_eq!(p.get_vec2("offset").unwrap(), Some(Vec2::new(4.0, 8.0)));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_missing_fragment_fails() {
        let path = temp_file("missing", r#"{"namespace": "sprite", "id": "a"}"#);
        let url = format!("{}#b", path.display());
        assert!(matches!(
            Properties::load(&url),
            Err(SpriteError::NamespaceNotFound { .. })
        ));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            Properties::load("#sprite"),
            Err(SpriteError::InvalidUrl(_))
        ));
        assert!(matches!(
            Properties::load("/definitely/not/here.json"),
            Err(SpriteError::Io(_))
        ));
        let path = temp_file("badjson", "{ not json");
        assert!(matches!(
            Properties::load(path.to_str().unwrap()),
            Err(SpriteError::Json(_))
        ));
        let _ = std::fs::remove_file(path);
    }
}
