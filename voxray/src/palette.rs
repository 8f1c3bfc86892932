use rustc_hash::FxHashMap;

use crate::color::Color;

/// A key into a [`Palette`].
///
/// Keys parsed from a JSON palette object are always names; integer keys
/// only appear through voxel values that reference the palette by number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaletteKey {
    Name(String),
    Index(i64),
}

impl From<&str> for PaletteKey {
    fn from(name: &str) -> Self {
        PaletteKey::Name(name.to_string())
    }
}

impl From<i64> for PaletteKey {
    fn from(index: i64) -> Self {
        PaletteKey::Index(index)
    }
}

/// A named set of colors shared by every frame of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: FxHashMap<PaletteKey, Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `color` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<PaletteKey>, color: Color) {
        self.colors.insert(key.into(), color);
    }

    /// Look up a color. Unknown keys yield `None`; callers fall back to the
    /// scene's default color.
    pub fn get(&self, key: &PaletteKey) -> Option<Color> {
        self.colors.get(key).copied()
    }

    /// Look up a color by name.
    pub fn get_name(&self, name: &str) -> Option<Color> {
        self.get(&PaletteKey::Name(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut palette = Palette::new();
        palette.insert("grass", Color::rgb(0, 200, 0));
        palette.insert(7, Color::rgb(70, 70, 70));

        assert_eq!(palette.get_name("grass"), Some(Color::rgb(0, 200, 0)));
        assert_eq!(palette.get(&PaletteKey::Index(7)), Some(Color::rgb(70, 70, 70)));
        assert_eq!(palette.get_name("water"), None);

        // name and index keys never alias each other
        palette.insert("7", Color::rgb(1, 2, 3));
        assert_eq!(palette.get(&PaletteKey::Index(7)), Some(Color::rgb(70, 70, 70)));
        assert_eq!(palette.get_name("7"), Some(Color::rgb(1, 2, 3)));
    }
}
