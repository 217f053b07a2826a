/// Names and constants the [`crate::ResourceManager`] needs that do not come from the archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub default_font: String,
    pub menu_font: String,
    pub dialog_font: String,
    pub warning_font: String,
    /// RGBA colour of the fallback texture.
    pub fallback_color: [u8; 4],
    /// Appended to a font's texture stem for the highlighted style.
    pub highlight_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_font: "FONT_OLD_10_WHITE.TGA".to_string(),
            menu_font: "FONT_OLD_20_WHITE.TGA".to_string(),
            dialog_font: "FONT_OLD_10_WHITE.TGA".to_string(),
            warning_font: "FONT_DEFAULT.TGA".to_string(),
            fallback_color: [255, 0, 255, 255],
            highlight_suffix: "_HI".to_string(),
        }
    }
}
