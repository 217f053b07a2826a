//! Archive naming conventions: compiled file names and name tags.
//!
//! All functions take and return normalized (upper case) names.

fn split_ext(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) => (&name[..i], &name[i + 1..]),
        None => (name, ""),
    }
}

/// The name itself, then the compiled texture the toolchain produces for a `.TGA`.
pub(crate) fn texture_candidates(name: &str) -> Vec<String> {
    let mut out = vec![name.to_string()];
    let (stem, ext) = split_ext(name);
    if ext == "TGA" {
        out.push(format!("{}-C.TEX", stem));
    }
    out
}

pub(crate) fn mesh_candidates(name: &str) -> Vec<String> {
    let (stem, ext) = split_ext(name);
    let mut out = vec![name.to_string()];
    match ext {
        "3DS" => out.push(format!("{}.MRM", stem)),
        "MMS" => out.push(format!("{}.MMB", stem)),
        "ASC" | "MDS" => {
            out.push(format!("{}.MDL", stem));
            out.push(format!("{}.MDM", stem));
        }
        _ => {}
    }
    out
}

pub(crate) fn skeleton_candidates(name: &str) -> Vec<String> {
    let (stem, ext) = split_ext(name);
    let mut out = vec![name.to_string()];
    if ext == "MDS" || ext == "ASC" {
        out.push(format!("{}.MDH", stem));
    }
    out
}

/// Glyph metrics live next to the glyph texture: `FONT_OLD_10_WHITE.TGA` -> `.FNT`.
pub(crate) fn font_metrics_name(name: &str) -> String {
    let (stem, _) = split_ext(name);
    format!("{}.FNT", stem)
}

/// `FONT.TGA` + `_HI` -> `FONT_HI.TGA`
pub(crate) fn with_suffix(name: &str, suffix: &str) -> String {
    match name.rfind('.') {
        Some(i) => format!("{}{}{}", &name[..i], suffix, &name[i..]),
        None => format!("{}{}", name, suffix),
    }
}

/// Replaces the first `_{tag}0` in `name` with `_{tag}{value}`. Names without the tag are
/// returned as is.
pub(crate) fn emplace_tag(name: &str, tag: char, value: i32) -> String {
    let pattern = format!("_{}0", tag);
    match name.find(&pattern) {
        Some(i) => format!(
            "{}_{}{}{}",
            &name[..i],
            tag,
            value,
            &name[i + pattern.len()..]
        ),
        None => name.to_string(),
    }
}

pub(crate) fn is_animated(name: &str) -> bool {
    name.contains("_A0")
}

/// Name of animation frame `frame` of an `_A0` texture.
pub(crate) fn anim_frame_name(name: &str, frame: u32) -> Option<String> {
    if !is_animated(name) {
        return None;
    }
    Some(emplace_tag(name, 'A', frame as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textures() {
        assert_eq!(
            texture_candidates("MENU_BACK.TGA"),
            vec!["MENU_BACK.TGA", "MENU_BACK-C.TEX"]
        );
        assert_eq!(texture_candidates("X.PNG"), vec!["X.PNG"]);
    }

    #[test]
    fn meshes() {
        assert_eq!(mesh_candidates("CHAIR.3DS"), vec!["CHAIR.3DS", "CHAIR.MRM"]);
        assert_eq!(mesh_candidates("TREE.MMS"), vec!["TREE.MMS", "TREE.MMB"]);
        assert_eq!(
            mesh_candidates("HUMANS.MDS"),
            vec!["HUMANS.MDS", "HUMANS.MDL", "HUMANS.MDM"]
        );
        assert_eq!(mesh_candidates("ITEM.MRM"), vec!["ITEM.MRM"]);
        assert_eq!(skeleton_candidates("HUMANS.ASC"), vec!["HUMANS.ASC", "HUMANS.MDH"]);
    }

    #[test]
    fn fonts() {
        assert_eq!(font_metrics_name("FONT_OLD_10_WHITE.TGA"), "FONT_OLD_10_WHITE.FNT");
        assert_eq!(with_suffix("FONT_OLD_10_WHITE.TGA", "_HI"), "FONT_OLD_10_WHITE_HI.TGA");
        assert_eq!(with_suffix("NOEXT", "_HI"), "NOEXT_HI");
    }

    #[test]
    fn tags() {
        assert_eq!(emplace_tag("HUM_BODY_V0_C0.TGA", 'V', 3), "HUM_BODY_V3_C0.TGA");
        assert_eq!(emplace_tag("HUM_BODY_V3_C0.TGA", 'C', 1), "HUM_BODY_V3_C1.TGA");
        assert_eq!(emplace_tag("PLAIN.TGA", 'V', 3), "PLAIN.TGA");
        assert_eq!(emplace_tag("X_V0_V0.TGA", 'V', 12), "X_V12_V0.TGA");
    }

    #[test]
    fn animation_frames() {
        assert!(is_animated("WATER_A0.TGA"));
        assert!(!is_animated("WATER.TGA"));
        assert_eq!(anim_frame_name("WATER_A0.TGA", 2).as_deref(), Some("WATER_A2.TGA"));
        assert_eq!(anim_frame_name("WATER.TGA", 2), None);
    }
}
