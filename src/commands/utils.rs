use std::path::{Path, PathBuf};

/// Output path next to the input: the final extension is dropped and `.svg`
/// appended, so `sprite.sheet.png` becomes `sprite.sheet.svg`.
pub fn derive_svg_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut file_name = stem.to_os_string();
    file_name.push(".svg");
    input.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_extension() {
        assert_eq!(
            derive_svg_path(Path::new("sprites/hero.png")),
            PathBuf::from("sprites/hero.svg")
        );
    }

    #[test]
    fn adds_missing_extension() {
        assert_eq!(derive_svg_path(Path::new("hero")), PathBuf::from("hero.svg"));
    }

    #[test]
    fn only_last_extension_is_dropped() {
        assert_eq!(
            derive_svg_path(Path::new("art/sprite.sheet.png")),
            PathBuf::from("art/sprite.sheet.svg")
        );
    }
}
