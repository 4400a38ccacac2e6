//! Utilidades de archivos y rutas usadas por steps concretos.
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

static SAFE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// Borra recursivamente los archivos `*.ext` bajo `dir`, sin descender a
/// `excluded`. Devuelve cuántos archivos se borraron.
pub fn delete_files(dir: &Path, ext: &str, excluded: &[PathBuf]) -> io::Result<usize> {
    let suffix = format!(".{ext}");
    let mut deleted = 0;
    let walker = WalkDir::new(dir).into_iter()
                                  .filter_entry(|e| !(e.file_type().is_dir() && excluded.iter().any(|x| x == e.path())));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(&suffix) {
            debug!("deleting {}", entry.path().display());
            fs::remove_file(entry.path())?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Une las partes con el separador del sistema y normaliza (`.`/`..`,
/// separadores repetidos, sin separador final).
pub fn construct_file_path(parts: &[&str]) -> PathBuf {
    let sep = MAIN_SEPARATOR.to_string();
    normalize(Path::new(&parts.join(&sep)))
}

/// Últimos `segments` segmentos de la ruta, con separador inicial. Rutas en
/// blanco o más cortas se devuelven sin cambios.
pub fn file_path_tail(path: &str, segments: usize) -> String {
    if path.trim().is_empty() {
        return path.to_string();
    }
    let parts: Vec<&str> = path.split(MAIN_SEPARATOR).collect();
    if parts.len() <= segments {
        return path.to_string();
    }
    let mut tail = String::new();
    for p in &parts[parts.len() - segments..] {
        tail.push(MAIN_SEPARATOR);
        tail.push_str(p);
    }
    normalize(Path::new(&tail)).to_string_lossy().into_owned()
}

/// Sólo alfanuméricos, `-` y `_` (sin espacios). `None` se acepta.
pub fn is_alphanumeric(value: Option<&str>) -> bool {
    value.map_or(true, |v| SAFE_IDENTIFIER.is_match(v))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn builds_normalized_paths() {
        assert_eq!(construct_file_path(&["/data", "in/", "./orders", "..", "x.xml"]),
                   PathBuf::from("/data/in/x.xml"));
        assert_eq!(construct_file_path(&["a", "b/"]), PathBuf::from("a/b"));
    }

    #[test]
    fn tail_keeps_last_segments() {
        assert_eq!(file_path_tail("/srv/data/in/orders.xml", 2), "/in/orders.xml");
        assert_eq!(file_path_tail("a/b", 3), "a/b");
        assert_eq!(file_path_tail("  ", 1), "  ");
    }

    #[test]
    fn identifier_check() {
        assert!(is_alphanumeric(Some("table_01-a")));
        assert!(!is_alphanumeric(Some("drop table")));
        assert!(!is_alphanumeric(Some("x;--")));
        assert!(!is_alphanumeric(Some("")));
        assert!(is_alphanumeric(None));
    }

    #[test]
    fn deletes_by_extension_skipping_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep");
        let nested = dir.path().join("nested");
        fs::create_dir_all(&keep).unwrap();
        fs::create_dir_all(&nested).unwrap();
        for p in [dir.path().join("a.stat"), nested.join("b.stat"), keep.join("c.stat"), dir.path().join("d.xml")] {
            fs::write(p, "").unwrap();
        }

        let deleted = delete_files(dir.path(), "stat", &[keep.clone()]).unwrap();
        assert_eq!(deleted, 2);
        assert!(keep.join("c.stat").exists());
        assert!(dir.path().join("d.xml").exists());
        assert!(!nested.join("b.stat").exists());
    }
}
