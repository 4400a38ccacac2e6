//! Almacén de propiedades (servicio de configuración).
//!
//! Se construye explícitamente y se inyecta a quien lo necesite. Soporta dos
//! formatos de archivo:
//! - texto `.properties` (`clave=valor`, `clave: valor`, comentarios `#`/`!`,
//!   continuación de línea con `\` final);
//! - XML (`<properties><entry key="k">v</entry></properties>`), elegido
//!   cuando la extensión es `xml`.
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::document::DocumentLoader;
use crate::error::ConfigError;

/// Variable de entorno que redefine la ruta del archivo de propiedades.
pub const PROPERTIES_ENV: &str = "STEPCHECK_PROPERTIES";
/// Archivo usado cuando `PROPERTIES_ENV` no está definida.
pub const DEFAULT_PROPERTIES_FILE: &str = "stepcheck.properties.xml";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    values: IndexMap<String, String>,
}

#[derive(Deserialize)]
struct XmlProperties {
    #[serde(rename = "entry", default)]
    entries: Vec<XmlEntry>,
}

#[derive(Deserialize)]
struct XmlEntry {
    #[serde(rename = "@key")]
    key: String,
    #[serde(rename = "$text", default)]
    value: String,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
        where I: IntoIterator<Item = (K, V)>,
              K: Into<String>,
              V: Into<String>
    {
        Self { values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Resuelve la ruta desde `PROPERTIES_ENV` o usa `DEFAULT_PROPERTIES_FILE`.
    pub fn load_default() -> Result<Self, ConfigError> {
        match env::var(PROPERTIES_ENV) {
            Ok(path) => {
                let path = PathBuf::from(path);
                debug!("Loading properties using {PROPERTIES_ENV}: {}", path.display());
                if !path.is_file() {
                    return Err(ConfigError::EnvPathNotFound { var: PROPERTIES_ENV,
                                                              path });
                }
                Self::load(&path)
            }
            Err(_) => Self::load(Path::new(DEFAULT_PROPERTIES_FILE)),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Attempting to load properties file: {}", path.display());
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(),
                                                                                 source })?;
        let is_xml = path.extension()
                         .and_then(|e| e.to_str())
                         .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
        if is_xml {
            Self::parse_xml(&content).map_err(|reason| ConfigError::Malformed { path: path.to_path_buf(),
                                                                                reason })
        } else {
            Self::parse_text(&content).map_err(|reason| ConfigError::Malformed { path: path.to_path_buf(),
                                                                                 reason })
        }
    }

    pub fn parse_xml(content: &str) -> Result<Self, String> {
        let parsed: XmlProperties = DocumentLoader::new().parse_str(content).map_err(|e| e.to_string())?;
        Ok(Self::from_pairs(parsed.entries.into_iter().map(|e| (e.key, e.value))))
    }

    pub fn parse_text(content: &str) -> Result<Self, String> {
        let mut values = IndexMap::new();
        let mut lines = content.lines();
        while let Some(first) = lines.next() {
            let mut logical = first.trim_start().to_string();
            if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
                continue;
            }
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }
            let (key, value) = split_entry(&logical);
            if key.is_empty() {
                return Err(format!("entry without key: {logical}"));
            }
            values.insert(key, value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn get_string(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or(default).to_string()
    }

    /// Ausente o vacío -> `default`; si no, `true` sólo para "true" (sin
    /// distinguir mayúsculas).
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            None | Some("") => default,
            Some(v) => v.eq_ignore_ascii_case("true"),
        }
    }

    /// Redefine una propiedad ya cargada (útil en pruebas).
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// Un número impar de `\` al final indica continuación.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    key.push(unescape(next));
                }
            }
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                if chars.peek().is_some_and(|c| *c == '=' || *c == ':') {
                    chars.next();
                }
                break;
            }
            c => key.push(c),
        }
    }
    let rest: String = chars.collect();
    let mut value = String::new();
    let mut rest = rest.trim_start().chars();
    while let Some(c) = rest.next() {
        if c == '\\' {
            if let Some(next) = rest.next() {
                value.push(unescape(next));
            }
        } else {
            value.push(c);
        }
    }
    (key, value)
}

fn unescape(c: char) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'f' => '\u{c}',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_format_separators_comments_and_continuations() {
        let content = "# comment\n! other\n\ndbUser=scott\ndbPassword : tiger\nname  value with spaces\nlong = a,\\\n       b\npath=C\\:\\\\data\n";
        let props = PropertyStore::parse_text(content).unwrap();
        assert_eq!(props.get("dbUser"), Some("scott"));
        assert_eq!(props.get("dbPassword"), Some("tiger"));
        assert_eq!(props.get("name"), Some("value with spaces"));
        assert_eq!(props.get("long"), Some("a,b"));
        assert_eq!(props.get("path"), Some("C:\\data"));
        assert_eq!(props.len(), 5);
    }

    #[test]
    fn xml_format() {
        let content = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE properties SYSTEM "http://java.sun.com/dtd/properties.dtd">
<properties>
    <comment>db settings</comment>
    <entry key="dbConnectionUrl">postgres://localhost/checks</entry>
    <entry key="markProcessed">TRUE</entry>
    <entry key="empty"></entry>
</properties>"#;
        let props = PropertyStore::parse_xml(content).unwrap();
        assert_eq!(props.get("dbConnectionUrl"), Some("postgres://localhost/checks"));
        assert!(props.get_bool("markProcessed", false));
        assert!(props.get_bool("empty", true));
    }

    #[test]
    fn defaults_for_absent_values() {
        let props = PropertyStore::from_pairs([("flag", "yes"), ("ext", "csv")]);
        assert_eq!(props.get_string("ext", "xml"), "csv");
        assert_eq!(props.get_string("missing", "xml"), "xml");
        assert!(!props.get_bool("flag", true));
        assert!(props.get_bool("missing", true));
    }

    #[test]
    fn set_overrides() {
        let mut props = PropertyStore::new();
        assert!(props.is_empty());
        props.set("a", "1");
        props.set("a", "2");
        assert_eq!(props.iter().collect::<Vec<_>>(), vec![("a", "2")]);
    }
}
