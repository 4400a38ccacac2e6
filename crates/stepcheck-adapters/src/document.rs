//! Carga de documentos XML hacia estructuras `serde` (quick-xml).
//!
//! Los steps concretos lo usan como servicio inyectado; no participa del
//! protocolo de ejecución.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, error};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_str<T: DeserializeOwned>(&self, xml: &str) -> Result<T, ParseError> {
        quick_xml::de::from_str(xml).map_err(|e| malformed("<string>", e))
    }

    pub fn parse_reader<T, R>(&self, reader: R) -> Result<T, ParseError>
        where T: DeserializeOwned,
              R: BufRead
    {
        quick_xml::de::from_reader(reader).map_err(|e| malformed("<reader>", e))
    }

    pub fn parse_file<T: DeserializeOwned>(&self, path: &Path) -> Result<T, ParseError> {
        if !path.is_file() {
            error!("The expected xml file does not exist at: {}", path.display());
            return Err(ParseError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|source| ParseError::Io { path: path.to_path_buf(),
                                                                     source })?;
        quick_xml::de::from_reader(BufReader::new(file)).map_err(|e| malformed(&path.display().to_string(), e))
    }

    /// Verifica que `xml` esté bien formado: etiquetas balanceadas, un único
    /// elemento raíz y nada más que espacios fuera de él. No interpreta el
    /// contenido.
    pub fn check_well_formed(&self, xml: &str) -> Result<(), ParseError> {
        self.check_well_formed_bytes(xml.as_bytes())
    }

    /// Igual que `check_well_formed` pero sobre bytes crudos, sin exigir
    /// UTF-8: documentos en otras codificaciones (p. ej. ISO-8859-1) se
    /// revisan a nivel de estructura.
    pub fn check_well_formed_bytes(&self, xml: &[u8]) -> Result<(), ParseError> {
        let xml = xml.strip_prefix(UTF8_BOM).unwrap_or(xml);
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut depth: usize = 0;
        let mut saw_root = false;
        loop {
            let position = reader.buffer_position();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(_)) => {
                    if depth == 0 && saw_root {
                        return Err(ill_formed(format!("second root element at byte {position}")));
                    }
                    depth += 1;
                    saw_root = true;
                }
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Empty(_)) => {
                    if depth == 0 && saw_root {
                        return Err(ill_formed(format!("second root element at byte {position}")));
                    }
                    saw_root = true;
                }
                Ok(Event::Text(text)) if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) => {
                    return Err(ill_formed(format!("text outside the root element at byte {position}")));
                }
                Ok(Event::CData(_)) if depth == 0 => {
                    return Err(ill_formed(format!("CDATA outside the root element at byte {position}")));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(ill_formed(format!("at byte {}: {e}", reader.buffer_position()))),
            }
            buf.clear();
        }
        if depth > 0 {
            return Err(ill_formed(format!("{depth} unclosed element(s)")));
        }
        if !saw_root {
            return Err(ill_formed("no root element".into()));
        }
        Ok(())
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn ill_formed(reason: String) -> ParseError {
    ParseError::Malformed { origin: "<document>".into(),
                            reason }
}

fn malformed(origin: &str, err: quick_xml::de::DeError) -> ParseError {
    debug!("xml deserialization failed for {origin}: {err}");
    ParseError::Malformed { origin: origin.to_string(),
                            reason: err.to_string() }
}
