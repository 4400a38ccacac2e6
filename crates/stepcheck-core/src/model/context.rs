//! Contexto compartido entregado a `Step::execute`.
//!
//! Es un mapa `ContextKey -> valor` de tipo arbitrario. Se crea una vez por
//! invocación raíz y se pasa por referencia a todo el árbol; cualquier step
//! puede leer o escribir (gana el último escritor, sin rollback).
//!
//! No tiene sincronización interna: está pensado para un recorrido
//! secuencial de un solo árbol. Si se paralelizan subárboles, el contexto
//! debe protegerse o particionarse desde afuera.
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;

use super::{ExecutionResult, MessageCategory};
use crate::errors::ContextError;

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);

/// Token opaco usado como clave del contexto.
///
/// Se compara por identidad: dos claves creadas con `new` son distintas
/// aunque compartan descripción. Clonar una clave produce un alias de la
/// misma identidad. Productores y consumidores deben compartir la definición
/// canónica (típicamente un `static` perezoso).
#[derive(Clone)]
pub struct ContextKey {
    id: u64,
    description: Arc<str>,
}

impl ContextKey {
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Self { id: NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed),
               description: description.into() }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for ContextKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContextKey {}

impl Hash for ContextKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextKey({}#{})", self.description, self.id)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Valor almacenado junto con el nombre de su tipo concreto.
/// `value == None` representa una clave presente con valor nulo.
struct Slot {
    value: Option<Box<dyn Any>>,
    type_name: &'static str,
}

#[derive(Default)]
pub struct ExecutionContext {
    entries: HashMap<ContextKey, Slot>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: HashMap::with_capacity(capacity) }
    }

    /// Inserta (o reemplaza) el valor.
    pub fn put<T: Any>(&mut self, key: &ContextKey, value: T) {
        self.put_with(key, value, true);
    }

    /// Con `overwrite == false` no reemplaza un valor presente no nulo.
    pub fn put_with<T: Any>(&mut self, key: &ContextKey, value: T, overwrite: bool) {
        if !overwrite && self.exists_and_not_null(key) {
            return;
        }
        self.entries.insert(key.clone(),
                            Slot { value: Some(Box::new(value)),
                                   type_name: type_name::<T>() });
    }

    /// Registra la clave sin valor (equivalente a un valor nulo).
    pub fn put_empty(&mut self, key: &ContextKey) {
        self.entries.insert(key.clone(),
                            Slot { value: None,
                                   type_name: "()" });
    }

    pub fn remove(&mut self, key: &ContextKey) {
        self.entries.remove(key);
    }

    /// Lectura sin tipo; nunca falla.
    pub fn get_raw(&self, key: &ContextKey) -> Option<&dyn Any> {
        self.entries.get(key).and_then(|s| s.value.as_deref())
    }

    /// Lectura sin tipo que, si la clave está ausente, agrega un mensaje
    /// ERROR a `result` y devuelve `None`.
    pub fn require(&self, key: &ContextKey, result: &mut ExecutionResult) -> Option<&dyn Any> {
        let value = self.get_raw(key);
        if value.is_none() {
            record_missing(key, result);
        }
        value
    }

    /// Lectura tipada por coincidencia exacta de tipo.
    ///
    /// `Ok(None)` si la clave está ausente o nula; `TypeMismatch` si el valor
    /// almacenado es de otro tipo concreto.
    pub fn get<T: Any>(&self, key: &ContextKey) -> Result<Option<&T>, ContextError> {
        let Some(slot) = self.entries.get(key) else { return Ok(None) };
        let Some(value) = slot.value.as_deref() else { return Ok(None) };
        value.downcast_ref::<T>()
             .map(Some)
             .ok_or_else(|| mismatch::<T>(key, slot.type_name))
    }

    pub fn get_mut<T: Any>(&mut self, key: &ContextKey) -> Result<Option<&mut T>, ContextError> {
        let Some(slot) = self.entries.get_mut(key) else { return Ok(None) };
        let actual = slot.type_name;
        let Some(value) = slot.value.as_deref_mut() else { return Ok(None) };
        value.downcast_mut::<T>()
             .map(Some)
             .ok_or_else(|| mismatch::<T>(key, actual))
    }

    /// Combinación de `get` tipado + registro del faltante en `result`.
    pub fn require_as<T: Any>(&self,
                              key: &ContextKey,
                              result: &mut ExecutionResult)
                              -> Result<Option<&T>, ContextError> {
        let value = self.get::<T>(key)?;
        if value.is_none() {
            record_missing(key, result);
        }
        Ok(value)
    }

    pub fn exists(&self, key: &ContextKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn exists_and_not_null(&self, key: &ContextKey) -> bool {
        self.get_raw(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
         .entries(self.entries.iter().map(|(k, s)| (k.description(), s.type_name)))
         .finish()
    }
}

fn record_missing(key: &ContextKey, result: &mut ExecutionResult) {
    let msg = ContextError::MissingKey(key.description().to_string()).to_string();
    debug!("{msg}");
    result.add_message_with(MessageCategory::Error, msg);
}

fn mismatch<T>(key: &ContextKey, actual: &'static str) -> ContextError {
    ContextError::TypeMismatch { key: key.description().to_string(),
                                 expected: type_name::<T>(),
                                 actual }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn keys_compare_by_identity() {
        let a = ContextKey::new("same");
        let b = ContextKey::new("same");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let mut ctx = ExecutionContext::new();
        ctx.put(&a, 1_u32);
        assert!(ctx.exists(&a));
        assert!(!ctx.exists(&b));
    }

    #[test]
    fn put_without_overwrite_keeps_first_value() {
        let key = ContextKey::new("k");
        let mut ctx = ExecutionContext::new();
        ctx.put_with(&key, "v".to_string(), false);
        ctx.put_with(&key, "v2".to_string(), false);
        assert_eq!(ctx.get::<String>(&key).unwrap().map(String::as_str), Some("v"));
        ctx.put(&key, "v3".to_string());
        assert_eq!(ctx.get::<String>(&key).unwrap().map(String::as_str), Some("v3"));
    }

    #[test]
    fn put_without_overwrite_replaces_empty_slot() {
        let key = ContextKey::new("k");
        let mut ctx = ExecutionContext::new();
        ctx.put_empty(&key);
        assert!(ctx.exists(&key));
        assert!(!ctx.exists_and_not_null(&key));
        ctx.put_with(&key, 7_i64, false);
        assert_eq!(ctx.get::<i64>(&key).unwrap(), Some(&7));
    }

    #[test]
    fn typed_get_is_exact() {
        let key = ContextKey::new("dir");
        let mut ctx = ExecutionContext::new();
        ctx.put(&key, PathBuf::from("/tmp"));
        assert_eq!(ctx.get::<PathBuf>(&key).unwrap(), Some(&PathBuf::from("/tmp")));

        let err = ctx.get::<String>(&key).unwrap_err();
        match err {
            ContextError::TypeMismatch { key, expected, actual } => {
                assert_eq!(key, "dir");
                assert!(expected.contains("String"));
                assert!(actual.contains("PathBuf"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn require_records_error_message_when_absent() {
        let key = ContextKey::new("input directory");
        let ctx = ExecutionContext::new();
        let mut result = ExecutionResult::new();
        assert!(ctx.require(&key, &mut result).is_none());
        assert_eq!(result.messages_of(MessageCategory::Error),
                   vec!["'input directory' does not exist in the current context."]);
    }

    #[test]
    fn require_as_treats_null_as_absent() {
        let key = ContextKey::new("files");
        let mut ctx = ExecutionContext::new();
        ctx.put_empty(&key);
        let mut result = ExecutionResult::new();
        assert_eq!(ctx.require_as::<Vec<PathBuf>>(&key, &mut result).unwrap(), None);
        assert_eq!(result.messages().len(), 1);
    }

    #[test]
    fn get_mut_updates_in_place_and_remove_is_idempotent() {
        let key = ContextKey::new("counter");
        let mut ctx = ExecutionContext::new();
        ctx.put(&key, 1_u32);
        if let Some(v) = ctx.get_mut::<u32>(&key).unwrap() {
            *v += 1;
        }
        assert_eq!(ctx.get::<u32>(&key).unwrap(), Some(&2));
        ctx.remove(&key);
        ctx.remove(&key);
        assert!(ctx.is_empty());
        assert_eq!(ctx.get_raw(&key).map(|_| ()), None);
    }
}
