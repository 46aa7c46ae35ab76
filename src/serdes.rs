//! # Serdes
//!
//! The serde capability converts between raw transport bytes and typed
//! messages. Descriptors only need to know *which* serde a stream uses so they
//! can name it in the compiled configuration; the conversion itself belongs to
//! the runtime.
//!
//! A few trivial serdes are provided so descriptors can be declared without
//! pulling in a codec crate. Anything richer implements [`Serde`] directly.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::marker::PhantomData;
use std::string::FromUtf8Error;
use std::sync::Arc;
use thiserror::Error;

/// Error raised by a serde conversion.
#[derive(Error, Debug)]
pub enum SerdeError {
  /// JSON encoding or decoding failed.
  #[error("json serde error: {0}")]
  Json(#[from] serde_json::Error),
  /// Bytes were not valid UTF-8.
  #[error("utf-8 serde error: {0}")]
  Utf8(#[from] FromUtf8Error),
  /// The serde does not convert values itself.
  #[error("{0} does not support direct conversion")]
  Unsupported(&'static str),
}

/// Registry names of the key and message serdes a stream uses.
///
/// These are the values written to `*.samza.key.serde` and
/// `*.samza.msg.serde`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SerdeNames {
  /// Serde for message keys.
  pub key: String,
  /// Serde for message bodies.
  pub msg: String,
}

impl SerdeNames {
  /// Creates a pair of serde names.
  pub fn new(key: impl Into<String>, msg: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      msg: msg.into(),
    }
  }
}

/// Converts between bytes and values of type `T`.
pub trait Serde<T>: Send + Sync {
  /// Serializes a value.
  fn to_bytes(&self, value: &T) -> Result<Vec<u8>, SerdeError>;

  /// Deserializes a value.
  fn from_bytes(&self, bytes: &[u8]) -> Result<T, SerdeError>;

  /// Registry name of this serde, as it appears in configuration.
  fn name(&self) -> Cow<'static, str>;

  /// Key and message serde names for a stream using this serde.
  ///
  /// Plain serdes describe the message only and leave keys untouched.
  fn serde_names(&self) -> SerdeNames {
    SerdeNames::new(NoOpSerde::<()>::NAME, self.name())
  }
}

impl<T, S> Serde<T> for Arc<S>
where
  S: Serde<T> + ?Sized,
{
  fn to_bytes(&self, value: &T) -> Result<Vec<u8>, SerdeError> {
    (**self).to_bytes(value)
  }

  fn from_bytes(&self, bytes: &[u8]) -> Result<T, SerdeError> {
    (**self).from_bytes(bytes)
  }

  fn name(&self) -> Cow<'static, str> {
    (**self).name()
  }

  fn serde_names(&self) -> SerdeNames {
    (**self).serde_names()
  }
}

/// Marks values the runtime passes through without conversion.
#[derive(Debug)]
pub struct NoOpSerde<T> {
  _marker: PhantomData<fn() -> T>,
}

impl<T> NoOpSerde<T> {
  /// Registry name of the no-op serde.
  pub const NAME: &'static str = "noop";

  /// Creates a no-op serde.
  pub fn new() -> Self {
    Self {
      _marker: PhantomData,
    }
  }
}

impl<T> Default for NoOpSerde<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Clone for NoOpSerde<T> {
  fn clone(&self) -> Self {
    Self::new()
  }
}

impl<T> Serde<T> for NoOpSerde<T> {
  fn to_bytes(&self, _value: &T) -> Result<Vec<u8>, SerdeError> {
    Err(SerdeError::Unsupported("NoOpSerde"))
  }

  fn from_bytes(&self, _bytes: &[u8]) -> Result<T, SerdeError> {
    Err(SerdeError::Unsupported("NoOpSerde"))
  }

  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed(Self::NAME)
  }
}

/// UTF-8 strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringSerde;

impl Serde<String> for StringSerde {
  fn to_bytes(&self, value: &String) -> Result<Vec<u8>, SerdeError> {
    Ok(value.as_bytes().to_vec())
  }

  fn from_bytes(&self, bytes: &[u8]) -> Result<String, SerdeError> {
    Ok(String::from_utf8(bytes.to_vec())?)
  }

  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("string")
  }
}

/// Raw byte payloads.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByteSerde;

impl Serde<Vec<u8>> for ByteSerde {
  fn to_bytes(&self, value: &Vec<u8>) -> Result<Vec<u8>, SerdeError> {
    Ok(value.clone())
  }

  fn from_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, SerdeError> {
    Ok(bytes.to_vec())
  }

  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("byte")
  }
}

/// JSON encoded values via `serde_json`.
#[derive(Debug)]
pub struct JsonSerde<T> {
  _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSerde<T> {
  /// Creates a JSON serde.
  pub fn new() -> Self {
    Self {
      _marker: PhantomData,
    }
  }
}

impl<T> Default for JsonSerde<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Clone for JsonSerde<T> {
  fn clone(&self) -> Self {
    Self::new()
  }
}

impl<T> Serde<T> for JsonSerde<T>
where
  T: Serialize + DeserializeOwned,
{
  fn to_bytes(&self, value: &T) -> Result<Vec<u8>, SerdeError> {
    Ok(serde_json::to_vec(value)?)
  }

  fn from_bytes(&self, bytes: &[u8]) -> Result<T, SerdeError> {
    Ok(serde_json::from_slice(bytes)?)
  }

  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("json")
  }
}

/// A keyed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KV<K, V> {
  /// Message key.
  pub key: K,
  /// Message body.
  pub value: V,
}

impl<K, V> KV<K, V> {
  /// Creates a keyed message.
  pub fn of(key: K, value: V) -> Self {
    Self { key, value }
  }
}

/// Pairs a key serde with a message serde.
///
/// Only names the two halves for configuration; the runtime applies them to
/// keys and bodies separately, so direct conversion is unsupported.
pub struct KvSerde<K, V> {
  key_serde: Arc<dyn Serde<K>>,
  value_serde: Arc<dyn Serde<V>>,
}

impl<K, V> KvSerde<K, V> {
  /// Creates a key/value serde.
  pub fn of<KS, VS>(key_serde: KS, value_serde: VS) -> Self
  where
    KS: Serde<K> + 'static,
    VS: Serde<V> + 'static,
  {
    Self {
      key_serde: Arc::new(key_serde),
      value_serde: Arc::new(value_serde),
    }
  }

  /// The key serde.
  pub fn key_serde(&self) -> &Arc<dyn Serde<K>> {
    &self.key_serde
  }

  /// The value serde.
  pub fn value_serde(&self) -> &Arc<dyn Serde<V>> {
    &self.value_serde
  }
}

impl<K, V> Clone for KvSerde<K, V> {
  fn clone(&self) -> Self {
    Self {
      key_serde: Arc::clone(&self.key_serde),
      value_serde: Arc::clone(&self.value_serde),
    }
  }
}

impl<K, V> Serde<KV<K, V>> for KvSerde<K, V> {
  fn to_bytes(&self, _value: &KV<K, V>) -> Result<Vec<u8>, SerdeError> {
    Err(SerdeError::Unsupported("KvSerde"))
  }

  fn from_bytes(&self, _bytes: &[u8]) -> Result<KV<K, V>, SerdeError> {
    Err(SerdeError::Unsupported("KvSerde"))
  }

  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("kv")
  }

  fn serde_names(&self) -> SerdeNames {
    SerdeNames::new(self.key_serde.name(), self.value_serde.name())
  }
}
