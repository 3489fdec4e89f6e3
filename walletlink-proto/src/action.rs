//! The request envelope and its typed payload wrapper.

use prost::Message;

use crate::error::{ProtoError, Result};

/// A message that can travel inside a [`TypedAny`].
///
/// `TYPE_ID` is the bare schema name. Packed payloads may carry a qualified
/// url such as `type.googleapis.com/api.HdStoreImportParam`; only the final
/// segment is compared.
pub trait TypedMessage: Message + Default + Clone {
    const TYPE_ID: &'static str;

    /// Structural checks run before a request is encoded
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Schema-identified payload
#[derive(Clone, PartialEq, Message)]
pub struct TypedAny {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// Request envelope: the method name plus its packed parameter
#[derive(Clone, PartialEq, Message)]
pub struct Action {
    #[prost(string, tag = "1")]
    pub method: String,
    #[prost(message, optional, tag = "2")]
    pub param: Option<TypedAny>,
}

/// Strip any url prefix and package qualifier from a type url
pub fn bare_type_name(type_url: &str) -> &str {
    let tail = type_url.rsplit('/').next().unwrap_or(type_url);
    tail.rsplit('.').next().unwrap_or(tail)
}

impl TypedAny {
    pub fn pack<T: TypedMessage>(message: &T) -> Self {
        Self {
            type_url: T::TYPE_ID.to_string(),
            value: message.encode_to_vec(),
        }
    }

    pub fn type_name(&self) -> &str {
        bare_type_name(&self.type_url)
    }

    pub fn is<T: TypedMessage>(&self) -> bool {
        self.type_name() == T::TYPE_ID
    }

    /// Decode the payload, refusing a payload packed under another schema
    pub fn unpack<T: TypedMessage>(&self) -> Result<T> {
        if !self.is::<T>() {
            return Err(ProtoError::TypeMismatch {
                expected: T::TYPE_ID.to_string(),
                found: self.type_url.clone(),
            });
        }
        Ok(T::decode(self.value.as_slice())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{HdStoreCreateParam, WalletKeyParam};

    #[test]
    fn bare_name_ignores_prefixes() {
        assert_eq!(bare_type_name("WalletKeyParam"), "WalletKeyParam");
        assert_eq!(bare_type_name("api.WalletKeyParam"), "WalletKeyParam");
        assert_eq!(
            bare_type_name("type.googleapis.com/api.WalletKeyParam"),
            "WalletKeyParam"
        );
    }

    #[test]
    fn unpack_checks_schema() {
        let param = WalletKeyParam {
            id: "abc".into(),
            password: "pw".into(),
        };
        let any = TypedAny::pack(&param);
        assert_eq!(any.unpack::<WalletKeyParam>().unwrap(), param);

        let err = any.unpack::<HdStoreCreateParam>().unwrap_err();
        assert!(matches!(err, ProtoError::TypeMismatch { .. }));
    }

    #[test]
    fn qualified_url_still_unpacks() {
        let param = WalletKeyParam {
            id: "abc".into(),
            password: String::new(),
        };
        let mut any = TypedAny::pack(&param);
        any.type_url = "type.googleapis.com/api.WalletKeyParam".into();
        assert_eq!(any.unpack::<WalletKeyParam>().unwrap().id, "abc");
    }
}
