//! Method registry: every envelope method with its parameter and result
//! schema.
//!
//! [`Method`] is the runtime view used when decoding envelopes. The marker
//! types in [`spec`] carry the same table at the type level so request
//! encoding and result decoding are checked at compile time.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::action::TypedMessage;
use crate::error::ProtoError;
use crate::messages::*;

/// Compile-time binding of a method to its parameter and output schemas
pub trait MethodSpec {
    const METHOD: Method;
    type Param: TypedMessage;
    type Output: TypedMessage;
}

macro_rules! define_methods {
    ($( $variant:ident => $name:literal, $param:ident, $result:ident; )*) => {
        /// Envelope methods understood by the engine
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Method {
            $( $variant, )*
            SignTx,
        }

        impl Method {
            pub const ALL: &'static [Method] = &[ $( Method::$variant, )* Method::SignTx ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Method::$variant => $name, )*
                    Method::SignTx => "sign_tx",
                }
            }

            pub fn param_type_id(&self) -> &'static str {
                match self {
                    $( Method::$variant => <$param as TypedMessage>::TYPE_ID, )*
                    Method::SignTx => <SignParam as TypedMessage>::TYPE_ID,
                }
            }

            /// Result schema, or `None` when it is selected by the sign input
            pub fn result_type_id(&self) -> Option<&'static str> {
                match self {
                    $( Method::$variant => Some(<$result as TypedMessage>::TYPE_ID), )*
                    Method::SignTx => None,
                }
            }
        }

        impl FromStr for Method {
            type Err = ProtoError;

            /// Method names match case-insensitively
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $( $name => Ok(Method::$variant), )*
                    "sign_tx" => Ok(Method::SignTx),
                    _ => Err(ProtoError::UnknownMethod(s.to_string())),
                }
            }
        }

        /// Type-level method markers
        pub mod spec {
            use super::*;

            $(
                #[derive(Debug, Clone, Copy, Default)]
                pub struct $variant;

                impl MethodSpec for $variant {
                    const METHOD: Method = Method::$variant;
                    type Param = $param;
                    type Output = $result;
                }
            )*

            /// `sign_tx` for a given chain input; the output follows the input
            #[derive(Debug, Clone, Copy, Default)]
            pub struct SignTx<I>(PhantomData<I>);

            impl<I: SignInput> MethodSpec for SignTx<I> {
                const METHOD: Method = Method::SignTx;
                type Param = SignParam;
                type Output = I::Output;
            }
        }
    };
}

define_methods! {
    InitTokenCoreX => "init_token_core_x", InitParam, Response;
    HdStoreCreate => "hd_store_create", HdStoreCreateParam, WalletResult;
    HdStoreImport => "hd_store_import", HdStoreImportParam, WalletResult;
    HdStoreDerive => "hd_store_derive", HdStoreDeriveParam, AccountsResponse;
    HdStoreExport => "hd_store_export", WalletKeyParam, KeystoreCommonExportResult;
    HdStoreExtendedPublicKey => "hd_store_extended_public_key", HdStoreExtendedPublicKeyParam, HdStoreExtendedPublicKeyResponse;
    PrivateKeyStoreImport => "private_key_store_import", PrivateKeyStoreImportParam, WalletResult;
    PrivateKeyStoreExport => "private_key_store_export", PrivateKeyStoreExportParam, KeystoreCommonExportResult;
    KeystoreCommonVerify => "keystore_common_verify", WalletKeyParam, Response;
    KeystoreCommonDelete => "keystore_common_delete", WalletKeyParam, Response;
    KeystoreCommonExists => "keystore_common_exists", KeystoreCommonExistsParam, KeystoreCommonExistsResult;
    KeystoreCommonAccounts => "keystore_common_accounts", KeystoreCommonAccountsParam, AccountsResponse;
    TronSignMsg => "tron_sign_msg", SignParam, TronMessageOutput;
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Method {
    /// Methods whose parameter is a [`SignParam`] carrying a nested input
    pub fn is_sign(&self) -> bool {
        matches!(self, Method::SignTx | Method::TronSignMsg)
    }
}

/// Result schema a sign input resolves to
pub fn sign_output_type_id(input_type: &str) -> Option<&'static str> {
    match crate::action::bare_type_name(input_type) {
        t if t == BtcForkTxInput::TYPE_ID => Some(BtcForkSignedTxOutput::TYPE_ID),
        t if t == TronTxInput::TYPE_ID => Some(TronTxOutput::TYPE_ID),
        t if t == TronMessageInput::TYPE_ID => Some(TronMessageOutput::TYPE_ID),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for method in Method::ALL {
            assert_eq!(method.name().parse::<Method>().unwrap(), *method);
        }
        assert_eq!(Method::ALL.len(), 14);
    }

    #[test]
    fn method_names_ignore_case() {
        assert_eq!("HD_STORE_IMPORT".parse::<Method>().unwrap(), Method::HdStoreImport);
        assert_eq!("Sign_Tx".parse::<Method>().unwrap(), Method::SignTx);
        assert_eq!(Method::TronSignMsg.name(), "tron_sign_msg");
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = "hd_store_frobnicate".parse::<Method>().unwrap_err();
        assert!(err.to_string().contains("unsupported_method"));
    }

    #[test]
    fn schema_table_matches_markers() {
        assert_eq!(
            Method::HdStoreImport.param_type_id(),
            <<spec::HdStoreImport as MethodSpec>::Param as TypedMessage>::TYPE_ID
        );
        assert_eq!(Method::HdStoreExport.result_type_id(), Some("KeystoreCommonExportResult"));
        assert_eq!(Method::SignTx.result_type_id(), None);
        assert_eq!(
            <<spec::SignTx<TronTxInput> as MethodSpec>::Output as TypedMessage>::TYPE_ID,
            "TronTxOutput"
        );
        assert_eq!(sign_output_type_id("api.BtcForkTxInput"), Some("BtcForkSignedTxOutput"));
        assert_eq!(sign_output_type_id("EthTxInput"), None);
    }
}
