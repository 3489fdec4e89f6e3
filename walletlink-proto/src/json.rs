//! JSON view of envelopes, used by the case harness.
//!
//! A case is `{"method": ..., "param": {"type": ..., ...fields}}`. Sign
//! methods nest their chain input as `param.input` with its own `type`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::action::{TypedAny, TypedMessage};
use crate::codec::{decode_result, encode_dynamic};
use crate::error::{ProtoError, Result};
use crate::messages::*;
use crate::registry::{sign_output_type_id, spec, Method};

/// A request built from a JSON case
#[derive(Debug, Clone)]
pub struct JsonRequest {
    pub method: Method,
    pub bytes: Vec<u8>,
    /// Type of the nested sign input, when the method signs
    pub sign_input_type: Option<String>,
}

fn from_json<P: TypedMessage + DeserializeOwned>(method: Method, param: Value) -> Result<Vec<u8>> {
    let param: P = serde_json::from_value(param)?;
    encode_dynamic(method, &param)
}

fn pack_json<I: TypedMessage + DeserializeOwned>(input: Value) -> Result<TypedAny> {
    let input: I = serde_json::from_value(input)?;
    input.validate()?;
    Ok(TypedAny::pack(&input))
}

fn pack_sign_input(type_name: &str, input: Value) -> Result<TypedAny> {
    match crate::action::bare_type_name(type_name) {
        t if t == BtcForkTxInput::TYPE_ID => pack_json::<BtcForkTxInput>(input),
        t if t == TronTxInput::TYPE_ID => pack_json::<TronTxInput>(input),
        t if t == TronMessageInput::TYPE_ID => pack_json::<TronMessageInput>(input),
        other => Err(ProtoError::TypeMismatch {
            expected: "sign input".to_string(),
            found: other.to_string(),
        }),
    }
}

fn type_of(value: &Value) -> Option<String> {
    value.get("type").and_then(Value::as_str).map(str::to_string)
}

// Drop the schema name so it cannot collide with a message's own `type` field
fn strip_schema_name(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        if matches!(map.get("type"), Some(Value::String(_))) {
            map.remove("type");
        }
    }
    value
}

fn encode_sign_case(method: Method, param: Value) -> Result<JsonRequest> {
    let input = param
        .get("input")
        .cloned()
        .ok_or_else(|| ProtoError::invalid(SignParam::TYPE_ID, "input is missing"))?;
    let input_type = type_of(&input)
        .ok_or_else(|| ProtoError::invalid(SignParam::TYPE_ID, "input type is missing"))?;
    let mut sign: SignParam = serde_json::from_value(strip_schema_name(param))?;
    sign.input = Some(pack_sign_input(&input_type, strip_schema_name(input))?);
    Ok(JsonRequest {
        method,
        bytes: encode_dynamic(method, &sign)?,
        sign_input_type: Some(input_type),
    })
}

/// Encode one JSON case into envelope bytes
pub fn encode_json_case(case: &Value) -> Result<JsonRequest> {
    let method: Method = case
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .parse()?;
    let param = case.get("param").cloned().unwrap_or(Value::Null);
    if method.is_sign() {
        return encode_sign_case(method, param);
    }
    let param = strip_schema_name(param);

    let bytes = match method {
        Method::InitTokenCoreX => from_json::<InitParam>(method, param)?,
        Method::HdStoreCreate => from_json::<HdStoreCreateParam>(method, param)?,
        Method::HdStoreImport => from_json::<HdStoreImportParam>(method, param)?,
        Method::HdStoreDerive => from_json::<HdStoreDeriveParam>(method, param)?,
        Method::HdStoreExtendedPublicKey => {
            from_json::<HdStoreExtendedPublicKeyParam>(method, param)?
        }
        Method::PrivateKeyStoreImport => from_json::<PrivateKeyStoreImportParam>(method, param)?,
        Method::PrivateKeyStoreExport => from_json::<PrivateKeyStoreExportParam>(method, param)?,
        Method::HdStoreExport | Method::KeystoreCommonVerify | Method::KeystoreCommonDelete => {
            from_json::<WalletKeyParam>(method, param)?
        }
        Method::KeystoreCommonExists => from_json::<KeystoreCommonExistsParam>(method, param)?,
        Method::KeystoreCommonAccounts => {
            from_json::<KeystoreCommonAccountsParam>(method, param)?
        }
        Method::SignTx | Method::TronSignMsg => return encode_sign_case(method, Value::Null),
    };
    Ok(JsonRequest {
        method,
        bytes,
        sign_input_type: None,
    })
}

fn to_json<T: TypedMessage + Serialize>(bytes: &[u8]) -> Result<Value> {
    let message = T::decode(bytes)?;
    Ok(serde_json::to_value(message)?)
}

/// Decode result bytes into JSON using the schema registered for the request
pub fn decode_json_result(request: &JsonRequest, bytes: &[u8]) -> Result<Value> {
    if request.method == Method::TronSignMsg {
        return Ok(serde_json::to_value(decode_result::<spec::TronSignMsg>(bytes)?)?);
    }
    let type_id = request
        .method
        .result_type_id()
        .or_else(|| request.sign_input_type.as_deref().and_then(sign_output_type_id))
        .ok_or_else(|| ProtoError::TypeMismatch {
            expected: "sign input".to_string(),
            found: request.sign_input_type.clone().unwrap_or_default(),
        })?;

    match type_id {
        t if t == Response::TYPE_ID => to_json::<Response>(bytes),
        t if t == WalletResult::TYPE_ID => to_json::<WalletResult>(bytes),
        t if t == AccountsResponse::TYPE_ID => to_json::<AccountsResponse>(bytes),
        t if t == KeystoreCommonExportResult::TYPE_ID => to_json::<KeystoreCommonExportResult>(bytes),
        t if t == HdStoreExtendedPublicKeyResponse::TYPE_ID => {
            to_json::<HdStoreExtendedPublicKeyResponse>(bytes)
        }
        t if t == KeystoreCommonExistsResult::TYPE_ID => to_json::<KeystoreCommonExistsResult>(bytes),
        t if t == BtcForkSignedTxOutput::TYPE_ID => to_json::<BtcForkSignedTxOutput>(bytes),
        t if t == TronTxOutput::TYPE_ID => to_json::<TronTxOutput>(bytes),
        other => Err(ProtoError::TypeMismatch {
            expected: "registered result".to_string(),
            found: other.to_string(),
        }),
    }
}
