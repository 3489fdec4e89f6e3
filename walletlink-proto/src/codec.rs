//! Building request envelopes and reading typed results.

use prost::Message;

use crate::action::{Action, TypedAny, TypedMessage};
use crate::error::{ProtoError, Result};
use crate::registry::{Method, MethodSpec};
use crate::transport;

/// Encode a request for `M`, validating the parameter first
pub fn encode_request<M: MethodSpec>(param: &M::Param) -> Result<Vec<u8>> {
    param.validate()?;
    Ok(Action {
        method: M::METHOD.name().to_string(),
        param: Some(TypedAny::pack(param)),
    }
    .encode_to_vec())
}

/// Encode a request when the method is only known at runtime
pub fn encode_dynamic<P: TypedMessage>(method: Method, param: &P) -> Result<Vec<u8>> {
    if method.param_type_id() != P::TYPE_ID {
        return Err(ProtoError::TypeMismatch {
            expected: method.param_type_id().to_string(),
            found: P::TYPE_ID.to_string(),
        });
    }
    param.validate()?;
    Ok(Action {
        method: method.name().to_string(),
        param: Some(TypedAny::pack(param)),
    }
    .encode_to_vec())
}

/// Decode the result bytes of `M`
pub fn decode_result<M: MethodSpec>(bytes: &[u8]) -> Result<M::Output> {
    Ok(M::Output::decode(bytes)?)
}

/// Hex form of [`encode_request`]
pub fn encode_request_text<M: MethodSpec>(param: &M::Param) -> Result<String> {
    encode_request::<M>(param).map(|bytes| transport::to_text(&bytes))
}

/// Decode hex result text of `M`
pub fn decode_result_text<M: MethodSpec>(text: &str) -> Result<M::Output> {
    decode_result::<M>(&transport::from_text(text)?)
}

/// Engine-side view of an envelope.
///
/// The method name is resolved before the parameter is looked at, so an
/// unknown method is reported as such whatever the payload holds.
pub fn decode_action(bytes: &[u8]) -> Result<(Method, TypedAny)> {
    let action = Action::decode(bytes)?;
    let method: Method = action.method.parse()?;
    let param = action
        .param
        .ok_or_else(|| ProtoError::MissingParam(method.name().to_string()))?;
    if param.type_name() != method.param_type_id() {
        return Err(ProtoError::TypeMismatch {
            expected: method.param_type_id().to_string(),
            found: param.type_url,
        });
    }
    Ok((method, param))
}
