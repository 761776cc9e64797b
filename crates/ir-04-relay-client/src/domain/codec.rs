//! # Receipt / Callback Codec
//!
//! Pure conversions between ledger records and IBTPs.
//!
//! | Function           | Input                         | Output IBTP type            |
//! |--------------------|-------------------------------|-----------------------------|
//! | `event_to_ibtp`    | outbound `Event`              | `Interchain`                |
//! | `generate_receipt` | result of an inbound call     | the receipt tag given       |
//! | `generate_callback`| original request + result     | `ReceiptSuccess` / `Failure`|
//!
//! Every payload carries a keccak256 hash over its concatenated arguments.

use shared_types::{
    keccak256_concat, Content, Event, Ibtp, IbtpType, InvokeResult, Payload, ProtocolError,
    ResultRes,
};

/// Request IBTP for an event read from the broker.
pub fn event_to_ibtp(
    event: &Event,
    timeout_height: i64,
    timestamp: i64,
    proof: Vec<u8>,
) -> Result<Ibtp, ProtocolError> {
    let content = event.to_content();
    let payload = Payload {
        encrypted: event.encrypt,
        hash: keccak256_concat(&content.args).to_vec(),
        content: content.encode()?,
    };
    Ok(Ibtp {
        from: event.src_full_id.clone(),
        to: event.dst_full_id.clone(),
        index: event.index,
        typ: IbtpType::Interchain,
        timestamp,
        timeout_height,
        proof,
        payload: payload.encode()?,
        extra: Vec::new(),
    })
}

/// Receipt IBTP for the outcome of an inbound call.
///
/// The single result is successful only for `ReceiptSuccess`.
pub fn generate_receipt(
    from: &str,
    to: &str,
    index: u64,
    result_args: Vec<Vec<u8>>,
    proof: Vec<u8>,
    typ: IbtpType,
    encrypt: bool,
) -> Result<Ibtp, ProtocolError> {
    let hash = keccak256_concat(&result_args).to_vec();
    let result = InvokeResult {
        data: vec![ResultRes { data: result_args }],
        multi_status: vec![typ == IbtpType::ReceiptSuccess],
    };
    let payload = Payload {
        encrypted: encrypt,
        content: result.encode()?,
        hash,
    };
    Ok(Ibtp {
        from: from.to_string(),
        to: to.to_string(),
        index,
        typ,
        timestamp: 0,
        timeout_height: 0,
        proof,
        payload: payload.encode()?,
        extra: Vec::new(),
    })
}

/// Response IBTP that asks the source to run its callback or rollback.
///
/// On success the callback receives its stored argument prefix followed by
/// `result_args`; on failure the rollback receives its stored arguments.
pub fn generate_callback(
    original: &Ibtp,
    result_args: Vec<Vec<u8>>,
    proof: Vec<u8>,
    success: bool,
) -> Result<Ibtp, ProtocolError> {
    let payload = original.decode_payload()?;
    let content = Content::decode(&payload.content)?;

    let (func, args, typ) = if success {
        let mut args = content.args_cb;
        args.extend(result_args);
        (content.callback, args, IbtpType::ReceiptSuccess)
    } else {
        (content.rollback, content.args_rb, IbtpType::ReceiptFailure)
    };
    let response = Content {
        src_contract_id: content.dst_contract_id,
        dst_contract_id: content.src_contract_id,
        func,
        args,
        ..Default::default()
    };
    let payload = Payload {
        encrypted: payload.encrypted,
        hash: keccak256_concat(&response.args).to_vec(),
        content: response.encode()?,
    };
    Ok(Ibtp {
        from: original.from.clone(),
        to: original.to.clone(),
        index: original.index,
        typ,
        timestamp: 0,
        timeout_height: original.timeout_height,
        proof,
        payload: payload.encode()?,
        extra: Vec::new(),
    })
}

/// Call descriptor of a request or callback IBTP.
pub fn request_content(ibtp: &Ibtp) -> Result<Content, ProtocolError> {
    Content::decode(&ibtp.decode_payload()?.content)
}

/// Result carried by a receipt IBTP.
pub fn receipt_result(ibtp: &Ibtp) -> Result<InvokeResult, ProtocolError> {
    InvokeResult::decode(&ibtp.decode_payload()?.content)
}
