//! # Relay Client - Submission
//!
//! Inbound IBTPs and receipts delivered by the relay hub.
//!
//! | IBTP                                  | Broker call          | Result attached        |
//! |---------------------------------------|----------------------|------------------------|
//! | request with a function               | `invokeInterchain`   | stored receipt         |
//! | request without a function            | `invokeIndexUpdate`  | none                   |
//! | rollback / rollback-end               | `invokeIndexUpdate`  | synthesized rollback-end |
//! | other response with a function        | `invokeInterchain`   | none                   |

use super::*;
use crate::domain::{
    generate_receipt, InboundIbtp, InboundReceipt, IndexCategory, InterchainCall, ReceiptCall,
};
use crate::ports::{RelayQueryApi, RelaySubmitApi};
use async_trait::async_trait;
use shared_types::{IbtpCategory, IbtpType, ServicePair, SubmitIbtpResponse};
use tracing::warn;

/// Transport failures become a failed response; a shutdown stays an error.
fn failed(context: String, err: ClientError) -> Result<SubmitIbtpResponse, ClientError> {
    if err == ClientError::Cancelled {
        return Err(err);
    }
    Ok(SubmitIbtpResponse {
        status: false,
        message: format!("{}: {}", context, err),
        result: None,
    })
}

fn accepted(response: &BrokerResponse) -> SubmitIbtpResponse {
    SubmitIbtpResponse {
        status: response.ok,
        message: response.message.clone(),
        result: None,
    }
}

impl RelayClient {
    async fn submit_index_update(
        &self,
        ibtp: &InboundIbtp,
        dst_full_id: &str,
    ) -> Result<SubmitIbtpResponse, ClientError> {
        let rollback = ibtp.typ.is_rollback();
        let category = if rollback {
            IndexCategory::DstRollback
        } else {
            IndexCategory::Inner
        };
        let mut ret = match self
            .invoke_index_update(&ibtp.from, dst_full_id, ibtp.index, category)
            .await
        {
            Ok((_, response)) => accepted(&response),
            Err(e) => return failed(format!("invoke index update for ibtp {}", ibtp.index), e),
        };
        if rollback && ret.status {
            ret.result = Some(generate_receipt(
                &ibtp.from,
                dst_full_id,
                ibtp.index,
                Vec::new(),
                Vec::new(),
                IbtpType::ReceiptRollbackEnd,
                ibtp.encrypted,
            )?);
        }
        Ok(ret)
    }
}

#[async_trait]
impl RelaySubmitApi for RelayClient {
    async fn submit_ibtp(&self, ibtp: InboundIbtp) -> Result<SubmitIbtpResponse, ClientError> {
        let chain_ids = match self.get_chain_id().await {
            Ok(ids) => ids,
            Err(e) => return failed("get id err".to_string(), e),
        };
        let mut dst_full_id = chain_ids.full_service_id(&ibtp.service_id);
        let named = &ibtp.content.dst_contract_id;
        if !named.is_empty() && *named != dst_full_id {
            // The broker was re-initialized under new chain IDs.
            match self.refresh_chain_id().await {
                Ok(ids) => dst_full_id = ids.full_service_id(&ibtp.service_id),
                Err(e) => return failed("get id err".to_string(), e),
            }
        }

        if ibtp.content.func.is_empty() || ibtp.typ.is_rollback() {
            return self.submit_index_update(&ibtp, &dst_full_id).await;
        }

        let call = InterchainCall::from_ibtp(&ibtp);
        let mut ret = match self.invoke_interchain(&call).await {
            Ok((_, response)) => accepted(&response),
            Err(e) => {
                return failed(
                    format!("invoke interchain for ibtp to call {}", ibtp.content.func),
                    e,
                )
            }
        };

        if ibtp.typ.category() == IbtpCategory::Request && ret.status {
            let pair = ServicePair::new(ibtp.from.clone(), dst_full_id).key();
            match self.get_receipt_message(&pair, ibtp.index).await {
                Ok(receipt) => ret.result = Some(receipt),
                Err(e) => warn!("[ir-04] No receipt for {} #{}: {}", pair, ibtp.index, e),
            }
        }
        Ok(ret)
    }

    async fn submit_ibtp_batch(
        &self,
        ibtps: Vec<InboundIbtp>,
    ) -> Result<SubmitIbtpResponse, ClientError> {
        let calls: Vec<InterchainCall> = ibtps.iter().map(InterchainCall::from_ibtp).collect();
        match self.invoke_interchains(&calls).await {
            Ok((_, response)) => Ok(accepted(&response)),
            Err(e) => failed("invoke interchains failed".to_string(), e),
        }
    }

    async fn submit_receipt(
        &self,
        receipt: InboundReceipt,
    ) -> Result<SubmitIbtpResponse, ClientError> {
        if receipt.result.multi_status.len() > 1 {
            return Err(ClientError::MultiIbtpUnsupported);
        }
        let result = receipt
            .result
            .data
            .into_iter()
            .next()
            .map(|res| res.data)
            .unwrap_or_default();
        let call = ReceiptCall {
            src_addr: receipt.service_id,
            dst_full_id: receipt.to,
            index: receipt.index,
            typ: receipt.typ,
            result,
            tx_status: receipt.proof.tx_status,
            multi_sign: receipt.proof.multi_sign,
        };
        match self.invoke_receipt(&call).await {
            Ok((_, response)) => Ok(accepted(&response)),
            Err(e) => failed("invoke receipt for ibtp to call".to_string(), e),
        }
    }

    async fn invoke_interchain(
        &self,
        call: &InterchainCall,
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError> {
        self.invoke_structured("invokeInterchain", call.to_args()).await
    }

    async fn invoke_interchains(
        &self,
        calls: &[InterchainCall],
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError> {
        let args = InterchainCall::to_batch_args(calls)?;
        self.invoke_structured("invokeInterchains", args).await
    }

    async fn invoke_receipt(
        &self,
        call: &ReceiptCall,
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError> {
        self.invoke_structured("invokeReceipt", call.to_args()).await
    }

    async fn invoke_index_update(
        &self,
        from: &str,
        to: &str,
        index: u64,
        category: IndexCategory,
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError> {
        let args = vec![
            from.as_bytes().to_vec(),
            to.as_bytes().to_vec(),
            index.to_string().into_bytes(),
            category.code().to_string().into_bytes(),
        ];
        self.invoke_structured("invokeIndexUpdate", args).await
    }
}
