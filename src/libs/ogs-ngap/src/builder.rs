//! NGAP Message Builders
//!
//! Functions for building NGAP PDU messages from high-level types.
//! Each function fills the IE container, wraps it in the InitiatingMessage
//! PDU wrapper and APER-encodes it to bytes.

use bytes::Bytes;
use ogs_per::{AperEncode, AperEncoder};

use crate::error::NgapResult;
use crate::ie::{self, ProtocolIeContainer};
use crate::types::*;

/// Encode the container as the message value, then the PDU around it
fn encode_initiating_message(
    procedure_code: ProcedureCode,
    criticality: Criticality,
    container: &ProtocolIeContainer,
) -> NgapResult<Bytes> {
    let mut encoder = AperEncoder::new();
    container.encode_aper(&mut encoder)?;

    let pdu = NgapPdu {
        message: TriggeringMessage::InitiatingMessage,
        procedure_code,
        criticality,
        value: encoder.into_bytes(),
    };

    let mut encoder = AperEncoder::new();
    pdu.encode_aper(&mut encoder)?;
    Ok(encoder.into_bytes())
}

// ============================================================================
// NG Setup Procedure
// ============================================================================

/// Build an NG Setup Request PDU
pub fn build_ng_setup_request(msg: &NgSetupRequest) -> NgapResult<Bytes> {
    let mut container = ProtocolIeContainer::new();

    // IE: GlobalRANNodeID (mandatory)
    ie::encode_global_ran_node_id(&mut container, &msg.global_ran_node_id)?;

    // IE: RANNodeName (optional)
    if let Some(ref name) = msg.ran_node_name {
        ie::encode_ran_node_name(&mut container, name)?;
    }

    // IE: SupportedTAList (mandatory)
    ie::encode_supported_ta_list(&mut container, &msg.supported_ta_list)?;

    // IE: DefaultPagingDRX (mandatory)
    ie::encode_default_paging_drx(&mut container, msg.default_paging_drx)?;

    let bytes = encode_initiating_message(ProcedureCode::NG_SETUP, Criticality::Reject, &container)?;
    log::debug!(
        "NG Setup Request: {} IEs, {} bytes",
        container.len(),
        bytes.len()
    );
    Ok(bytes)
}
