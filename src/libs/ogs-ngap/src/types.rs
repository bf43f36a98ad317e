//! NGAP Types
//!
//! Common data types and the NG Setup message types of 3GPP TS 38.413,
//! together with the constraints their APER encodings use.

use bytes::Bytes;
use ogs_per::{AperEncode, AperEncoder, Constraint, PerResult, SizeConstraint};
use serde::{Deserialize, Serialize};

use crate::error::{NgapError, NgapResult};

// ============================================================================
// Common data types
// ============================================================================

/// Criticality - indicates how to handle unrecognized IEs
/// ASN.1: Criticality ::= ENUMERATED { reject, ignore, notify }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Criticality {
    Reject = 0,
    Ignore = 1,
    Notify = 2,
}

impl Criticality {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 2);
}

impl AperEncode for Criticality {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

/// NGAP-PDU alternative carrying the procedure
/// ASN.1: NGAP-PDU ::= CHOICE { initiatingMessage, successfulOutcome, unsuccessfulOutcome, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TriggeringMessage {
    InitiatingMessage = 0,
    SuccessfulOutcome = 1,
    UnsuccessfulOutcome = 2,
}

impl TriggeringMessage {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 2);
}

/// ProcedureCode - identifies the NGAP procedure
/// ASN.1: ProcedureCode ::= INTEGER (0..255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcedureCode(pub u8);

impl ProcedureCode {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 255);

    pub const INITIAL_UE_MESSAGE: Self = Self(15);
    pub const NG_SETUP: Self = Self(21);
}

impl AperEncode for ProcedureCode {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_integer(i64::from(self.0), &Self::CONSTRAINT)
    }
}

/// ProtocolIE-ID - identifies the Information Element
/// ASN.1: ProtocolIE-ID ::= INTEGER (0..65535)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolIeId(pub u16);

impl ProtocolIeId {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 65535);

    pub const DEFAULT_PAGING_DRX: Self = Self(21);
    pub const GLOBAL_RAN_NODE_ID: Self = Self(27);
    pub const RAN_NODE_NAME: Self = Self(82);
    pub const SUPPORTED_TA_LIST: Self = Self(102);
}

impl AperEncode for ProtocolIeId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_integer(i64::from(self.0), &Self::CONSTRAINT)
    }
}

/// PagingDRX (TS 38.413 Section 9.3.1.90)
/// ASN.1: PagingDRX ::= ENUMERATED { v32, v64, v128, v256, ... }
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PagingDrx {
    V32 = 0,
    V64 = 1,
    #[default]
    V128 = 2,
    V256 = 3,
}

impl PagingDrx {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 3);
}

impl AperEncode for PagingDrx {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

// ============================================================================
// Identities (Section 9.3.3)
// ============================================================================

/// PLMN Identity (TS 38.413 Section 9.3.3.5)
/// ASN.1: PLMNIdentity ::= OCTET STRING (SIZE(3))
///
/// TBCD digits: MCC digit 2 | MCC digit 1, MNC digit 3 (or filler) | MCC
/// digit 3, MNC digit 2 | MNC digit 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlmnIdentity(pub [u8; 3]);

impl PlmnIdentity {
    pub const SIZE: SizeConstraint = SizeConstraint::fixed(3);

    const FILLER: u8 = 0x0F;

    /// Build from MCC and MNC; an MNC above 99 is taken as three digits
    pub fn new(mcc: u16, mnc: u16) -> NgapResult<Self> {
        let mnc_len = if mnc > 99 { 3 } else { 2 };
        Self::from_mcc_mnc(mcc, mnc, mnc_len)
    }

    /// Build from MCC and MNC with an explicit MNC length, so that
    /// three-digit MNCs with a leading zero keep it
    pub fn from_mcc_mnc(mcc: u16, mnc: u16, mnc_len: u8) -> NgapResult<Self> {
        if mcc > 999 {
            return Err(NgapError::InvalidIeValue {
                ie_name: "PLMNIdentity",
                reason: format!("MCC {} has more than 3 digits", mcc),
            });
        }
        let mnc_max = match mnc_len {
            2 => 99,
            3 => 999,
            _ => {
                return Err(NgapError::InvalidIeValue {
                    ie_name: "PLMNIdentity",
                    reason: format!("MNC length {} is not 2 or 3", mnc_len),
                })
            }
        };
        if mnc > mnc_max {
            return Err(NgapError::InvalidIeValue {
                ie_name: "PLMNIdentity",
                reason: format!("MNC {} has more than {} digits", mnc, mnc_len),
            });
        }

        let digit = |value: u16, weight: u16| ((value / weight) % 10) as u8;
        let (mnc1, mnc2, mnc3) = if mnc_len == 2 {
            (digit(mnc, 10), digit(mnc, 1), Self::FILLER)
        } else {
            (digit(mnc, 100), digit(mnc, 10), digit(mnc, 1))
        };

        Ok(Self([
            (digit(mcc, 10) << 4) | digit(mcc, 100),
            (mnc3 << 4) | digit(mcc, 1),
            (mnc2 << 4) | mnc1,
        ]))
    }
}

impl AperEncode for PlmnIdentity {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_octet_string(&self.0, &Self::SIZE)
    }
}

/// Tracking Area Code (TS 38.413 Section 9.3.3.10)
/// ASN.1: TAC ::= OCTET STRING (SIZE(3))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tac(pub [u8; 3]);

impl Tac {
    pub const SIZE: SizeConstraint = SizeConstraint::fixed(3);

    pub fn new(tac: u32) -> NgapResult<Self> {
        if tac > 0x00FF_FFFF {
            return Err(NgapError::InvalidIeValue {
                ie_name: "TAC",
                reason: format!("{:#x} does not fit 24 bits", tac),
            });
        }
        let [_, high, mid, low] = tac.to_be_bytes();
        Ok(Self([high, mid, low]))
    }
}

impl AperEncode for Tac {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_octet_string(&self.0, &Self::SIZE)
    }
}

/// S-NSSAI (TS 38.413 Section 9.3.1.24)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SNssai {
    /// Slice/Service Type
    pub sst: u8,
    /// Slice Differentiator (optional, 24 bits)
    pub sd: Option<[u8; 3]>,
}

impl SNssai {
    pub const SST_SIZE: SizeConstraint = SizeConstraint::fixed(1);
    pub const SD_SIZE: SizeConstraint = SizeConstraint::fixed(3);
}

/// gNB ID (TS 38.413 Section 9.3.1.6)
/// ASN.1: GNB-ID ::= CHOICE { gNB-ID BIT STRING (SIZE(22..32)), choice-Extensions }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GnbId {
    pub value: u32,
    /// Length in bits, 22..=32
    pub bit_len: u8,
}

impl GnbId {
    pub const CHOICE: Constraint = Constraint::new(0, 1);
    pub const SIZE: SizeConstraint = SizeConstraint::range(22, 32);

    pub fn new(value: u32, bit_len: u8) -> NgapResult<Self> {
        if !(22..=32).contains(&bit_len) {
            return Err(NgapError::InvalidIeValue {
                ie_name: "GNB-ID",
                reason: format!("length {} not in 22..=32 bits", bit_len),
            });
        }
        if bit_len < 32 && value >> bit_len != 0 {
            return Err(NgapError::InvalidIeValue {
                ie_name: "GNB-ID",
                reason: format!("{:#x} does not fit {} bits", value, bit_len),
            });
        }
        Ok(Self { value, bit_len })
    }
}

/// Global gNB ID (TS 38.413 Section 9.3.1.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalGnbId {
    pub plmn_identity: PlmnIdentity,
    pub gnb_id: GnbId,
}

// ============================================================================
// Supported TA List (Section 9.3.3.x)
// ============================================================================

/// Broadcast PLMN Item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastPlmnItem {
    pub plmn_identity: PlmnIdentity,
    /// TAI Slice Support List
    pub slice_support_list: Vec<SNssai>,
}

/// Supported TA Item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedTaItem {
    pub tac: Tac,
    pub broadcast_plmn_list: Vec<BroadcastPlmnItem>,
}

// ============================================================================
// NG Setup (Section 9.2.6)
// ============================================================================

/// NG Setup Request - sent by gNB to AMF (TS 38.413 Section 9.2.6.1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgSetupRequest {
    /// Global RAN Node ID - only the gNB alternative is built
    pub global_ran_node_id: GlobalGnbId,
    /// RAN Node Name (optional)
    pub ran_node_name: Option<String>,
    /// Supported TA List - TAIs supported by the gNB
    pub supported_ta_list: Vec<SupportedTaItem>,
    /// Default Paging DRX
    pub default_paging_drx: PagingDrx,
}

// ============================================================================
// PDU
// ============================================================================

/// Encoded NGAP PDU ready for APER wrapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgapPdu {
    pub message: TriggeringMessage,
    pub procedure_code: ProcedureCode,
    pub criticality: Criticality,
    /// APER encoding of the procedure's message value
    pub value: Bytes,
}

impl AperEncode for NgapPdu {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_choice_index(self.message as i64, &TriggeringMessage::CONSTRAINT)?;
        self.procedure_code.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;
        encoder.push_open_type(&self.value)
    }
}
