//! NGAP Information Element encoding
//!
//! APER encodings of the IE value types and of the ProtocolIE-Container
//! that carries them. IE values travel as open types, so each value is
//! encoded into its own buffer before it is added to the container.

use bytes::Bytes;
use ogs_per::{AperEncode, AperEncoder, Constraint, PerResult, SizeConstraint};

use crate::error::NgapResult;
use crate::types::*;

/// maxProtocolIEs
pub const MAX_PROTOCOL_IES: i64 = 65535;
/// maxnoofTACs
pub const MAX_NO_OF_TACS: i64 = 256;
/// maxnoofBPLMNs
pub const MAX_NO_OF_BPLMNS: i64 = 12;
/// maxnoofSliceItems
pub const MAX_NO_OF_SLICE_ITEMS: i64 = 1024;

const PROTOCOL_IE_CONTAINER: Constraint = Constraint::new(0, MAX_PROTOCOL_IES);
const SUPPORTED_TA_LIST: Constraint = Constraint::new(1, MAX_NO_OF_TACS);
const BROADCAST_PLMN_LIST: Constraint = Constraint::new(1, MAX_NO_OF_BPLMNS);
const SLICE_SUPPORT_LIST: Constraint = Constraint::new(1, MAX_NO_OF_SLICE_ITEMS);

/// GlobalRANNodeID ::= CHOICE { globalGNB-ID, globalNgENB-ID, globalN3IWF-ID, choice-Extensions }
const GLOBAL_RAN_NODE_ID: Constraint = Constraint::new(0, 2);
const GLOBAL_GNB_ID_CHOICE: i64 = 0;

/// RANNodeName ::= PrintableString (SIZE(1..150, ...))
const RAN_NODE_NAME_SIZE: SizeConstraint = SizeConstraint::range(1, 150).with_extension();

/// Encode a SEQUENCE OF: element count, then the elements in order
fn encode_list<T: AperEncode>(
    encoder: &mut AperEncoder,
    items: &[T],
    constraint: &Constraint,
) -> PerResult<()> {
    encoder.encode_sequence_of(items.len(), constraint)?;
    for item in items {
        item.encode_aper(encoder)?;
    }
    Ok(())
}

// ============================================================================
// IE value types
// ============================================================================

/// S-NSSAI ::= SEQUENCE { sST, sD OPTIONAL, iE-Extensions OPTIONAL, ... }
impl AperEncode for SNssai {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let presence = if self.sd.is_some() { 0x02 } else { 0x00 };
        encoder.encode_sequence_preamble(true, 2, presence)?;
        encoder.encode_octet_string(&[self.sst], &Self::SST_SIZE)?;
        if let Some(sd) = self.sd {
            encoder.encode_octet_string(&sd, &Self::SD_SIZE)?;
        }
        Ok(())
    }
}

/// SliceSupportItem ::= SEQUENCE { s-NSSAI, iE-Extensions OPTIONAL, ... }
struct SliceSupportItem<'a>(&'a SNssai);

impl AperEncode for SliceSupportItem<'_> {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_sequence_preamble(true, 1, 0)?;
        self.0.encode_aper(encoder)
    }
}

impl AperEncode for GnbId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_choice_index(0, &Self::CHOICE)?;
        encoder.encode_bit_string(
            &self.value.to_be_bytes(),
            usize::from(self.bit_len),
            &Self::SIZE,
        )
    }
}

/// GlobalGNB-ID ::= SEQUENCE { pLMNIdentity, gNB-ID, iE-Extensions OPTIONAL, ... }
impl AperEncode for GlobalGnbId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_sequence_preamble(true, 1, 0)?;
        self.plmn_identity.encode_aper(encoder)?;
        self.gnb_id.encode_aper(encoder)
    }
}

/// BroadcastPLMNItem ::= SEQUENCE { pLMNIdentity, tAISliceSupportList, iE-Extensions OPTIONAL, ... }
impl AperEncode for BroadcastPlmnItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_sequence_preamble(true, 1, 0)?;
        self.plmn_identity.encode_aper(encoder)?;
        let slices: Vec<SliceSupportItem<'_>> =
            self.slice_support_list.iter().map(SliceSupportItem).collect();
        encode_list(encoder, &slices, &SLICE_SUPPORT_LIST)
    }
}

/// SupportedTAItem ::= SEQUENCE { tAC, broadcastPLMNList, iE-Extensions OPTIONAL, ... }
impl AperEncode for SupportedTaItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_sequence_preamble(true, 1, 0)?;
        self.tac.encode_aper(encoder)?;
        encode_list(encoder, &self.broadcast_plmn_list, &BROADCAST_PLMN_LIST)
    }
}

struct GlobalRanNodeId<'a>(&'a GlobalGnbId);

impl AperEncode for GlobalRanNodeId<'_> {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_choice_index(GLOBAL_GNB_ID_CHOICE, &GLOBAL_RAN_NODE_ID)?;
        self.0.encode_aper(encoder)
    }
}

struct SupportedTaList<'a>(&'a [SupportedTaItem]);

impl AperEncode for SupportedTaList<'_> {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_list(encoder, self.0, &SUPPORTED_TA_LIST)
    }
}

struct RanNodeName<'a>(&'a str);

impl AperEncode for RanNodeName<'_> {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_octet_string(self.0.as_bytes(), &RAN_NODE_NAME_SIZE)
    }
}

// ============================================================================
// ProtocolIE-Container
// ============================================================================

/// ProtocolIE-Field ::= SEQUENCE { id, criticality, value }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolIeField {
    pub id: ProtocolIeId,
    pub criticality: Criticality,
    /// APER encoding of the IE value
    pub value: Bytes,
}

impl AperEncode for ProtocolIeField {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        self.id.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;
        encoder.push_open_type(&self.value)
    }
}

/// Message value holding a ProtocolIE-Container:
/// SEQUENCE { protocolIEs ProtocolIE-Container, ... }
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolIeContainer {
    pub ies: Vec<ProtocolIeField>,
}

impl ProtocolIeContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ProtocolIeId, criticality: Criticality, value: Bytes) {
        self.ies.push(ProtocolIeField {
            id,
            criticality,
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.ies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ies.is_empty()
    }
}

impl AperEncode for ProtocolIeContainer {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_sequence_preamble(true, 0, 0)?;
        encode_list(encoder, &self.ies, &PROTOCOL_IE_CONTAINER)
    }
}

/// Encode an IE value into its own octet-aligned buffer
fn encode_ie_value<T: AperEncode + ?Sized>(value: &T) -> NgapResult<Bytes> {
    let mut encoder = AperEncoder::new();
    value.encode_aper(&mut encoder)?;
    Ok(encoder.into_bytes())
}

// ============================================================================
// NG Setup Request IEs
// ============================================================================

/// IE: GlobalRANNodeID (mandatory, reject)
pub fn encode_global_ran_node_id(
    container: &mut ProtocolIeContainer,
    global_gnb_id: &GlobalGnbId,
) -> NgapResult<()> {
    let value = encode_ie_value(&GlobalRanNodeId(global_gnb_id))?;
    container.push(ProtocolIeId::GLOBAL_RAN_NODE_ID, Criticality::Reject, value);
    Ok(())
}

/// IE: RANNodeName (optional, ignore)
pub fn encode_ran_node_name(container: &mut ProtocolIeContainer, name: &str) -> NgapResult<()> {
    let value = encode_ie_value(&RanNodeName(name))?;
    container.push(ProtocolIeId::RAN_NODE_NAME, Criticality::Ignore, value);
    Ok(())
}

/// IE: SupportedTAList (mandatory, reject)
pub fn encode_supported_ta_list(
    container: &mut ProtocolIeContainer,
    items: &[SupportedTaItem],
) -> NgapResult<()> {
    let value = encode_ie_value(&SupportedTaList(items))?;
    container.push(ProtocolIeId::SUPPORTED_TA_LIST, Criticality::Reject, value);
    Ok(())
}

/// IE: DefaultPagingDRX (mandatory, ignore)
pub fn encode_default_paging_drx(
    container: &mut ProtocolIeContainer,
    drx: PagingDrx,
) -> NgapResult<()> {
    let value = encode_ie_value(&drx)?;
    container.push(ProtocolIeId::DEFAULT_PAGING_DRX, Criticality::Ignore, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plmn() -> PlmnIdentity {
        PlmnIdentity::new(123, 45).unwrap()
    }

    fn supported_ta_item() -> SupportedTaItem {
        SupportedTaItem {
            tac: Tac([0x00, 0x01, 0x02]),
            broadcast_plmn_list: vec![BroadcastPlmnItem {
                plmn_identity: plmn(),
                slice_support_list: vec![SNssai {
                    sst: 1,
                    sd: Some([0x00, 0x00, 0x7B]),
                }],
            }],
        }
    }

    #[test]
    fn test_encode_s_nssai() {
        let snssai = SNssai {
            sst: 1,
            sd: Some([0x00, 0x00, 0x7B]),
        };
        assert_eq!(
            &encode_ie_value(&snssai).unwrap()[..],
            &[0x40, 0x20, 0x00, 0x00, 0x7B]
        );

        let snssai = SNssai { sst: 1, sd: None };
        assert_eq!(&encode_ie_value(&snssai).unwrap()[..], &[0x00, 0x20]);
    }

    #[test]
    fn test_encode_gnb_id() {
        let gnb_id = GnbId::new(1, 22).unwrap();
        // 00 | 0000 | 22-bit value
        assert_eq!(
            &encode_ie_value(&gnb_id).unwrap()[..],
            &[0x00, 0x00, 0x00, 0x10]
        );

        let gnb_id = GnbId::new(0xFFFF_FFFF, 32).unwrap();
        assert_eq!(
            &encode_ie_value(&gnb_id).unwrap()[..],
            &[0x2B, 0xFF, 0xFF, 0xFF, 0xFC]
        );
    }

    #[test]
    fn test_encode_global_ran_node_id() {
        let global_gnb_id = GlobalGnbId {
            plmn_identity: plmn(),
            gnb_id: GnbId::new(1, 22).unwrap(),
        };
        let mut container = ProtocolIeContainer::new();
        encode_global_ran_node_id(&mut container, &global_gnb_id).unwrap();

        let ie = &container.ies[0];
        assert_eq!(ie.id, ProtocolIeId::GLOBAL_RAN_NODE_ID);
        assert_eq!(ie.criticality, Criticality::Reject);
        assert_eq!(
            &ie.value[..],
            &[0x00, 0x21, 0xF3, 0x54, 0x00, 0x00, 0x00, 0x10]
        );
    }

    #[test]
    fn test_encode_supported_ta_list() {
        let mut container = ProtocolIeContainer::new();
        encode_supported_ta_list(&mut container, &[supported_ta_item()]).unwrap();

        let ie = &container.ies[0];
        assert_eq!(ie.id, ProtocolIeId::SUPPORTED_TA_LIST);
        assert_eq!(
            &ie.value[..],
            &[
                0x00, // TA count
                0x00, 0x00, 0x01, 0x02, // preamble, TAC
                0x00, 0x21, 0xF3, 0x54, // PLMN count, preamble, PLMN
                0x00, 0x00, // slice count
                0x10, 0x08, 0x00, 0x00, 0x7B, // preambles and SST, SD
            ]
        );
    }

    #[test]
    fn test_encode_empty_lists() {
        let mut container = ProtocolIeContainer::new();
        assert!(encode_supported_ta_list(&mut container, &[]).is_err());

        let mut item = supported_ta_item();
        item.broadcast_plmn_list[0].slice_support_list.clear();
        assert!(encode_supported_ta_list(&mut container, &[item]).is_err());
        assert!(container.is_empty());
    }

    #[test]
    fn test_encode_default_paging_drx() {
        let mut container = ProtocolIeContainer::new();
        encode_default_paging_drx(&mut container, PagingDrx::V128).unwrap();
        let ie = &container.ies[0];
        assert_eq!(ie.id, ProtocolIeId::DEFAULT_PAGING_DRX);
        assert_eq!(ie.criticality, Criticality::Ignore);
        assert_eq!(&ie.value[..], &[0x20]);
    }

    #[test]
    fn test_encode_ran_node_name() {
        let mut container = ProtocolIeContainer::new();
        encode_ran_node_name(&mut container, "gnb").unwrap();
        // extension octet, length offset from 1, characters
        assert_eq!(&container.ies[0].value[..], &[0x00, 0x02, b'g', b'n', b'b']);

        assert!(encode_ran_node_name(&mut container, "").is_err());
    }

    #[test]
    fn test_encode_container() {
        let mut container = ProtocolIeContainer::new();
        encode_default_paging_drx(&mut container, PagingDrx::V32).unwrap();
        assert_eq!(container.len(), 1);

        let mut encoder = AperEncoder::new();
        container.encode_aper(&mut encoder).unwrap();
        // preamble + count | id 21 | ignore | length | value
        assert_eq!(
            &encoder.into_bytes()[..],
            &[0x00, 0x00, 0x01, 0x00, 0x15, 0x40, 0x01, 0x00]
        );
    }
}
