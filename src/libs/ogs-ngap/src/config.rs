//! gNB Configuration
//!
//! YAML description of the gNB from which the NG Setup Request is built:
//!
//! ```yaml
//! gnb:
//!   name: gnb-01
//!   plmn_id: { mcc: 999, mnc: 70 }
//!   gnb_id: { value: 1, length: 22 }
//!   supported_ta:
//!     - tac: 1
//!       broadcast_plmn:
//!         - plmn_id: { mcc: 999, mnc: 70 }
//!           s_nssai:
//!             - { sst: 1, sd: 1 }
//!   paging_drx: v128
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NgapError, NgapResult};
use crate::types::*;

/// Default gNB ID length in bits
pub const DEFAULT_GNB_ID_LENGTH: u8 = 22;

/// Top-level configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub gnb: GnbConfig,
}

/// gNB section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GnbConfig {
    /// RAN Node Name
    #[serde(default)]
    pub name: Option<String>,
    pub plmn_id: PlmnIdConfig,
    pub gnb_id: GnbIdConfig,
    pub supported_ta: Vec<SupportedTaConfig>,
    #[serde(default)]
    pub paging_drx: PagingDrx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlmnIdConfig {
    pub mcc: u16,
    pub mnc: u16,
    /// Number of MNC digits; derived from `mnc` when absent
    #[serde(default)]
    pub mnc_len: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GnbIdConfig {
    pub value: u32,
    #[serde(default = "default_gnb_id_length")]
    pub length: u8,
}

fn default_gnb_id_length() -> u8 {
    DEFAULT_GNB_ID_LENGTH
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedTaConfig {
    pub tac: u32,
    pub broadcast_plmn: Vec<BroadcastPlmnConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastPlmnConfig {
    pub plmn_id: PlmnIdConfig,
    pub s_nssai: Vec<SNssaiConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SNssaiConfig {
    pub sst: u8,
    #[serde(default)]
    pub sd: Option<u32>,
}

impl PlmnIdConfig {
    pub fn to_plmn_identity(&self) -> NgapResult<PlmnIdentity> {
        match self.mnc_len {
            Some(mnc_len) => PlmnIdentity::from_mcc_mnc(self.mcc, self.mnc, mnc_len),
            None => PlmnIdentity::new(self.mcc, self.mnc),
        }
    }
}

impl SNssaiConfig {
    pub fn to_s_nssai(&self) -> NgapResult<SNssai> {
        let sd = match self.sd {
            Some(sd) if sd > 0x00FF_FFFF => {
                return Err(NgapError::InvalidIeValue {
                    ie_name: "SD",
                    reason: format!("{:#x} does not fit 24 bits", sd),
                })
            }
            Some(sd) => {
                let [_, high, mid, low] = sd.to_be_bytes();
                Some([high, mid, low])
            }
            None => None,
        };
        Ok(SNssai { sst: self.sst, sd })
    }
}

impl GnbConfig {
    /// Parse a configuration document and return its `gnb` section
    pub fn from_yaml_str(yaml: &str) -> NgapResult<Self> {
        let document: ConfigDocument = serde_yaml::from_str(yaml)?;
        Ok(document.gnb)
    }

    /// Read and parse a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> NgapResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Build the NG Setup Request this gNB sends
    pub fn to_ng_setup_request(&self) -> NgapResult<NgSetupRequest> {
        let global_ran_node_id = GlobalGnbId {
            plmn_identity: self.plmn_id.to_plmn_identity()?,
            gnb_id: GnbId::new(self.gnb_id.value, self.gnb_id.length)?,
        };

        let supported_ta_list = self
            .supported_ta
            .iter()
            .map(|ta| {
                let broadcast_plmn_list = ta
                    .broadcast_plmn
                    .iter()
                    .map(|bplmn| {
                        Ok(BroadcastPlmnItem {
                            plmn_identity: bplmn.plmn_id.to_plmn_identity()?,
                            slice_support_list: bplmn
                                .s_nssai
                                .iter()
                                .map(SNssaiConfig::to_s_nssai)
                                .collect::<NgapResult<Vec<_>>>()?,
                        })
                    })
                    .collect::<NgapResult<Vec<_>>>()?;
                Ok(SupportedTaItem {
                    tac: Tac::new(ta.tac)?,
                    broadcast_plmn_list,
                })
            })
            .collect::<NgapResult<Vec<_>>>()?;

        Ok(NgSetupRequest {
            global_ran_node_id,
            ran_node_name: self.name.clone(),
            supported_ta_list,
            default_paging_drx: self.paging_drx,
        })
    }
}
