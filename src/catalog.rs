//! Closed catalog of v3 variables: name -> stride -> typed value.
//!
//! Strides and layouts are not stored in the file; they are fixed here.
//!
//! | name       | stride | layout                                          |
//! |------------|--------|-------------------------------------------------|
//! | `mhd`      | 64     | density, momentum[3], energy, magnetic field[3] |
//! | `primary`  | 18     | u8 x 18                                         |
//! | `bgB`      | 144    | f64 x 18 (6 faces x 3 components)               |
//! | `divfaceB` | 8      | f64                                             |
//! | `edgeE`    | 96     | f64 x 12                                        |
//! | `faceB`    | 48     | f64 x 6                                         |
//! | `rank`     | 4      | i32                                             |
//! | `mhd info` | 4      | u32                                             |
//! | `ref lvls` | 8      | i32 x 2 (current, target)                       |
//! | `fluxes`   | -      | recognized, never decoded                       |

use anyhow::Result;
use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use std::fmt;

use crate::error::SnapError;
use crate::util::{read_f64_array, read_i32_array};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VarKind {
    Mhd,
    Primary,
    BgB,
    DivFaceB,
    EdgeE,
    FaceB,
    Rank,
    MhdInfo,
    RefLvls,
    /// Present in files, but there is no decoder for it.
    Fluxes,
}

impl VarKind {
    pub const ALL: [VarKind; 10] = [
        VarKind::Mhd,
        VarKind::Primary,
        VarKind::BgB,
        VarKind::DivFaceB,
        VarKind::EdgeE,
        VarKind::FaceB,
        VarKind::Rank,
        VarKind::MhdInfo,
        VarKind::RefLvls,
        VarKind::Fluxes,
    ];

    /// Map a (trimmed) directory name to its kind.
    pub fn from_name(name: &str) -> Result<Self> {
        let kind = match name {
            "mhd" => VarKind::Mhd,
            "primary" => VarKind::Primary,
            "bgB" => VarKind::BgB,
            "divfaceB" => VarKind::DivFaceB,
            "edgeE" => VarKind::EdgeE,
            "faceB" => VarKind::FaceB,
            "rank" => VarKind::Rank,
            "mhd info" => VarKind::MhdInfo,
            "ref lvls" => VarKind::RefLvls,
            "fluxes" => VarKind::Fluxes,
            other => {
                return Err(SnapError::UnknownVariable {
                    name: other.to_string(),
                }
                .into())
            }
        };
        Ok(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            VarKind::Mhd => "mhd",
            VarKind::Primary => "primary",
            VarKind::BgB => "bgB",
            VarKind::DivFaceB => "divfaceB",
            VarKind::EdgeE => "edgeE",
            VarKind::FaceB => "faceB",
            VarKind::Rank => "rank",
            VarKind::MhdInfo => "mhd info",
            VarKind::RefLvls => "ref lvls",
            VarKind::Fluxes => "fluxes",
        }
    }

    /// Bytes per cell, or `None` for kinds that are never decoded.
    pub fn stride(self) -> Option<usize> {
        match self {
            VarKind::Mhd => Some(8 * 8),
            VarKind::Primary => Some(6 + 12),
            VarKind::BgB => Some(3 * 6 * 8),
            VarKind::DivFaceB => Some(8),
            VarKind::EdgeE => Some(12 * 8),
            VarKind::FaceB => Some(6 * 8),
            VarKind::Rank => Some(4),
            VarKind::MhdInfo => Some(4),
            VarKind::RefLvls => Some(2 * 4),
            VarKind::Fluxes => None,
        }
    }

    #[inline]
    pub fn is_decodable(self) -> bool {
        self.stride().is_some()
    }

    /// Interpret one stride-sized record. `None` for `Fluxes`.
    ///
    /// `buf` must hold at least `stride()` bytes.
    pub fn decode(self, buf: &[u8]) -> Option<VarValue> {
        let v = match self {
            VarKind::Mhd => {
                let f: [f64; 8] = read_f64_array(buf);
                VarValue::Mhd(MhdState {
                    density: f[0],
                    momentum: [f[1], f[2], f[3]],
                    energy: f[4],
                    magnetic_field: [f[5], f[6], f[7]],
                })
            }
            VarKind::Primary => {
                let mut flags = [0u8; 18];
                flags.copy_from_slice(&buf[..18]);
                VarValue::Primary(flags)
            }
            VarKind::BgB => VarValue::BgB(read_f64_array(buf)),
            VarKind::DivFaceB => VarValue::DivFaceB(LittleEndian::read_f64(&buf[..8])),
            VarKind::EdgeE => VarValue::EdgeE(read_f64_array(buf)),
            VarKind::FaceB => VarValue::FaceB(read_f64_array(buf)),
            VarKind::Rank => VarValue::Rank(LittleEndian::read_i32(&buf[..4])),
            VarKind::MhdInfo => VarValue::MhdInfo(LittleEndian::read_u32(&buf[..4])),
            VarKind::RefLvls => VarValue::RefLvls(read_i32_array(buf)),
            VarKind::Fluxes => return None,
        };
        Some(v)
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conserved MHD state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MhdState {
    pub density: f64,
    pub momentum: [f64; 3],
    pub energy: f64,
    pub magnetic_field: [f64; 3],
}

/// Decoded value of one variable in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VarValue {
    Mhd(MhdState),
    Primary([u8; 18]),
    /// Background B at the 6 faces, 3 components each.
    BgB([f64; 18]),
    DivFaceB(f64),
    /// E along the 12 cell edges.
    EdgeE([f64; 12]),
    /// Normal B component at the 6 faces.
    FaceB([f64; 6]),
    Rank(i32),
    MhdInfo(u32),
    /// (current, target) refinement level.
    RefLvls([i32; 2]),
}

impl VarValue {
    pub fn kind(&self) -> VarKind {
        match self {
            VarValue::Mhd(_) => VarKind::Mhd,
            VarValue::Primary(_) => VarKind::Primary,
            VarValue::BgB(_) => VarKind::BgB,
            VarValue::DivFaceB(_) => VarKind::DivFaceB,
            VarValue::EdgeE(_) => VarKind::EdgeE,
            VarValue::FaceB(_) => VarKind::FaceB,
            VarValue::Rank(_) => VarKind::Rank,
            VarValue::MhdInfo(_) => VarKind::MhdInfo,
            VarValue::RefLvls(_) => VarKind::RefLvls,
        }
    }

    pub fn as_mhd(&self) -> Option<&MhdState> {
        match self {
            VarValue::Mhd(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    #[test]
    fn names_roundtrip_through_kind() {
        for k in VarKind::ALL {
            assert_eq!(VarKind::from_name(k.name()).unwrap(), k);
        }
    }

    #[test]
    fn unknown_name_is_typed_error() {
        let err = VarKind::from_name("bogus").unwrap_err();
        assert_eq!(
            SnapError::of(&err),
            Some(&SnapError::UnknownVariable { name: "bogus".into() })
        );
        // names are matched after trimming, not fuzzily
        assert!(VarKind::from_name("MHD").is_err());
        assert!(VarKind::from_name("mhdinfo").is_err());
    }

    #[test]
    fn strides_match_layouts() {
        let expect = [
            (VarKind::Mhd, 64),
            (VarKind::Primary, 18),
            (VarKind::BgB, 144),
            (VarKind::DivFaceB, 8),
            (VarKind::EdgeE, 96),
            (VarKind::FaceB, 48),
            (VarKind::Rank, 4),
            (VarKind::MhdInfo, 4),
            (VarKind::RefLvls, 8),
        ];
        for (k, s) in expect {
            assert_eq!(k.stride(), Some(s), "{k}");
            // a zero buffer of exactly one stride decodes into the same kind
            let v = k.decode(&vec![0u8; s]).unwrap();
            assert_eq!(v.kind(), k);
        }
        assert_eq!(VarKind::Fluxes.stride(), None);
        assert!(VarKind::Fluxes.decode(&[]).is_none());
    }

    #[test]
    fn decode_mhd_fields_in_order() {
        let mut buf = Vec::new();
        for x in [3.0f64, 1.0, 0.0, 0.0, 4.0, 0.0, 0.0, -1.0] {
            buf.write_f64::<LittleEndian>(x).unwrap();
        }
        let v = VarKind::Mhd.decode(&buf).unwrap();
        assert_eq!(
            v.as_mhd(),
            Some(&MhdState {
                density: 3.0,
                momentum: [1.0, 0.0, 0.0],
                energy: 4.0,
                magnetic_field: [0.0, 0.0, -1.0],
            })
        );
    }

    #[test]
    fn decode_integer_kinds() {
        let mut buf = Vec::new();
        buf.write_i32::<LittleEndian>(-3).unwrap();
        buf.write_i32::<LittleEndian>(7).unwrap();
        assert_eq!(VarKind::Rank.decode(&buf), Some(VarValue::Rank(-3)));
        assert_eq!(VarKind::RefLvls.decode(&buf), Some(VarValue::RefLvls([-3, 7])));
        assert_eq!(
            VarKind::MhdInfo.decode(&buf),
            Some(VarValue::MhdInfo(u32::MAX - 2))
        );
    }
}
