//! `strans` transform-flags field. `Strans` is not a closed bit-flag
//! type that rejects unknown bits: it must round-trip every bit
//! verbatim, since reserved bits the format doesn't document are still
//! legal on the wire and must survive a read/write cycle unchanged.

const REFLECT: u16 = 1 << 15;
const ABSOLUTE_MAG: u16 = 1 << 1;
const ABSOLUTE_ANGLE: u16 = 1 << 0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Strans(pub u16);

impl Strans {
    pub fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub fn into_raw(self) -> u16 {
        self.0
    }

    /// Bit 15: mirror about the x-axis before rotation. The only bit
    /// that affects geometry in this core.
    pub fn reflect(self) -> bool {
        self.0 & REFLECT != 0
    }

    /// Bit 1: absolute magnification. Carried through, not interpreted.
    pub fn absolute_mag(self) -> bool {
        self.0 & ABSOLUTE_MAG != 0
    }

    /// Bit 0: absolute angle. Carried through, not interpreted.
    pub fn absolute_angle(self) -> bool {
        self.0 & ABSOLUTE_ANGLE != 0
    }
}
