//! Record-type registry: the closed enumeration of wire tags, their
//! symbolic names, and the payload kind each one carries.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// The kind of payload a record's bytes decode as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadKind {
    /// Zero-length payload.
    None,
    /// A single 16-bit flags word.
    BitArray,
    /// Zero or more big-endian signed 16-bit integers.
    Int16,
    /// Zero or more big-endian signed 32-bit integers.
    Int32,
    /// Zero or more 8-byte hexadecimal reals.
    Real8,
    /// ASCII string, NUL-padded to even length on write, trailing NULs
    /// stripped on read.
    Ascii,
}

/// A wire-level record tag over the full closed set of documented
/// GDSII record types. Each variant's discriminant is the full 16-bit
/// `(record_id << 8 | datatype_id)` value as it appears on the wire.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[repr(u16)]
pub enum RecordTag {
    Header = 0x0002,
    BgnLib = 0x0102,
    LibName = 0x0206,
    Units = 0x0305,
    EndLib = 0x0400,
    BgnStr = 0x0502,
    StrName = 0x0606,
    EndStr = 0x0700,
    Boundary = 0x0800,
    Path = 0x0900,
    SRef = 0x0a00,
    ARef = 0x0b00,
    Text = 0x0c00,
    Layer = 0x0d02,
    DataType = 0x0e02,
    Width = 0x0f03,
    Xy = 0x1003,
    EndEl = 0x1100,
    SName = 0x1206,
    ColRow = 0x1302,
    Node = 0x1500,
    TextType = 0x1602,
    Presentation = 0x1701,
    String = 0x1906,
    Strans = 0x1a01,
    Mag = 0x1b05,
    Angle = 0x1c05,
    RefLibs = 0x1f06,
    Fonts = 0x2006,
    PathType = 0x2102,
    Generations = 0x2202,
    AttrTable = 0x2306,
    ElFlags = 0x2601,
    NodeType = 0x2a02,
    PropAttr = 0x2b02,
    PropValue = 0x2c06,
    Box = 0x2d00,
    BoxType = 0x2e02,
    Plex = 0x2f03,
    BgnExtn = 0x3003,
    EndExtn = 0x3103,
    TapeNum = 0x3202,
    TapeCode = 0x3302,
    Format = 0x3602,
    Mask = 0x3706,
    EndMasks = 0x3800,
    LibDirSize = 0x3902,
    SrfName = 0x3a06,
    LibSecur = 0x3b02,
}

impl RecordTag {
    /// The symbolic name used in error messages and diagnostics.
    pub fn name(self) -> &'static str {
        use RecordTag::*;
        match self {
            Header => "HEADER",
            BgnLib => "BGNLIB",
            LibName => "LIBNAME",
            Units => "UNITS",
            EndLib => "ENDLIB",
            BgnStr => "BGNSTR",
            StrName => "STRNAME",
            EndStr => "ENDSTR",
            Boundary => "BOUNDARY",
            Path => "PATH",
            SRef => "SREF",
            ARef => "AREF",
            Text => "TEXT",
            Layer => "LAYER",
            DataType => "DATATYPE",
            Width => "WIDTH",
            Xy => "XY",
            EndEl => "ENDEL",
            SName => "SNAME",
            ColRow => "COLROW",
            Node => "NODE",
            TextType => "TEXTTYPE",
            Presentation => "PRESENTATION",
            String => "STRING",
            Strans => "STRANS",
            Mag => "MAG",
            Angle => "ANGLE",
            RefLibs => "REFLIBS",
            Fonts => "FONTS",
            PathType => "PATHTYPE",
            Generations => "GENERATIONS",
            AttrTable => "ATTRTABLE",
            ElFlags => "ELFLAGS",
            NodeType => "NODETYPE",
            PropAttr => "PROPATTR",
            PropValue => "PROPVALUE",
            Box => "BOX",
            BoxType => "BOXTYPE",
            Plex => "PLEX",
            BgnExtn => "BGNEXTN",
            EndExtn => "ENDEXTN",
            TapeNum => "TAPENUM",
            TapeCode => "TAPECODE",
            Format => "FORMAT",
            Mask => "MASK",
            EndMasks => "ENDMASKS",
            LibDirSize => "LIBDIRSIZE",
            SrfName => "SRFNAME",
            LibSecur => "LIBSECUR",
        }
    }

    /// The payload kind this tag's bytes decode as.
    pub fn payload_kind(self) -> PayloadKind {
        use PayloadKind::*;
        use RecordTag::*;
        match self {
            EndLib | EndStr | Boundary | Path | SRef | ARef | Text | EndEl | Node | Box
            | EndMasks => None,
            Strans | ElFlags | Presentation => BitArray,
            Header | BgnLib | BgnStr | Layer | DataType | ColRow | TextType | PathType
            | Generations | NodeType | PropAttr | BoxType | TapeNum | TapeCode | Format
            | LibDirSize | LibSecur => Int16,
            Width | Xy | Plex | BgnExtn | EndExtn => Int32,
            Units | Mag | Angle => Real8,
            LibName | StrName | SName | String | RefLibs | Fonts | AttrTable | PropValue
            | Mask | SrfName => Ascii,
        }
    }
}
