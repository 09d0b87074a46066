use crate::ffi::ov_element_type_e;
use std::fmt;

/// OpenVINO element types, numbered as in `ov_element_type_e` from 2024.2 on
/// (`U2`, `U3` and `U6` sit before `U8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Undefined = 0,
    Dynamic = 1,
    Boolean = 2,
    Bf16 = 3,
    F16 = 4,
    F32 = 5,
    F64 = 6,
    I4 = 7,
    I8 = 8,
    I16 = 9,
    I32 = 10,
    I64 = 11,
    U1 = 12,
    U2 = 13,
    U3 = 14,
    U4 = 15,
    U6 = 16,
    U8 = 17,
    U16 = 18,
    U32 = 19,
    U64 = 20,
    Nf4 = 21,
    F8E4M3 = 22,
    F8E5M2 = 23,
    String = 24,
}

impl ElementType {
    pub fn from_raw(raw: ov_element_type_e) -> Option<Self> {
        use ElementType::*;
        let ty = match raw {
            0 => Undefined,
            1 => Dynamic,
            2 => Boolean,
            3 => Bf16,
            4 => F16,
            5 => F32,
            6 => F64,
            7 => I4,
            8 => I8,
            9 => I16,
            10 => I32,
            11 => I64,
            12 => U1,
            13 => U2,
            14 => U3,
            15 => U4,
            16 => U6,
            17 => U8,
            18 => U16,
            19 => U32,
            20 => U64,
            21 => Nf4,
            22 => F8E4M3,
            23 => F8E5M2,
            24 => String,
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_raw(self) -> ov_element_type_e {
        self as ov_element_type_e
    }

    /// Size in bytes of one element, or `None` for sub-byte, dynamic and string types.
    pub fn byte_width(self) -> Option<usize> {
        use ElementType::*;
        match self {
            Boolean | I8 | U8 | F8E4M3 | F8E5M2 => Some(1),
            Bf16 | F16 | I16 | U16 => Some(2),
            F32 | I32 | U32 => Some(4),
            F64 | I64 | U64 => Some(8),
            Undefined | Dynamic | I4 | U1 | U2 | U3 | U4 | U6 | Nf4 | String => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = format!("{:?}", self).to_lowercase();
        f.write_str(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for raw in 0..=24 {
            let ty = ElementType::from_raw(raw).unwrap();
            assert_eq!(ty.as_raw(), raw);
        }
        assert_eq!(ElementType::from_raw(25), None);
    }

    #[test]
    fn test_discriminants() {
        assert_eq!(ElementType::Boolean.as_raw(), 2);
        assert_eq!(ElementType::F32.as_raw(), 5);
        assert_eq!(ElementType::I64.as_raw(), 11);
        assert_eq!(ElementType::U8.as_raw(), 17);
    }

    #[test]
    fn test_byte_width() {
        assert_eq!(ElementType::F32.byte_width(), Some(4));
        assert_eq!(ElementType::I64.byte_width(), Some(8));
        assert_eq!(ElementType::U8.byte_width(), Some(1));
        assert_eq!(ElementType::U4.byte_width(), None);
        assert_eq!(ElementType::String.byte_width(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ElementType::F32.to_string(), "f32");
        assert_eq!(ElementType::I64.to_string(), "i64");
    }
}
