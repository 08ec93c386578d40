use thiserror::Error;

/// Runtime fault taxonomy for a single execution step.
///
/// Every fault terminates the run: the step that raises one reports it to
/// the driver instead of a trace record, and the driver must stop stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// Divide or modulo with a zero right-hand register.
    #[error("divide by zero")]
    DivideByZero = 0x01,
    /// `HICONST` encoding with its required format bit (bit 8) clear.
    #[error("hiconst encoding missing its format bit")]
    MalformedHiconst = 0x02,
    /// Load/store effective address in a protected or unmapped window.
    #[error("data access to a protected or unmapped address")]
    IllegalMemoryAccess = 0x03,
    /// Load/store with identical source and destination register indices.
    #[error("load/store source and destination registers must differ")]
    AliasedOperands = 0x04,
}

impl FaultCode {
    /// Converts a fault code to its stable low-byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable low-byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::DivideByZero),
            0x02 => Some(Self::MalformedHiconst),
            0x03 => Some(Self::IllegalMemoryAccess),
            0x04 => Some(Self::AliasedOperands),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FaultCode;

    #[test]
    fn stable_code_roundtrip_is_bijective_for_defined_values() {
        for code in 0x01u8..=0x04 {
            let fault = FaultCode::from_u8(code).expect("defined taxonomy code");
            assert_eq!(fault.as_u8(), code);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(FaultCode::from_u8(0x00).is_none());
        assert!(FaultCode::from_u8(0x05).is_none());
        assert!(FaultCode::from_u8(0xFF).is_none());
    }

    #[test]
    fn messages_name_the_failing_operation() {
        assert_eq!(FaultCode::DivideByZero.to_string(), "divide by zero");
        assert!(FaultCode::AliasedOperands.to_string().contains("differ"));
    }
}
