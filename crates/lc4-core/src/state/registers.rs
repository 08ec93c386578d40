use crate::memory::map::RESET_VECTOR;

/// Number of architecturally visible general-purpose registers (`R0..R7`).
pub const GENERAL_REGISTER_COUNT: usize = 8;
/// `PSR` bit for supervisor mode.
pub const PSR_PRIVILEGE: u16 = 1 << 15;
/// `PSR` bit for a negative result.
pub const PSR_N: u16 = 1 << 2;
/// `PSR` bit for a zero result.
pub const PSR_Z: u16 = 1 << 1;
/// `PSR` bit for a positive result.
pub const PSR_P: u16 = 1 << 0;
/// Mask of the `PSR` condition-code bits (`N/Z/P`).
pub const PSR_CONDITION_MASK: u16 = PSR_N | PSR_Z | PSR_P;

/// Architecturally visible general-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum GeneralRegister {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl GeneralRegister {
    /// Ordered list of all architectural general-purpose registers.
    pub const ALL: [Self; GENERAL_REGISTER_COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    /// Register holding subroutine and trap return addresses.
    pub const RETURN_ADDRESS: Self = Self::R7;

    /// Returns the array index for this register (`0..=7`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a 3-bit register field into an architectural register.
    #[must_use]
    pub const fn from_u3(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::R0),
            1 => Some(Self::R1),
            2 => Some(Self::R2),
            3 => Some(Self::R3),
            4 => Some(Self::R4),
            5 => Some(Self::R5),
            6 => Some(Self::R6),
            7 => Some(Self::R7),
            _ => None,
        }
    }
}

/// Architectural register file and status block for the LC4 core.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ArchitecturalState {
    gpr: [u16; GENERAL_REGISTER_COUNT],
    pc: u16,
    psr: u16,
}

impl Default for ArchitecturalState {
    fn default() -> Self {
        Self {
            gpr: [0; GENERAL_REGISTER_COUNT],
            pc: RESET_VECTOR,
            psr: PSR_PRIVILEGE,
        }
    }
}

impl ArchitecturalState {
    /// Reads a general-purpose register.
    #[must_use]
    pub const fn gpr(&self, reg: GeneralRegister) -> u16 {
        self.gpr[reg.index()]
    }

    /// Writes a general-purpose register.
    pub const fn set_gpr(&mut self, reg: GeneralRegister, value: u16) {
        self.gpr[reg.index()] = value;
    }

    /// Reads the `PC` register.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the `PC` register.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the `PSR` register.
    #[must_use]
    pub const fn psr(&self) -> u16 {
        self.psr
    }

    /// Writes the `PSR` register.
    pub const fn set_psr(&mut self, value: u16) {
        self.psr = value;
    }

    /// Returns `true` while the supervisor bit is set.
    #[must_use]
    pub const fn privileged(&self) -> bool {
        (self.psr & PSR_PRIVILEGE) != 0
    }

    /// Sets the supervisor bit. There is no architectural path that clears
    /// it once set.
    pub const fn enter_supervisor_mode(&mut self) {
        self.psr |= PSR_PRIVILEGE;
    }

    /// Reads the `N/Z/P` condition-code bits of `PSR`.
    #[must_use]
    pub const fn condition_codes(&self) -> u16 {
        self.psr & PSR_CONDITION_MASK
    }

    /// Replaces the `N/Z/P` bits of `PSR`, leaving the rest untouched.
    pub const fn set_condition_codes(&mut self, bits: u16) {
        self.psr = (self.psr & !PSR_CONDITION_MASK) | (bits & PSR_CONDITION_MASK);
    }
}
