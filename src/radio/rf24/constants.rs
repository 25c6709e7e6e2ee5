/// A private module encapsulating register offsets for the nRF24L01.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// A private module encapsulating SPI commands for the nRF24L01.
pub mod commands {
    pub const W_REGISTER: u8 = 0x20;
    pub const ACTIVATE: u8 = 0x50;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const W_TX_PAYLOAD_NO_ACK: u8 = 0xB0;
    pub const W_ACK_PAYLOAD: u8 = 0xA8;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const NOP: u8 = 0xFF;
}

/// A private module to encapsulate bit mnemonics
pub mod mnemonics {
    /// Operand for [`ACTIVATE`](super::commands::ACTIVATE) that unlocks the FEATURE register.
    pub const ACTIVATE_FEATURES: u8 = 0x73;
    /// Operand for [`ACTIVATE`](super::commands::ACTIVATE) that toggles the register bank.
    pub const ACTIVATE_BANK: u8 = 0x53;
}

/// The factory calibration values for register bank 1 of RFM7x modules.
pub(super) mod bank1 {
    /// Registers 0 - 13 as 32 bit words.
    ///
    /// Registers 0 - 8 are clocked out LSByte first, registers 9 - 13 MSByte first.
    pub const REGISTERS: [u32; 14] = [
        0xE2014B40, 0x00004BC0, 0x028CFCD0, 0x41390099, 0x1B8296D9, 0xA67F0224, 0x00000000,
        0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00127300, 0x46B48000,
    ];

    /// The index of the last register written LSByte first.
    pub const LAST_LITTLE_ENDIAN: u8 = 8;

    /// Register 14 holds the 11 byte ramp curve.
    pub const RAMP_CURVE: [u8; 11] = [
        0x41, 0x20, 0x08, 0x04, 0x81, 0x20, 0xCF, 0xF7, 0xFE, 0xFF, 0xFF,
    ];

    /// The register that must be toggled to latch the analog settings.
    pub const PLL_TOGGLE_REG: u8 = 4;

    /// Bits in the first byte of register 4 that get set and then cleared.
    pub const PLL_TOGGLE_MASK: u8 = 0x06;
}
