use crate::radio::rf24::bit_fields::{Config, Feature, RfSetup, SetupRetry};
use crate::{ChipProfile, CrcLength, DataRate, PaLevel};

/// A struct to contain configuration about pipe addresses.
#[derive(Debug, Clone, Copy)]
struct EsbPipeConfig {
    /// Used for TX_ADDR and RX_ADDR_P0 (ACK packets arrive on pipe 0).
    address: [u8; 5],
    pipe1: [u8; 5],
    /// LSBytes for pipes 2 - 5.
    sub_addresses: [u8; 4],
    rx_pipes_enabled: u8,
}

impl Default for EsbPipeConfig {
    fn default() -> Self {
        Self {
            address: [0xE7; 5],
            pipe1: [0xC2; 5],
            sub_addresses: [0xC3, 0xC4, 0xC5, 0xC6],
            rx_pipes_enabled: 3,
        }
    }
}

impl EsbPipeConfig {
    fn set_rx_address(&mut self, pipe: u8, address: &[u8]) {
        let len = address.len().min(5);
        if len == 0 || pipe > 5 {
            return;
        }
        self.rx_pipes_enabled |= 1 << pipe;
        match pipe {
            0 => self.address[..len].copy_from_slice(&address[..len]),
            1 => self.pipe1[..len].copy_from_slice(&address[..len]),
            _ => self.sub_addresses[pipe as usize - 2] = address[0],
        }
    }

    fn get_rx_address(&self, pipe: u8, address: &mut [u8]) {
        let len = address.len().min(5);
        if len == 0 {
            return;
        }
        match pipe {
            0 => address[..len].copy_from_slice(&self.address[..len]),
            1 => address[..len].copy_from_slice(&self.pipe1[..len]),
            2..=5 => {
                address[0] = self.sub_addresses[pipe as usize - 2];
                address[1..len].copy_from_slice(&self.pipe1[1..len]);
            }
            _ => (),
        }
    }
}

/// The reasons a [`RadioConfig`] is rejected before anything is written to the radio.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// ACK payloads were enabled while dynamic payloads were disabled.
    AckPayloadsNeedDynamicPayloads,
    /// The address length is not in range [3, 5].
    AddressLength(u8),
    /// The channel is not in range [0, 127].
    Channel(u8),
    /// The auto-retry `count` is not in range [0, 15].
    RetryCount(u8),
    /// The auto-retry `delay` is not in range [0, 15].
    RetryDelay(u8),
    /// The static payload length is not in range [1, 32].
    PayloadLength(u8),
    /// Every RX pipe is closed.
    NoRxPipes,
}

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use rf24_link::radio::RadioConfig;
/// let mut config = RadioConfig::default();
/// config = config.with_channel(42);
/// ```
/// Values are stored as given; [`RadioConfig::validate()`] (called by
/// [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init)) rejects any out of range.
#[derive(Debug, Clone, Copy)]
pub struct RadioConfig {
    pub(crate) config_reg: Config,
    pub(crate) rf_setup: RfSetup,
    pub(crate) feature: Feature,
    address_length: u8,
    channel: u8,
    retry_delay: u8,
    retry_count: u8,
    payload_length: u8,
    ack_payload_length: u8,
    auto_ack: bool,
    chip: ChipProfile,
    pipes: EsbPipeConfig,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::chip()`] | [`ChipProfile::Standard`] |
    /// | [`RadioConfig::channel()`] | `76` |
    /// | [`RadioConfig::address_length()`] | `5` |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::lna_enable()`] | `true` |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit16`] |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps1`] |
    /// | [`RadioConfig::payload_length()`] | `32` |
    /// | [`RadioConfig::dynamic_payloads()`] | `false` |
    /// | [`RadioConfig::auto_ack()`] | `true` |
    /// | [`RadioConfig::ack_payloads()`] | `false` |
    /// | [`RadioConfig::ack_payload_length()`] | `32` |
    /// | [`RadioConfig::auto_retry_delay()`] | `5` |
    /// | [`RadioConfig::auto_retry_count()`] | `15` |
    /// | [`RadioConfig::address()`] | `[0xE7; 5]` |
    /// | [`RadioConfig::rx_address()`] | See below table about [Default RX addresses](#default-rx-pipes-configuration) |
    ///
    /// ## Default RX pipes' configuration
    ///
    /// | pipe number | state  | address     |
    /// |-------------|--------|-------------|
    /// |      0[^2]  | open   | `[0xE7; 5]` |
    /// |      1      | open   | `[0xC2; 5]` |
    /// |      2[^1]  | closed | `0xC3`      |
    /// |      3[^1]  | closed | `0xC4`      |
    /// |      4[^1]  | closed | `0xC5`      |
    /// |      5[^1]  | closed | `0xC6`      |
    ///
    /// [^1]: Remember, pipes 2 - 5 share the same 4 LSBytes as the address on pipe 1.
    /// [^2]: Pipe 0 always uses [`RadioConfig::address()`] so ACK packets can be received.
    fn default() -> Self {
        Self {
            /*
               - all events enabled for IRQ pin
               - 16 bit CRC
               - powered down
               - inactive TX (StandBy-I) mode
            */
            config_reg: Config::default(),
            /*
                - 1 Mbps data rate
                - Max PA level
                - LNA enabled
            */
            rf_setup: RfSetup::default(),
            /*
               - disabled dynamic payloads
               - disabled ACK payloads
            */
            feature: Feature::default(),
            address_length: 5,
            channel: 76,
            // 5 * 250 + 250 = 1500 us delay between attempts
            retry_delay: 5,
            retry_count: 15,
            payload_length: 32,
            ack_payload_length: 32,
            auto_ack: true,
            chip: ChipProfile::Standard,
            pipes: EsbPipeConfig::default(),
        }
    }
}

impl RadioConfig {
    /// Returns the value set by [`RadioConfig::with_chip()`].
    pub const fn chip(&self) -> ChipProfile {
        self.chip
    }

    /// The family member being driven.
    ///
    /// [`ChipProfile::DualBankLegacy`] adds the register bank 1 calibration
    /// and a longer power-on settling time to [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init).
    pub fn with_chip(self, chip: ChipProfile) -> Self {
        Self { chip, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_crc_length()`].
    pub const fn crc_length(&self) -> CrcLength {
        self.config_reg.crc_length()
    }

    /// The Cyclical Redundancy Checksum (CRC) length.
    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_config = self.config_reg.with_crc_length(length);
        Self {
            config_reg: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.rf_setup.data_rate()
    }

    /// The Data Rate (over the air).
    ///
    /// See [`EsbDataRate::set_data_rate()`](fn@crate::radio::prelude::EsbDataRate::set_data_rate).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_config = self.rf_setup.with_data_rate(data_rate);
        Self {
            rf_setup: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.rf_setup.pa_level()
    }

    /// The Power Amplitude (PA) level.
    ///
    /// See [`EsbPaLevel::set_pa_level()`](fn@crate::radio::prelude::EsbPaLevel::set_pa_level).
    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_config = self.rf_setup.with_pa_level(level);
        Self {
            rf_setup: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_lna_enable()`].
    pub const fn lna_enable(&self) -> bool {
        self.rf_setup.lna_enable()
    }

    /// Enable or disable the chip's Low Noise Amplifier (LNA) gain.
    ///
    /// On RFM7x modules this selects the high (`true`) or low (`false`) LNA gain.
    pub fn with_lna_enable(self, enable: bool) -> Self {
        let new_config = self.rf_setup.with_lna_enable(enable);
        Self {
            rf_setup: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_address_length()`].
    pub const fn address_length(&self) -> u8 {
        self.address_length
    }

    /// The address length (applies to all pipes).
    ///
    /// Valid values are in range [3, 5].
    pub fn with_address_length(self, value: u8) -> Self {
        Self {
            address_length: value,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the channel (over the air frequency).
    ///
    /// Valid values are in range [0, 127].
    /// The radio's frequency can be determined by the following equation:
    /// ```text
    /// frequency (in MHz) = channel + 2400
    /// ```
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value,
            ..self
        }
    }

    /// The auto-retry feature's `delay` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn auto_retry_delay(&self) -> u8 {
        self.retry_delay
    }

    /// The auto-retry feature's `count` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn auto_retry_count(&self) -> u8 {
        self.retry_count
    }

    /// Set the auto-retry feature's `delay` and `count` parameters.
    ///
    /// The `delay` is in steps of 250 microseconds (`(delay + 1) * 250`); both
    /// values are valid in range [0, 15]. The delay actually used is never shorter
    /// than the time needed to receive the ACK packet at the configured data rate.
    pub fn with_auto_retries(self, delay: u8, count: u8) -> Self {
        Self {
            retry_delay: delay,
            retry_count: count,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_dynamic_payloads()`].
    pub const fn dynamic_payloads(&self) -> bool {
        self.feature.dynamic_payloads()
    }

    /// Enable or disable dynamically sized payloads.
    ///
    /// Enabling this feature nullifies the utility of [`RadioConfig::payload_length()`].
    pub fn with_dynamic_payloads(self, enable: bool) -> Self {
        let new_config = self.feature.with_dynamic_payloads(enable);
        Self {
            feature: new_config,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_auto_ack()`].
    pub const fn auto_ack(&self) -> bool {
        self.auto_ack
    }

    /// Enable or disable the auto-ACK feature for every open RX pipe.
    ///
    /// Disabling this also disables auto-retries.
    pub fn with_auto_ack(self, enable: bool) -> Self {
        Self {
            auto_ack: enable,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_ack_payloads()`].
    pub const fn ack_payloads(&self) -> bool {
        self.feature.ack_payloads()
    }

    /// Enable or disable custom ACK payloads for auto-ACK packets.
    ///
    /// ACK payloads require [`RadioConfig::dynamic_payloads()`] to be enabled.
    pub fn with_ack_payloads(self, enable: bool) -> Self {
        let new_config = self.feature.with_ack_payloads(enable);
        Self {
            feature: new_config,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_ack_payload_length()`].
    pub const fn ack_payload_length(&self) -> u8 {
        self.ack_payload_length
    }

    /// The longest ACK payload expected from the receiver.
    ///
    /// This only influences the shortest auto-retry delay (at 250 Kbps).
    /// This value is clamped to range [0, 32].
    pub fn with_ack_payload_length(self, value: u8) -> Self {
        Self {
            ack_payload_length: value.min(32),
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_payload_length()`].
    pub const fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// The payload length for statically sized payloads.
    ///
    /// Valid values are in range [1, 32]. Shorter payloads are padded with zeros
    /// when transmitted.
    pub fn with_payload_length(self, value: u8) -> Self {
        Self {
            payload_length: value,
            ..self
        }
    }

    /// Close a RX pipe from receiving data.
    ///
    /// This is only useful if pipe 1 should be closed instead of open (after [`RadioConfig::default()`]).
    pub fn close_rx_pipe(self, pipe: u8) -> Self {
        let mut pipes = self.pipes;
        if pipe < 6 {
            pipes.rx_pipes_enabled &= !(1 << pipe);
        }
        Self { pipes, ..self }
    }

    /// Is a specified RX pipe open (`true`) or closed (`false`)?
    ///
    /// The value returned here is controlled by
    /// [`RadioConfig::with_rx_address()`] (to open a pipe) and [`RadioConfig::close_rx_pipe()`].
    pub fn is_rx_pipe_enabled(&self, pipe: u8) -> bool {
        pipe < 6 && self.pipes.rx_pipes_enabled & (1u8 << pipe) > 0
    }

    /// The bit mask of open RX pipes (bit 0 for pipe 0, and so on).
    pub const fn rx_pipes(&self) -> u8 {
        self.pipes.rx_pipes_enabled
    }

    /// Get the address for a specified `pipe` set by [`RadioConfig::with_rx_address()`]
    pub fn rx_address(&self, pipe: u8, address: &mut [u8]) {
        self.pipes.get_rx_address(pipe, address);
    }

    /// Set the address of a specified RX `pipe` for receiving data.
    ///
    /// This does nothing if the given `pipe` is greater than `5`.
    /// For pipes 2 - 5, the 4 MSBytes are used from address set to pipe 1 with the
    /// LSByte from the given `address`.
    /// Setting the address of pipe 0 is the same as [`RadioConfig::with_address()`].
    pub fn with_rx_address(self, pipe: u8, address: &[u8]) -> Self {
        let mut pipes = self.pipes;
        pipes.set_rx_address(pipe, address);
        Self { pipes, ..self }
    }

    /// Get the address set by [`RadioConfig::with_address()`]
    pub fn address(&self, address: &mut [u8]) {
        self.pipes.get_rx_address(0, address);
    }

    /// Set this radio's own address.
    ///
    /// It is used as the TX address and as the RX address of pipe 0 (where
    /// auto-ACK packets are received).
    pub fn with_address(self, address: &[u8]) -> Self {
        self.with_rx_address(0, address)
    }
}

impl RadioConfig {
    /// Check every value against the ranges the radio accepts.
    ///
    /// This is called by [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init)
    /// and [`EsbInit::reconfigure_rf()`](fn@crate::radio::prelude::EsbInit::reconfigure_rf)
    /// before any register is written.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ack_payloads() && !self.dynamic_payloads() {
            return Err(ConfigError::AckPayloadsNeedDynamicPayloads);
        }
        if !(3..=5).contains(&self.address_length) {
            return Err(ConfigError::AddressLength(self.address_length));
        }
        self.validate_rf()?;
        if !self.dynamic_payloads() && !(1..=32).contains(&self.payload_length) {
            return Err(ConfigError::PayloadLength(self.payload_length));
        }
        if self.pipes.rx_pipes_enabled & 0x3F == 0 {
            return Err(ConfigError::NoRxPipes);
        }
        Ok(())
    }

    /// The subset of [`RadioConfig::validate()`] that concerns RF parameters only.
    pub(crate) fn validate_rf(&self) -> Result<(), ConfigError> {
        if self.channel > 127 {
            return Err(ConfigError::Channel(self.channel));
        }
        if self.retry_count > 15 {
            return Err(ConfigError::RetryCount(self.retry_count));
        }
        if self.retry_delay > 15 {
            return Err(ConfigError::RetryDelay(self.retry_delay));
        }
        Ok(())
    }

    /// The shortest delay (in microseconds) between retries that still allows
    /// the ACK packet to arrive, given the data rate and ACK payload usage.
    pub const fn min_retry_delay(&self) -> u16 {
        match (self.data_rate(), self.ack_payloads()) {
            (DataRate::Kbps250, false) => 700,
            (DataRate::Kbps250, true) => match self.ack_payload_length {
                0..=7 => 800,
                8..=15 => 1100,
                16..=23 => 1300,
                _ => 1600,
            },
            (_, false) => 300,
            (_, true) => 700,
        }
    }

    /// The value for the SETUP_RETR register.
    ///
    /// The `delay` is rounded up to the next 250 microsecond step and never
    /// shorter than [`RadioConfig::min_retry_delay()`].
    pub(crate) fn setup_retry(&self) -> SetupRetry {
        if !self.auto_ack {
            return SetupRetry::from_bits(0);
        }
        let min_ard = (self.min_retry_delay().div_ceil(250) - 1) as u8;
        SetupRetry::new()
            .with_ard(self.retry_delay.max(min_ard).min(15))
            .with_arc(self.retry_count.min(15))
    }

    /// The value for the EN_AA register.
    pub(crate) const fn en_aa(&self) -> u8 {
        if self.auto_ack {
            self.pipes.rx_pipes_enabled & 0x3F
        } else {
            0
        }
    }

    /// The value for the DYNPD register.
    pub(crate) const fn dynpd(&self) -> u8 {
        if self.dynamic_payloads() {
            self.pipes.rx_pipes_enabled & 0x3F
        } else {
            0
        }
    }

    /// The value for the FEATURE register.
    ///
    /// `EN_DYN_ACK` is always set so payloads can be sent without requesting an ACK.
    pub(crate) fn feature_reg(&self) -> Feature {
        self.feature.with_ask_no_ack(true)
    }
}
