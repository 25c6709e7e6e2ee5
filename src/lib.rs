#![doc = include_str!("../README.md")]
//!
//! ## Basic API
//!
//! - [`RF24::new()`](fn@crate::radio::RF24::new)
//! - [`RF24::init()`](radio/struct.RF24.html#method.init)
//! - [`RF24::as_rx()`](radio/struct.RF24.html#method.as_rx)
//! - [`RF24::as_tx()`](radio/struct.RF24.html#method.as_tx)
//! - [`RF24::power_down()`](radio/struct.RF24.html#method.power_down)
//! - [`RF24::transmit()`](radio/struct.RF24.html#method.transmit)
//! - [`RF24::receive()`](radio/struct.RF24.html#method.receive)
//! - [`RF24::write_ack_payload()`](radio/struct.RF24.html#method.write_ack_payload)
//!
//! ## Interrupt driven API
//!
//! - [`RF24::transmit_async()`](fn@crate::radio::RF24::transmit_async)
//! - [`RF24::receive_async()`](fn@crate::radio::RF24::receive_async)
//! - [`RF24::pump_events()`](radio/struct.RF24.html#method.pump_events)
//! - [`RF24::events()`](radio/struct.RF24.html#method.events)
//!
//! ## Advanced API
//!
//! - [`RF24::reconfigure_rf()`](radio/struct.RF24.html#method.reconfigure_rf)
//! - [`RF24::write()`](radio/struct.RF24.html#method.write)
//! - [`RF24::read()`](radio/struct.RF24.html#method.read)
//! - [`RF24::available_pipe()`](radio/struct.RF24.html#method.available_pipe)
//! - [`RF24::get_fifo_state()`](radio/struct.RF24.html#method.get_fifo_state)
//! - [`RF24::flush_rx()`](radio/struct.RF24.html#method.flush_rx)
//! - [`RF24::flush_tx()`](radio/struct.RF24.html#method.flush_tx)
//! - [`RF24::update()`](radio/struct.RF24.html#method.update)
//! - [`RF24::get_status_flags()`](radio/struct.RF24.html#method.get_status_flags)
//! - [`RF24::observe_tx()`](radio/struct.RF24.html#method.observe_tx)
//! - [`RF24::get_last_arc()`](radio/struct.RF24.html#method.get_last_arc)
//! - [`RF24::get_dynamic_payload_length()`](radio/struct.RF24.html#method.get_dynamic_payload_length)
//! - [`RF24::details()`](radio/struct.RF24.html#method.details)
//! - [`RF24::print_details()`](radio/struct.RF24.html#method.print_details)
//!
//! ## Features
//!
//! - `defmt`: log through [`defmt`](https://docs.rs/defmt) and implement `defmt::Format`
//!   for the public types.
//! - `std`: make [`RF24::print_details()`](radio/struct.RF24.html#method.print_details)
//!   print to stdout.
#![no_std]

mod types;
pub use types::{
    ChipProfile, CrcLength, DataRate, FifoState, PaLevel, Payload, RadioDetails, RadioState,
    StatusFlags, TransmitResult,
};
pub mod radio;

#[cfg(test)]
mod sim;
