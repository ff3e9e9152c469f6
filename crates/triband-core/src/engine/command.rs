//! Lock-free command queue for engine control
//!
//! Parameter values travel through the atomic [`ParameterStore`]; the queue
//! carries the few operations that must happen on the audio thread between
//! blocks, such as clearing filter state or switching sample rate.
//!
//! The `rtrb` ringbuffer is allocated once at startup and both push and pop
//! are wait-free, so the audio thread never blocks on the control thread.
//!
//! # Usage
//!
//! ```ignore
//! let (mut tx, mut rx) = command_channel(COMMAND_QUEUE_CAPACITY);
//!
//! // Control thread
//! tx.send(EngineCommand::SetSampleRate(44100)).ok();
//!
//! // Audio thread, before processing a block
//! engine.process_commands(&mut rx);
//! ```
//!
//! [`ParameterStore`]: crate::params::ParameterStore

/// Commands sent from the control thread to the audio thread
///
/// Commands are applied at block boundaries, never mid-block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    /// Clear filter, envelope and ramp state
    Reset,
    /// Switch to a new sample rate (resets all state)
    SetSampleRate(u32),
    /// Change the trim ramp duration in seconds
    SetTrimRamp(f32),
}

/// Capacity of the command queue
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Sending half of the command queue, owned by the control thread
pub struct CommandSender {
    producer: rtrb::Producer<EngineCommand>,
}

impl CommandSender {
    /// Queue a command (non-blocking)
    ///
    /// Returns `Err(cmd)` with the command if the queue is full.
    pub fn send(&mut self, cmd: EngineCommand) -> Result<(), EngineCommand> {
        self.producer.push(cmd).map_err(|e| match e {
            rtrb::PushError::Full(value) => value,
        })
    }

    /// Check if the queue has space for more commands
    pub fn has_space(&self) -> bool {
        self.producer.slots() > 0
    }
}

/// Create a command channel
///
/// Returns the sender for the control thread and the consumer the engine
/// drains in [`SignalEngine::process_commands`].
///
/// [`SignalEngine::process_commands`]: super::SignalEngine::process_commands
pub fn command_channel(capacity: usize) -> (CommandSender, rtrb::Consumer<EngineCommand>) {
    let (producer, consumer) = rtrb::RingBuffer::new(capacity.max(1));
    (CommandSender { producer }, consumer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_channel_roundtrip() {
        let (mut tx, mut rx) = command_channel(4);

        tx.send(EngineCommand::SetSampleRate(44100)).unwrap();
        tx.send(EngineCommand::Reset).unwrap();

        assert_eq!(rx.pop().unwrap(), EngineCommand::SetSampleRate(44100));
        assert_eq!(rx.pop().unwrap(), EngineCommand::Reset);
        assert!(rx.pop().is_err());
    }

    #[test]
    fn test_full_queue_returns_command() {
        let (mut tx, _rx) = command_channel(1);

        tx.send(EngineCommand::Reset).unwrap();
        assert!(!tx.has_space());
        assert_eq!(
            tx.send(EngineCommand::SetTrimRamp(0.1)),
            Err(EngineCommand::SetTrimRamp(0.1))
        );
    }
}
