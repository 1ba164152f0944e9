//! CommandQueue: the single synchronization point between producers and
//! the renderer.

use core::future::Future;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::Channel;

use crate::types::Command;

/// Queue depth used by the firmware.
pub const QUEUE_CAPACITY: usize = 10;

/// The queue type shared by the firmware tasks.
pub type HudQueue = CommandQueue<CriticalSectionRawMutex, QUEUE_CAPACITY>;

/// Returned by [`CommandQueue::enqueue`] when the queue is at capacity.
///
/// Carries the rejected command so the caller can log what was dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub Command);

/// Bounded multi-producer / single-consumer FIFO of [`Command`]s.
///
/// Producers never wait: when the queue is full the new command is
/// discarded. Newer telemetry or input arrives shortly, so freshness wins
/// over completeness. The single consumer waits indefinitely for the next
/// command.
///
/// The queue is built once at startup and handed to every task by
/// reference; there is no global instance.
pub struct CommandQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, Command, N>,
}

impl<M: RawMutex, const N: usize> CommandQueue<M, N> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Try to append a command without blocking.
    ///
    /// On a full queue the command is handed back inside [`QueueFull`] and
    /// the queued items are left untouched.
    pub fn enqueue(&self, command: Command) -> Result<(), QueueFull> {
        self.channel.try_send(command).map_err(|e| match e {
            embassy_sync::channel::TrySendError::Full(command) => QueueFull(command),
        })
    }

    /// Wait for the oldest command.
    pub fn dequeue(&self) -> impl Future<Output = Command> + '_ {
        self.channel.receive()
    }

    /// Take the oldest command if one is queued.
    pub fn try_dequeue(&self) -> Option<Command> {
        self.channel.try_receive().ok()
    }

    /// Number of queued commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    /// Fixed capacity set at construction.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, const N: usize> Default for CommandQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
