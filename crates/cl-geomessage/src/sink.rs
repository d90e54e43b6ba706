//! Message sinks: the transport boundary for finished geomessages.
//!
//! A sink takes ownership of delivering one message to its listeners. The
//! sinks here cover in-process use (memory capture, channel fan-out) and
//! line-oriented output (XML or JSON per line). Network transports live
//! outside this crate and implement [`MessageSink`] themselves.

use crate::message::Geomessage;
use crate::xml::{to_json, to_xml};
use cl_common::{Error, Result};
use std::io::Write;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use tracing::trace;

/// Accepts one fully formed geomessage for delivery.
pub trait MessageSink: Send + Sync {
    fn send_message(&self, message: &Geomessage) -> Result<()>;
}

impl<S: MessageSink + ?Sized> MessageSink for Arc<S> {
    fn send_message(&self, message: &Geomessage) -> Result<()> {
        (**self).send_message(message)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| Error::Delivery("sink lock poisoned".to_string()))
}

/// Keeps every delivered message in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<Geomessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of delivered messages, oldest first.
    pub fn messages(&self) -> Vec<Geomessage> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything delivered so far.
    pub fn take(&self) -> Vec<Geomessage> {
        self.messages
            .lock()
            .map(|mut messages| std::mem::take(&mut *messages))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSink for MemorySink {
    fn send_message(&self, message: &Geomessage) -> Result<()> {
        lock(&self.messages)?.push(message.clone());
        Ok(())
    }
}

/// Broadcasts messages to every live subscriber.
///
/// Subscribers whose receiver has been dropped are pruned on the next send.
#[derive(Debug, Default)]
pub struct ChannelSink {
    senders: Mutex<Vec<mpsc::Sender<Geomessage>>>,
}

impl ChannelSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to receive messages sent after this call.
    pub fn subscribe(&self) -> Result<mpsc::Receiver<Geomessage>> {
        let (tx, rx) = mpsc::channel();
        lock(&self.senders)?.push(tx);
        Ok(rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl MessageSink for ChannelSink {
    fn send_message(&self, message: &Geomessage) -> Result<()> {
        let mut senders = lock(&self.senders)?;
        senders.retain(|sender| sender.send(message.clone()).is_ok());
        trace!(subscribers = senders.len(), "broadcast geomessage");
        Ok(())
    }
}

/// Output encoding for [`WriterSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Xml,
    Json,
}

/// Writes one rendered message per line to an `io::Write`.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    format: LineFormat,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, format: LineFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    pub fn xml(writer: W) -> Self {
        Self::new(writer, LineFormat::Xml)
    }

    pub fn json(writer: W) -> Self {
        Self::new(writer, LineFormat::Json)
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|_| Error::Delivery("sink lock poisoned".to_string()))
    }
}

impl<W: Write + Send> MessageSink for WriterSink<W> {
    fn send_message(&self, message: &Geomessage) -> Result<()> {
        let line = match self.format {
            LineFormat::Xml => to_xml(message)?,
            LineFormat::Json => to_json(message)?,
        };
        let mut writer = lock(&self.writer)?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Forwards each message to several sinks.
///
/// Every sink is attempted; the first failure is reported after all have
/// been tried.
pub struct FanoutSink {
    sinks: Vec<Arc<dyn MessageSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn MessageSink>>) -> Self {
        Self { sinks }
    }
}

impl MessageSink for FanoutSink {
    fn send_message(&self, message: &Geomessage) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.send_message(message) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
