use crossbeam_channel as channel;
use std::{collections::BTreeMap, sync::Arc};

use super::{io, Cable, ChannelMessage, Error};
use crate::bytes;

/// Per connection data handed to the midir callback.
#[derive(Clone, Debug)]
pub struct Forwarder {
    msg_tx: channel::Sender<ChannelMessage>,
    cable: Cable,
    receiver_gone: bool,
}

impl Forwarder {
    pub fn new(msg_tx: channel::Sender<ChannelMessage>, cable: Cable) -> Self {
        Self {
            msg_tx,
            cable,
            receiver_gone: false,
        }
    }

    /// Decodes `buf` and forwards it as a [`ChannelMessage`].
    ///
    /// Returns `false` if the bytes were not forwarded.
    pub fn forward(&mut self, buf: &[u8]) -> bool {
        // SysEx, timing clock & other system messages
        if buf.first().map_or(false, |&status| status >= 0xf0) {
            log::trace!("Skipping system msg {}", bytes::Displayable::from(buf));
            return false;
        }

        let msg = match ChannelMessage::parse(buf, self.cable) {
            Ok(msg) => msg,
            Err(err) => {
                log::warn!("Ignoring: {err}");
                return false;
            }
        };

        if self.receiver_gone {
            return false;
        }

        if let Err(err) = self.msg_tx.send(msg) {
            log::error!("Failed to forward MIDI msg: {err}");
            self.receiver_gone = true;
            return false;
        }

        true
    }
}

/// MIDI input ports, forwarding channel messages to the element dispatcher.
pub struct PortsIn {
    map: BTreeMap<Arc<str>, midir::MidiInputPort>,
    cur: Option<Arc<str>>,
    midi_conn: io::InputConnection,
    client_name: Arc<str>,
}

impl PortsIn {
    pub fn try_new(
        client_name: Arc<str>,
        msg_tx: channel::Sender<ChannelMessage>,
        cable: Cable,
    ) -> Result<Self, Error> {
        Ok(Self {
            map: BTreeMap::new(),
            cur: None,
            midi_conn: io::InputConnection::try_new(&client_name, Forwarder::new(msg_tx, cable))?,
            client_name,
        })
    }

    pub fn list(&self) -> impl Iterator<Item = Arc<str>> + '_ {
        self.map.keys().cloned()
    }

    pub fn cur(&self) -> Option<Arc<str>> {
        self.cur.as_ref().cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.midi_conn.is_connected()
    }

    pub fn refresh(&mut self) -> Result<(), Error> {
        let conn = midir::MidiInput::new(&format!("{} refresh In ports", self.client_name))?;

        self.map.clear();

        let mut prev = self.cur.take();
        for port in conn.ports().iter() {
            let name = conn.port_name(port)?;
            if !name.starts_with(self.client_name.as_ref()) {
                if let Some(ref prev_ref) = prev {
                    if prev_ref.as_ref() == name {
                        self.cur = prev.take();
                    }
                }

                self.map.insert(name.into(), port.clone());
            }
        }

        Ok(())
    }

    pub fn connect(&mut self, port_name: Arc<str>) -> Result<(), Error> {
        let port = self
            .map
            .get(&port_name)
            .ok_or_else(|| Error::PortNotFound(port_name.clone()))?
            .clone();

        if let Err(err) = self
            .midi_conn
            .connect(port_name.clone(), &port, &self.client_name)
        {
            self.cur = None;
            return Err(err);
        }

        log::info!("Connected for Input to {}", port_name);
        self.cur = Some(port_name);

        Ok(())
    }

    /// Connects to the first available port.
    pub fn connect_first(&mut self) -> Result<Arc<str>, Error> {
        let port_name = self.list().next().ok_or(Error::NoPorts)?;
        self.connect(port_name.clone())?;

        Ok(port_name)
    }

    pub fn disconnect(&mut self) {
        self.midi_conn.disconnect();

        if let Some(cur) = self.cur.take() {
            log::debug!("Disconnected Input from {}", cur);
        }
    }
}
