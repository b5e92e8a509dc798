use std::sync::Arc;

use super::{port::Forwarder, Error};

/// The midir input and its connection to at most one port.
///
/// midir consumes the `MidiInput` to connect and hands it back when the
/// connection is closed or fails, so exactly one of `input` and `conn`
/// is set.
pub struct InputConnection {
    input: Option<midir::MidiInput>,
    conn: Option<midir::MidiInputConnection<Forwarder>>,
    forwarder: Forwarder,
}

impl InputConnection {
    pub fn try_new(client_name: &str, forwarder: Forwarder) -> Result<Self, Error> {
        Ok(Self {
            input: Some(midir::MidiInput::new(client_name)?),
            conn: None,
            forwarder,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Connects to `port`, closing the current connection first.
    pub fn connect(
        &mut self,
        port_name: Arc<str>,
        port: &midir::MidiInputPort,
        client_port_name: &str,
    ) -> Result<(), Error> {
        self.disconnect();

        let input = self
            .input
            .take()
            .ok_or_else(|| Error::Connection(port_name.clone()))?;

        let res = input.connect(
            port,
            client_port_name,
            |_ts, buf, forwarder| {
                forwarder.forward(buf);
            },
            self.forwarder.clone(),
        );

        match res {
            Ok(conn) => {
                self.conn = Some(conn);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to connect Input to {port_name}: {err}");
                self.input = Some(err.into_inner());
                Err(Error::Connection(port_name))
            }
        }
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            let (input, _) = conn.close();
            self.input = Some(input);
        }
    }
}
