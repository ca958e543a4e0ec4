//! Tello drone client speaking the SDK's UDP text protocol.
//!
//! Commands go to the drone's command port and are acknowledged with `ok`,
//! `error ...` or a reading. `rc` commands are fire-and-forget. Video arrives
//! as an H.264 stream on a separate UDP port, decoded by `OpenCV` on a
//! background [`FrameReader`] so that [`Vehicle::frame`] always sees the
//! newest image.

use crate::{
    config::VehicleConfig,
    controls::RcControls,
    error::{Error, Result},
    vehicle::Vehicle,
    video::FrameReader,
};
use log::{debug, info};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

const MAX_RESPONSE_LEN: usize = 1024;

/// Tello drone connected over Wi-Fi
pub struct TelloDrone {
    socket: UdpSocket,
    address: SocketAddr,
    video_url: String,
    frame_timeout: Duration,
    video: Option<FrameReader>,
}

impl TelloDrone {
    /// Bind the local command socket
    ///
    /// No traffic is sent until [`Vehicle::connect`].
    ///
    /// # Errors
    ///
    /// Returns an error if the drone address does not resolve or the socket
    /// cannot be bound
    pub fn new(config: &VehicleConfig) -> Result<Self> {
        let address = config
            .address
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| Error::Vehicle(format!("Address {} did not resolve", config.address)))?;

        let timeout = Duration::from_millis(config.response_timeout_ms);
        let socket = UdpSocket::bind(&config.bind_address)?;
        socket.set_read_timeout(Some(timeout))?;

        info!("Tello command socket bound to {}", socket.local_addr()?);

        Ok(Self {
            socket,
            address,
            video_url: config.video_url.clone(),
            frame_timeout: timeout,
            video: None,
        })
    }

    /// Send a command and wait for the drone's reply
    fn send_command(&self, command: &str) -> Result<String> {
        self.discard_stale_replies()?;

        debug!("-> {}", command);
        self.socket.send_to(command.as_bytes(), self.address)?;

        let mut buf = [0u8; MAX_RESPONSE_LEN];
        loop {
            let (len, from) = self.socket.recv_from(&mut buf).map_err(|e| {
                Error::Vehicle(format!("No response to '{command}': {e}"))
            })?;
            if from != self.address {
                debug!("Ignoring datagram from {}", from);
                continue;
            }
            let response = String::from_utf8_lossy(&buf[..len]).trim().to_string();
            debug!("<- {}", response);
            return Ok(response);
        }
    }

    /// Drop replies that arrived after an earlier command timed out
    fn discard_stale_replies(&self) -> Result<()> {
        self.socket.set_nonblocking(true)?;

        let mut buf = [0u8; MAX_RESPONSE_LEN];
        let drained = loop {
            match self.socket.recv_from(&mut buf) {
                Ok((len, from)) => {
                    debug!("Discarding late reply from {}: {}", from, String::from_utf8_lossy(&buf[..len]).trim());
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.socket.set_nonblocking(false)?;
        Ok(drained?)
    }

    /// Send a command that must be acknowledged with `ok`
    fn send_control_command(&self, command: &str) -> Result<()> {
        let response = self.send_command(command)?;
        expect_ok(command, &response)
    }
}

impl Vehicle for TelloDrone {
    fn connect(&mut self) -> Result<()> {
        info!("Entering SDK mode on {}", self.address);
        self.send_control_command("command")
    }

    fn stream_on(&mut self) -> Result<()> {
        self.send_control_command("streamon")?;

        info!("Opening video stream {}", self.video_url);
        let cap = VideoCapture::from_file(&self.video_url, videoio::CAP_FFMPEG)?;
        if !cap.is_opened()? {
            return Err(Error::Vehicle(format!("Could not open video stream {}", self.video_url)));
        }
        self.video = Some(FrameReader::spawn(cap)?);

        Ok(())
    }

    fn battery(&mut self) -> Result<u8> {
        let response = self.send_command("battery?")?;
        parse_battery(&response)
    }

    fn takeoff(&mut self) -> Result<()> {
        info!("Taking off");
        self.send_control_command("takeoff")
    }

    fn frame(&mut self) -> Result<Mat> {
        self.video
            .as_ref()
            .ok_or_else(|| Error::Vehicle("Video stream is not started".to_string()))?
            .latest(self.frame_timeout)
    }

    fn send_velocity(&mut self, controls: RcControls) -> Result<()> {
        let command = rc_command(controls);
        debug!("-> {}", command);
        self.socket.send_to(command.as_bytes(), self.address)?;
        Ok(())
    }

    fn land(&mut self) -> Result<()> {
        info!("Landing");
        self.send_control_command("land")
    }
}

/// Format an `rc` command with every axis clamped to the SDK range
#[must_use]
pub fn rc_command(controls: RcControls) -> String {
    let (a, b, c, d) = controls.clamped().as_tuple();
    format!("rc {a} {b} {c} {d}")
}

/// Parse a `battery?` reply
///
/// # Errors
///
/// Returns `Error::Vehicle` if the reply is not a percentage
pub fn parse_battery(response: &str) -> Result<u8> {
    response
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|level| *level <= 100)
        .ok_or_else(|| Error::Vehicle(format!("Unexpected battery reply: '{response}'")))
}

fn expect_ok(command: &str, response: &str) -> Result<()> {
    if response.eq_ignore_ascii_case("ok") {
        Ok(())
    } else {
        Err(Error::Vehicle(format!("Command '{command}' failed: {response}")))
    }
}
