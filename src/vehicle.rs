//! Capability interface for the flying vehicle.

use crate::controls::RcControls;
use crate::Result;
use opencv::core::Mat;

/// Operations the tracking loop needs from a drone
///
/// All calls block until the vehicle has accepted them or failed.
pub trait Vehicle {
    /// Open the command link
    fn connect(&mut self) -> Result<()>;

    /// Start the video stream so that [`Vehicle::frame`] returns images
    fn stream_on(&mut self) -> Result<()>;

    /// Battery charge in percent
    fn battery(&mut self) -> Result<u8>;

    /// Take off and hover
    fn takeoff(&mut self) -> Result<()>;

    /// Latest camera frame
    fn frame(&mut self) -> Result<Mat>;

    /// Send a velocity command, superseding the previous one
    fn send_velocity(&mut self, controls: RcControls) -> Result<()>;

    /// Land where the vehicle is
    fn land(&mut self) -> Result<()>;
}
