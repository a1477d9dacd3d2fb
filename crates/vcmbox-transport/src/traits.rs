use crate::error::Result;
use crate::ioctl::Opcode;

/// A device that accepts a mailbox buffer through a device-control call.
///
/// The buffer is passed in place: the implementation reads the request from
/// `buf` and leaves the response in the same words. On Linux this is
/// [`DeviceChannel`](crate::DeviceChannel); tests substitute an in-memory
/// firmware.
pub trait DeviceControl {
    /// Issue `opcode` with `buf` as the argument, blocking until the
    /// co-processor has replied.
    fn exchange(&mut self, opcode: Opcode, buf: &mut [u32]) -> Result<()>;
}

impl<T: DeviceControl + ?Sized> DeviceControl for &mut T {
    fn exchange(&mut self, opcode: Opcode, buf: &mut [u32]) -> Result<()> {
        (**self).exchange(opcode, buf)
    }
}

impl<T: DeviceControl + ?Sized> DeviceControl for Box<T> {
    fn exchange(&mut self, opcode: Opcode, buf: &mut [u32]) -> Result<()> {
        (**self).exchange(opcode, buf)
    }
}
